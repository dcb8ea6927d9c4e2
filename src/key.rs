//! Type-safe key bindings shared by the dashboard components.
//!
//! A [`Binding`] groups one or more key presses under a single action and
//! carries the short help text shown in the footer. Components expose their
//! bindings through the [`KeyMap`] trait so the `help` module can render them.
//!
//! ```rust
//! use branchdash_widgets::key::Binding;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let pulse = Binding::new(vec![KeyCode::Char('p')]).with_help("p", "pulse");
//! let quit = Binding::new(vec![(KeyCode::Char('c'), KeyModifiers::CONTROL)])
//!     .with_help("ctrl+c", "quit");
//! assert!(pulse.enabled());
//! assert_eq!(quit.help().key, "ctrl+c");
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: key code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key code.
    pub code: KeyCode,
    /// Required modifiers; `KeyModifiers::NONE` for a bare key.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Human readable key label, e.g. `"enter"`.
    pub key: String,
    /// What the key does, e.g. `"open"`.
    pub desc: String,
}

/// A set of key presses bound to one action.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from anything convertible into key presses.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// Returns the key presses of this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Returns the help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Enables or disables the binding. Disabled bindings never match and are
    /// left out of help output.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the binding is enabled and has at least one key.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Whether the key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        // Terminals report shifted symbols like '+' with SHIFT set.
        let modifiers = match msg.key {
            KeyCode::Char(_) => msg.modifiers.difference(KeyModifiers::SHIFT),
            _ => msg.modifiers,
        };
        self.enabled()
            && self
                .keys
                .iter()
                .any(|k| k.code == msg.key && k.modifiers == modifiers)
    }
}

/// Components that publish their bindings for help rendering.
pub trait KeyMap {
    /// Bindings shown in the one-line help.
    fn short_help(&self) -> Vec<&Binding>;
}
