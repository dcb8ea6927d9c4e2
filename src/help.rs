//! One-line key binding help for the dashboard footer.
//!
//! The help model renders the short help of one or more [`KeyMap`]s as
//! `key desc • key desc • ...`, truncating with an ellipsis when a width is set.
//!
//! ```rust
//! use branchdash_widgets::help::Model;
//! use branchdash_widgets::nav::NavKeyMap;
//!
//! let help = Model::new().with_width(80);
//! let line = help.view(&NavKeyMap::default());
//! assert!(line.contains("open"));
//! ```

use crate::key::{self, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles for the help line.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style of the trailing ellipsis.
    pub ellipsis: Style,
    /// Style of the key label.
    pub key: Style,
    /// Style of the description.
    pub desc: Style,
    /// Style of the separator between items.
    pub separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            key: key_style,
            desc: desc_style,
            separator: sep_style,
        }
    }
}

/// Help line renderer.
#[derive(Debug, Clone)]
pub struct Model {
    /// Maximum visible width; 0 means unlimited.
    pub width: usize,
    /// Text placed between items.
    pub separator: String,
    /// Text appended when items were cut.
    pub ellipsis: String,
    /// Styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            width: 0,
            separator: " • ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Creates a help model with no width limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the width limit. Items that would overflow it are replaced by
    /// the ellipsis.
    ///
    /// # Arguments
    ///
    /// * `width` - Maximum visible width in cells; `0` disables truncation
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders the short help of a single key map.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        self.short_help_view(keymap.short_help())
    }

    /// Renders an arbitrary list of bindings, skipping disabled ones.
    ///
    /// Width is measured on visible cells, so ANSI styling does not count.
    /// When an item does not fit, rendering stops and the ellipsis is added
    /// if there is room for it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::help::Model;
    /// use branchdash_widgets::key::Binding;
    /// use crossterm::event::KeyCode;
    /// use lipgloss_extras::lipgloss;
    ///
    /// let open = Binding::new(vec![KeyCode::Enter]).with_help("enter", "open");
    /// let quit = Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit");
    ///
    /// let line = Model::new().short_help_view(vec![&open, &quit]);
    /// assert_eq!(lipgloss::strip_ansi(&line), "enter open • q quit");
    /// ```
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let mut builder = String::new();
        let mut total_width = 0;
        let separator = self
            .styles
            .separator
            .clone()
            .inline(true)
            .render(&self.separator);

        for kb in bindings.iter().filter(|b| b.enabled()) {
            let sep = if total_width > 0 { separator.as_str() } else { "" };

            let help = kb.help();
            let key_part = self.styles.key.clone().inline(true).render(&help.key);
            let desc_part = self.styles.desc.clone().inline(true).render(&help.desc);
            let item_str = format!("{}{} {}", sep, key_part, desc_part);
            let item_width = lipgloss::width_visible(&item_str);

            if self.width > 0 && total_width + item_width > self.width {
                let tail = format!(
                    " {}",
                    self.styles
                        .ellipsis
                        .clone()
                        .inline(true)
                        .render(&self.ellipsis)
                );
                if total_width + lipgloss::width_visible(&tail) < self.width {
                    builder.push_str(&tail);
                }
                break;
            }

            total_width += item_width;
            builder.push_str(&item_str);
        }
        builder
    }
}
