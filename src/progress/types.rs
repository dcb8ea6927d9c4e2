//! Configuration, options and messages for the stepped progress widget.

use super::keymap::ProgressKeyMap;
use super::view::Styles;
use serde::Deserialize;
use std::time::Duration;

/// The fixed cycle of display percentages.
pub const STEPS: [u32; 7] = [10, 15, 25, 35, 50, 75, 100];

/// Step index a freshly mounted widget starts on (`STEPS[1] == 15`).
pub const INITIAL_STEP: usize = 1;

/// How long a pulse stays visible after the track is activated.
pub const PULSE_DURATION: Duration = Duration::from_millis(1000);

pub(crate) const DEFAULT_WIDTH: i32 = 40;

/// Caller supplied, immutable widget configuration.
///
/// `target` is the value the current step is normalized against. It is not
/// validated: zero, negative or non-finite targets render an empty bar.
/// The remaining strings are display-only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Denominator for the fill fraction, expected in `(0, 100]`.
    #[serde(default)]
    pub target: f64,
    /// Card title.
    #[serde(default)]
    pub title: String,
    /// Text shown after the change indicator.
    #[serde(default)]
    pub improvement_text: String,
    /// Change label, e.g. `"+12%"`.
    #[serde(default)]
    pub change_percentage: String,
    /// Selects the "improved" indicator when true, "declined" otherwise.
    #[serde(default = "default_is_positive")]
    pub is_positive: bool,
    /// Opaque presentation token, forwarded untouched.
    #[serde(default)]
    pub style_class: Option<String>,
}

fn default_is_positive() -> bool {
    true
}

impl Config {
    /// Builds a config with `is_positive = true` and no style class.
    pub fn new(
        target: f64,
        title: impl Into<String>,
        improvement_text: impl Into<String>,
        change_percentage: impl Into<String>,
    ) -> Self {
        Self {
            target,
            title: title.into(),
            improvement_text: improvement_text.into(),
            change_percentage: change_percentage.into(),
            is_positive: true,
            style_class: None,
        }
    }

    /// Whether the target can produce a meaningful fill.
    pub fn has_usable_target(&self) -> bool {
        self.target.is_finite() && self.target > 0.0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(100.0, "Progress", "", "")
    }
}

/// Which part of the widget keyboard activation applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HitTarget {
    /// The percentage label; activation advances the step.
    #[default]
    Label,
    /// The bar track; activation starts a pulse.
    Track,
}

impl HitTarget {
    /// Returns the other hit target.
    pub fn toggle(self) -> Self {
        match self {
            HitTarget::Label => HitTarget::Track,
            HitTarget::Track => HitTarget::Label,
        }
    }
}

/// Construction options, applied in order by [`new`](super::new).
#[derive(Debug, Clone)]
pub enum ProgressOption {
    /// Total render width in cells, label included.
    WithWidth(i32),
    /// Replaces the default styles.
    WithStyles(Styles),
    /// Replaces the default key bindings.
    WithKeyMap(ProgressKeyMap),
    /// Sets the opaque style class.
    WithStyleClass(String),
    /// Marks the change as a decline.
    Declined,
}

/// Sets the total render width.
pub fn with_width(w: i32) -> ProgressOption {
    ProgressOption::WithWidth(w)
}

/// Uses custom styles.
pub fn with_styles(styles: Styles) -> ProgressOption {
    ProgressOption::WithStyles(styles)
}

/// Uses custom key bindings.
pub fn with_key_map(keymap: ProgressKeyMap) -> ProgressOption {
    ProgressOption::WithKeyMap(keymap)
}

/// Forwards a style class token to the presentation layer.
pub fn with_style_class(class: impl Into<String>) -> ProgressOption {
    ProgressOption::WithStyleClass(class.into())
}

/// Shows the "declined" indicator regardless of the config.
pub fn declined() -> ProgressOption {
    ProgressOption::Declined
}

/// Delivered [`PULSE_DURATION`] after a pulse starts; clears the pulse if it
/// still belongs to the latest pulse of the same widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseResetMsg {
    pub(crate) id: i64,
    pub(crate) tag: i64,
}

impl PulseResetMsg {
    /// Id of the widget that scheduled the reset.
    pub fn id(&self) -> i64 {
        self.id
    }
}
