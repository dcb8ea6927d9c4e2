//! Key bindings for the progress widget.

use crate::key::{self, Binding};
use crossterm::event::KeyCode;

/// Keyboard stand-ins for the widget's two hit targets.
#[derive(Debug, Clone)]
pub struct ProgressKeyMap {
    /// Advances the displayed step, like activating the label.
    pub advance_step: Binding,
    /// Starts a pulse, like activating the track.
    pub pulse: Binding,
    /// Moves focus between label and track.
    pub switch_target: Binding,
    /// Activates whichever hit target has focus.
    pub activate: Binding,
}

impl Default for ProgressKeyMap {
    fn default() -> Self {
        Self {
            advance_step: Binding::new(vec![KeyCode::Char('s'), KeyCode::Char('+')])
                .with_help("s", "next step"),
            pulse: Binding::new(vec![KeyCode::Char('p')]).with_help("p", "pulse"),
            switch_target: Binding::new(vec![KeyCode::Tab]).with_help("tab", "label/track"),
            activate: Binding::new(vec![KeyCode::Enter, KeyCode::Char(' ')])
                .with_help("enter", "activate"),
        }
    }
}

impl key::KeyMap for ProgressKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.advance_step,
            &self.pulse,
            &self.switch_target,
            &self.activate,
        ]
    }
}
