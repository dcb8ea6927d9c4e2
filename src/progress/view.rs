//! Rendering for the progress widget.

use super::geometry::Geometry;
use super::model::Model;
use super::types::HitTarget;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles for every part of the progress card.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Title line.
    pub title: Style,
    /// Filled cells while idle.
    pub fill: Style,
    /// Filled cells while a pulse is showing.
    pub pulse_fill: Style,
    /// Empty cells.
    pub empty: Style,
    /// Percentage label.
    pub label: Style,
    /// "Improved" indicator and change text.
    pub improved: Style,
    /// "Declined" indicator and change text.
    pub declined: Style,
    /// Trailing improvement text.
    pub improvement_text: Style,
    /// Character for filled cells.
    pub full_char: char,
    /// Character for empty cells.
    pub empty_char: char,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            title: Style::new().bold(true),
            fill: Style::new().foreground(Color::from("#7571F9")),
            pulse_fill: Style::new().foreground(Color::from("#EE6FF8")),
            empty: Style::new().foreground(Color::from("#606060")),
            label: Style::new(),
            improved: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#04B575",
            }),
            declined: Style::new().foreground(AdaptiveColor {
                Light: "#E0245E",
                Dark: "#FF5F87",
            }),
            improvement_text: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            full_char: '█',
            empty_char: '░',
        }
    }
}

impl Model {
    /// Renders title, bar and change lines for the current state.
    pub fn view(&self) -> String {
        self.view_as(self.geometry())
    }

    /// Renders the card for an arbitrary geometry.
    pub fn view_as(&self, geometry: Geometry) -> String {
        let title = self.styles.title.render(&self.config().title);
        format!(
            "{}\n{}\n{}",
            title,
            self.bar_line(geometry),
            self.change_line()
        )
    }

    fn bar_line(&self, geometry: Geometry) -> String {
        let focused = crate::Component::focused(self);
        let mut label_style = self.styles.label.clone();
        if focused && self.hit_target() == HitTarget::Label {
            label_style = label_style.underline(true);
        }
        let label = label_style.render(&format!(" {:>3}%", geometry.display_percentage));
        let label_width = lipgloss::width_visible(&label) as i32;

        let tw = std::cmp::max(0, self.width - label_width);
        let fw = geometry.filled_cells(tw);

        let (mut fill, mut empty) = if self.is_animating() {
            (self.styles.pulse_fill.clone(), self.styles.empty.clone())
        } else {
            (self.styles.fill.clone(), self.styles.empty.clone())
        };
        if focused && self.hit_target() == HitTarget::Track {
            fill = fill.underline(true);
            empty = empty.underline(true);
        }

        let mut result = String::new();
        let full_cell = fill.render(&self.styles.full_char.to_string());
        result.push_str(&full_cell.repeat(fw as usize));
        let empty_cell = empty.render(&self.styles.empty_char.to_string());
        result.push_str(&empty_cell.repeat((tw - fw).max(0) as usize));
        result.push_str(&label);
        result
    }

    fn change_line(&self) -> String {
        let config = self.config();
        let (indicator, style) = if config.is_positive {
            ("▲", &self.styles.improved)
        } else {
            ("▼", &self.styles.declined)
        };
        let change = style.render(&format!("{} {}", indicator, config.change_percentage));
        if config.improvement_text.is_empty() {
            return change;
        }
        format!(
            "{} {}",
            change,
            self.styles.improvement_text.render(&config.improvement_text)
        )
    }
}
