//! Stepped progress widget.
//!
//! A progress card with two independent interactions. Activating the
//! percentage label advances the displayed value through a fixed cycle
//! ([`STEPS`]); activating the track shows a short pulse that clears itself
//! after [`PULSE_DURATION`]. The bar fill is the displayed percentage
//! normalized against the caller's `target`, clamped to `[0, 1]`.
//!
//! # Basic Usage
//!
//! ```rust
//! use branchdash_widgets::progress::{new, with_width, Config};
//!
//! let widget = new(
//!     Config::new(50.0, "Account opening", "vs last month", "+12%"),
//!     &[with_width(30)],
//! );
//! println!("{}", widget.view());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! Resets arrive as [`PulseResetMsg`]s and must be forwarded to `update`:
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use branchdash_widgets::progress::{self, Config};
//! use branchdash_widgets::Component;
//!
//! struct App {
//!     widget: progress::Model,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut widget = progress::new(Config::new(75.0, "Cards", "", "+3%"), &[]);
//!         widget.focus();
//!         (Self { widget }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.widget.update(&msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.widget.view()
//!     }
//! }
//! ```

mod geometry;
mod keymap;
mod model;
mod types;
mod view;

#[cfg(test)]
mod tests;

pub use geometry::{compute_geometry, fill_fraction, Geometry};
pub use keymap::ProgressKeyMap;
pub use model::{new, Model};
pub use types::{
    declined, with_key_map, with_style_class, with_styles, with_width, Config, HitTarget,
    ProgressOption, PulseResetMsg, INITIAL_STEP, PULSE_DURATION, STEPS,
};
pub use view::Styles;
