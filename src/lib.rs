#![warn(missing_docs)]

//! # branchdash-widgets
//!
//! Terminal components for a branch-operations dashboard shell, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) and styled with
//! lipgloss.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`progress`] | Progress card with a stepped percentage label and a pulsing track |
//! | [`nav`] | Collapsible sidebar with route highlighting and a logout action |
//! | [`help`] | One-line key binding help |
//!
//! Every component follows the Elm architecture: state changes happen in
//! `update`, output comes from `view`, and anything asynchronous is returned
//! as a [`Cmd`] whose message must be fed back into `update`.
//!
//! ## Progress card
//!
//! ```rust
//! use branchdash_widgets::progress::{self, Config};
//!
//! let mut card = progress::new(Config::new(50.0, "Account opening", "vs last month", "+12%"), &[]);
//! assert_eq!(card.geometry().display_percentage, 15);
//!
//! card.advance_step();
//! assert_eq!(card.geometry().display_percentage, 25);
//! assert_eq!(card.geometry().fill_fraction, 0.5);
//!
//! // The returned command delivers a `PulseResetMsg` one second later.
//! let _reset = card.trigger_pulse();
//! assert!(card.is_animating());
//! ```
//!
//! ## Sidebar
//!
//! ```rust
//! use branchdash_widgets::nav::{self, RoutePath};
//!
//! let sidebar = nav::Model::default();
//! let route = RoutePath::parse("/card-request").unwrap();
//! assert_eq!(sidebar.active_index(&route), Some(7));
//! ```

pub mod config;
pub mod help;
pub mod key;
pub mod nav;
pub mod progress;

use bubbletea_rs::Cmd;

/// Focus management shared by the interactive components.
///
/// Only the focused component reacts to key presses, which lets a host
/// application route every message to every component.
///
/// ```rust
/// use branchdash_widgets::prelude::*;
///
/// let mut sidebar = Nav::default();
/// assert!(!sidebar.focused());
/// sidebar.focus();
/// assert!(sidebar.focused());
/// sidebar.blur();
/// assert!(!sidebar.focused());
/// ```
pub trait Component {
    /// Gives the component keyboard focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes keyboard focus.
    fn blur(&mut self);

    /// Whether the component has keyboard focus.
    fn focused(&self) -> bool;
}

pub use config::{ConfigError, DashboardConfig};
pub use key::{Binding, KeyMap, KeyPress};
pub use nav::Model as Nav;
pub use nav::{IconRef, NavEntry, NavigateKind, NavigateMsg, RoutePath};
pub use progress::Model as Progress;
pub use progress::{Geometry, PulseResetMsg};

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::help::Model as HelpModel;
    pub use crate::key::{Binding, KeyMap, KeyPress};
    pub use crate::nav::Model as Nav;
    pub use crate::nav::{IconRef, NavEntry, NavigateKind, NavigateMsg, RoutePath};
    pub use crate::progress::Model as Progress;
    pub use crate::progress::{
        compute_geometry, Config as ProgressConfig, Geometry, HitTarget, PulseResetMsg,
    };
    pub use crate::Component;
}
