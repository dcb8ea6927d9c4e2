//! Dashboard configuration file support.
//!
//! A dashboard is described by a TOML file holding the sidebar entries, the
//! initial route and the progress cards. Every section is optional; missing
//! sections fall back to the reference branch deployment.
//!
//! ```rust
//! use branchdash_widgets::config::DashboardConfig;
//!
//! let config = DashboardConfig::from_toml_str(
//!     r#"
//!     route = "/card-request"
//!
//!     [[widgets]]
//!     target = 40
//!     title = "Card requests"
//!     change_percentage = "-3%"
//!     is_positive = false
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.nav_entries().len(), 10);
//! assert_eq!(config.widget_configs()[0].title, "Card requests");
//! ```

use crate::nav::{self, NavEntry, RoutePath};
use crate::progress;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable the demo binary reads the config path from.
pub const CONFIG_ENV_VAR: &str = "BRANCHDASH_CONFIG";

/// Errors raised while loading a dashboard configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema. Invalid
    /// route paths are reported here as well.
    #[error("failed to parse dashboard config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A navigation entry has an empty label.
    #[error("navigation entry {index} has an empty label")]
    EmptyLabel {
        /// Position of the entry in the file.
        index: usize,
    },

    /// Two navigation entries lead to the same route.
    #[error("duplicate navigation destination {0}")]
    DuplicateDestination(String),
}

/// Parsed dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Start with an icon-only sidebar.
    #[serde(default)]
    pub collapsed: bool,
    /// Route shown at startup.
    #[serde(default = "default_route")]
    pub route: RoutePath,
    /// Sidebar entries; empty means the reference entries.
    #[serde(default)]
    pub nav: Vec<NavEntry>,
    /// Progress cards; empty means a single reference card.
    #[serde(default)]
    pub widgets: Vec<progress::Config>,
}

fn default_route() -> RoutePath {
    nav::default_entries()
        .into_iter()
        .next()
        .map(|e| e.destination)
        .unwrap_or_else(RoutePath::root)
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            collapsed: false,
            route: default_route(),
            nav: Vec::new(),
            widgets: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            nav = config.nav.len(),
            widgets = config.widgets.len(),
            "dashboard config loaded"
        );
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, entry) in self.nav.iter().enumerate() {
            if entry.label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel { index });
            }
            if !seen.insert(entry.destination.as_str()) {
                return Err(ConfigError::DuplicateDestination(
                    entry.destination.to_string(),
                ));
            }
        }
        for w in self.widgets.iter().filter(|w| !w.has_usable_target()) {
            warn!(title = %w.title, target = w.target, "widget target is not positive");
        }
        Ok(())
    }

    /// Sidebar entries, falling back to the reference entries.
    pub fn nav_entries(&self) -> Vec<NavEntry> {
        if self.nav.is_empty() {
            nav::default_entries()
        } else {
            self.nav.clone()
        }
    }

    /// Progress card configs, falling back to a single reference card.
    pub fn widget_configs(&self) -> Vec<progress::Config> {
        if self.widgets.is_empty() {
            vec![progress::Config::new(
                50.0,
                "Account Opening",
                "vs last month",
                "+12%",
            )]
        } else {
            self.widgets.clone()
        }
    }
}
