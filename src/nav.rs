//! Navigation sidebar for the dashboard shell.
//!
//! The sidebar renders a fixed, ordered list of [`NavEntry`] values followed by
//! a logout action. The entry whose destination equals the current route is
//! highlighted. The current route is always passed in by the caller; the
//! sidebar keeps no routing state of its own.
//!
//! Selecting an entry does not change any route directly. It emits a
//! [`NavigateMsg`] which the host application applies.
//!
//! ```rust
//! use branchdash_widgets::nav::{self, RoutePath};
//!
//! let sidebar = nav::Model::new(nav::default_entries());
//! let route = RoutePath::parse("/settings").unwrap();
//! assert_eq!(sidebar.active_index(&route), Some(9));
//! println!("{}", sidebar.view(&route));
//! ```

use crate::key::{self, Binding};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const DEFAULT_WIDTH: usize = 38;

/// Error returned for strings that are not absolute route paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route path {0:?}: must start with '/' and contain no whitespace")]
pub struct InvalidRoute(pub String);

/// An absolute route path such as `/card-request`.
///
/// Paths are normalized on construction: trailing slashes are removed except
/// for the root path `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Parses and normalizes a route path.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRoute`] when `s` does not start with `/` or contains
    /// whitespace.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::nav::RoutePath;
    ///
    /// assert_eq!(RoutePath::parse("/settings/").unwrap().as_str(), "/settings");
    /// assert_eq!(RoutePath::parse("/").unwrap(), RoutePath::root());
    /// assert!(RoutePath::parse("settings").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidRoute> {
        if !s.starts_with('/') || s.chars().any(char::is_whitespace) {
            return Err(InvalidRoute(s.to_string()));
        }
        Ok(Self::normalized(s))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalized(s: &str) -> Self {
        let trimmed = s.trim_end_matches('/');
        if trimmed.is_empty() {
            Self::root()
        } else {
            Self(trimmed.to_string())
        }
    }
}

impl TryFrom<String> for RoutePath {
    type Error = InvalidRoute;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to an icon. The sidebar prints it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct IconRef(pub String);

impl IconRef {
    /// Creates an icon reference.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavEntry {
    /// Text shown in expanded mode.
    pub label: String,
    /// Route this entry leads to.
    pub destination: RoutePath,
    /// Icon shown in both modes.
    pub icon: IconRef,
}

impl NavEntry {
    /// Creates an entry.
    pub fn new(label: impl Into<String>, destination: RoutePath, icon: IconRef) -> Self {
        Self {
            label: label.into(),
            destination,
            icon,
        }
    }
}

static DEFAULT_ENTRIES: Lazy<Vec<NavEntry>> = Lazy::new(|| {
    [
        ("Dashboard Summary", "/dashboard", "▣"),
        ("Customer Relationship", "/customer-relationship", "☺"),
        (
            "Transaction & Account Management",
            "/transaction-account-management",
            "⇄",
        ),
        ("Analytics & Reporting", "/analytics-reporting", "▤"),
        ("Operations & Compliance", "/operations-compliance", "◈"),
        ("Communication & Engagement", "/communication-engagement", "✉"),
        ("Cheque Book Request", "/cheque-book-request", "✎"),
        ("Card Request", "/card-request", "▭"),
        ("Account Opening", "/account-opening", "✚"),
        ("Settings", "/settings", "✱"),
    ]
    .into_iter()
    .map(|(label, path, icon)| {
        NavEntry::new(label, RoutePath::normalized(path), IconRef::new(icon))
    })
    .collect()
});

/// The ten entries of the reference branch deployment.
pub fn default_entries() -> Vec<NavEntry> {
    DEFAULT_ENTRIES.clone()
}

/// Why a navigation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateKind {
    /// A regular entry was selected.
    Entry,
    /// The logout action was selected.
    Logout,
}

/// Emitted when the user selects an entry or logs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateMsg {
    /// Route the host should switch to.
    pub destination: RoutePath,
    /// What triggered the navigation.
    pub kind: NavigateKind,
}

/// Key bindings for the sidebar.
#[derive(Debug, Clone)]
pub struct NavKeyMap {
    /// Move the cursor up.
    pub cursor_up: Binding,
    /// Move the cursor down.
    pub cursor_down: Binding,
    /// Open the entry under the cursor.
    pub select: Binding,
    /// Switch between expanded and icon-only mode.
    pub toggle_collapse: Binding,
}

impl Default for NavKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')])
                .with_help("↑/k", "up"),
            cursor_down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "down"),
            select: Binding::new(vec![KeyCode::Enter]).with_help("enter", "open"),
            toggle_collapse: Binding::new(vec![KeyCode::Char('[')])
                .with_help("[", "collapse"),
        }
    }
}

impl key::KeyMap for NavKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.cursor_up,
            &self.cursor_down,
            &self.select,
            &self.toggle_collapse,
        ]
    }
}

/// Sidebar styles.
#[derive(Debug, Clone)]
pub struct NavStyles {
    /// Regular entry.
    pub item: Style,
    /// Entry matching the current route.
    pub active: Style,
    /// Cursor marker shown while focused.
    pub cursor: Style,
    /// Line between the entries and the logout action.
    pub separator: Style,
    /// Logout action.
    pub logout: Style,
}

impl Default for NavStyles {
    fn default() -> Self {
        Self {
            item: Style::new().foreground(AdaptiveColor {
                Light: "#1a1a1a",
                Dark: "#dddddd",
            }),
            active: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230"))
                .bold(true),
            cursor: Style::new().foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            separator: Style::new().foreground(AdaptiveColor {
                Light: "#DDDADA",
                Dark: "#3C3C3C",
            }),
            logout: Style::new().foreground(AdaptiveColor {
                Light: "#E0245E",
                Dark: "#FF5F87",
            }),
        }
    }
}

/// Sidebar model.
#[derive(Debug, Clone)]
pub struct Model {
    entries: Vec<NavEntry>,
    /// Index into entries; `entries.len()` is the logout action.
    cursor: usize,
    collapsed: bool,
    focus: bool,

    /// Width of the expanded sidebar in cells.
    pub width: usize,
    /// Label of the logout action.
    pub logout_label: String,
    /// Icon of the logout action.
    pub logout_icon: IconRef,
    /// Styles used by `view`.
    pub styles: NavStyles,
    /// Key bindings handled while focused.
    pub keymap: NavKeyMap,
}

impl Model {
    /// Creates an expanded, unfocused sidebar with the cursor on the first entry.
    pub fn new(entries: Vec<NavEntry>) -> Self {
        Self {
            entries,
            cursor: 0,
            collapsed: false,
            focus: false,
            width: DEFAULT_WIDTH,
            logout_label: "Logout".to_string(),
            logout_icon: IconRef::new("⏻"),
            styles: NavStyles::default(),
            keymap: NavKeyMap::default(),
        }
    }

    /// Sets the expanded width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Starts collapsed or expanded.
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// The entries in display order.
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Index of the entry matching `route` exactly, if any.
    ///
    /// Matching is plain equality of normalized paths, so a sub-path such as
    /// `/card-request/42` does not select `/card-request`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::nav::{Model, RoutePath};
    ///
    /// let sidebar = Model::default();
    /// let parse = |s: &str| RoutePath::parse(s).unwrap();
    /// assert_eq!(sidebar.active_index(&parse("/dashboard")), Some(0));
    /// assert_eq!(sidebar.active_index(&parse("/card-request/42")), None);
    /// assert_eq!(sidebar.active_index(&RoutePath::root()), None);
    /// ```
    pub fn active_index(&self, route: &RoutePath) -> Option<usize> {
        self.entries.iter().position(|e| &e.destination == route)
    }

    /// Cursor position; equal to `entries().len()` when on the logout action.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the cursor rests on the logout action.
    pub fn on_logout(&self) -> bool {
        self.cursor == self.entries.len()
    }

    /// Moves the cursor up, stopping at the first entry.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor down, stopping at the logout action.
    pub fn cursor_down(&mut self) {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Puts the cursor on the entry matching `route`, if there is one.
    pub fn sync_cursor(&mut self, route: &RoutePath) {
        if let Some(i) = self.active_index(route) {
            self.cursor = i;
        }
    }

    /// Whether the sidebar shows icons only.
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// Sets icon-only mode.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// Flips icon-only mode.
    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
        debug!(collapsed = self.collapsed, "sidebar collapse toggled");
    }

    /// The navigation the entry under the cursor would request.
    pub fn selection(&self) -> NavigateMsg {
        match self.entries.get(self.cursor) {
            Some(entry) => NavigateMsg {
                destination: entry.destination.clone(),
                kind: NavigateKind::Entry,
            },
            None => self.logout(),
        }
    }

    /// The logout navigation: always to the root path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::nav::{Model, NavigateKind, RoutePath};
    ///
    /// let msg = Model::default().logout();
    /// assert_eq!(msg.destination, RoutePath::root());
    /// assert_eq!(msg.kind, NavigateKind::Logout);
    /// ```
    pub fn logout(&self) -> NavigateMsg {
        NavigateMsg {
            destination: RoutePath::root(),
            kind: NavigateKind::Logout,
        }
    }

    fn emit(msg: NavigateMsg) -> Cmd {
        debug!(destination = %msg.destination, kind = ?msg.kind, "navigation requested");
        bubbletea_tick(Duration::from_nanos(1), move |_| Box::new(msg.clone()) as Msg)
    }

    /// Handles key presses while focused.
    ///
    /// Cursor and collapse keys change local state only. The select key
    /// returns a command that delivers the [`NavigateMsg`] for the entry (or
    /// the logout action) under the cursor; the host applies it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::nav::Model;
    /// use branchdash_widgets::Component;
    /// use bubbletea_rs::{KeyMsg, Msg};
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let mut sidebar = Model::default();
    /// sidebar.focus();
    /// let down: Msg = Box::new(KeyMsg {
    ///     key: KeyCode::Down,
    ///     modifiers: KeyModifiers::NONE,
    /// });
    /// assert!(sidebar.update(&down).is_none());
    /// assert_eq!(sidebar.cursor(), 1);
    /// ```
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if !self.focus {
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.cursor_up.matches(key_msg) {
                self.cursor_up();
            } else if self.keymap.cursor_down.matches(key_msg) {
                self.cursor_down();
            } else if self.keymap.toggle_collapse.matches(key_msg) {
                self.toggle_collapsed();
            } else if self.keymap.select.matches(key_msg) {
                return Some(Self::emit(self.selection()));
            }
        }

        None
    }

    /// Renders the sidebar, highlighting the entry that matches `current_route`.
    ///
    /// # Arguments
    ///
    /// * `current_route` - The route the host is showing. Only an exact match
    ///   is highlighted.
    ///
    /// The output has one line per entry, a rule, and the logout action.
    /// Expanded labels are padded or cut with `…` to fit [`width`](Model::width);
    /// collapsed mode prints icons only.
    pub fn view(&self, current_route: &RoutePath) -> String {
        let active = self.active_index(current_route);
        let mut lines = Vec::with_capacity(self.entries.len() + 2);

        for (i, entry) in self.entries.iter().enumerate() {
            let text = self.item_text(&entry.icon, &entry.label);
            let style = if active == Some(i) {
                &self.styles.active
            } else {
                &self.styles.item
            };
            lines.push(format!("{}{}", self.marker(i), style.render(&text)));
        }

        let rule_width = if self.collapsed { 3 } else { self.width.max(3) };
        lines.push(self.styles.separator.render(&"─".repeat(rule_width)));

        let logout = self.item_text(&self.logout_icon, &self.logout_label);
        lines.push(format!(
            "{}{}",
            self.marker(self.entries.len()),
            self.styles.logout.render(&logout)
        ));

        lines.join("\n")
    }

    fn marker(&self, index: usize) -> String {
        if self.focus && self.cursor == index {
            self.styles.cursor.render("›")
        } else {
            " ".to_string()
        }
    }

    fn item_text(&self, icon: &IconRef, label: &str) -> String {
        if self.collapsed {
            return format!(" {} ", icon.0);
        }
        // marker + " " + icon + " " + label
        let used = 1 + 1 + icon.0.width() + 1;
        let room = self.width.saturating_sub(used);
        let label = truncate(label, room);
        let pad = room.saturating_sub(label.width());
        format!(" {} {}{}", icon.0, label, " ".repeat(pad))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(default_entries())
    }
}

impl crate::Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

/// Cuts `s` to at most `max` cells, ending with an ellipsis when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Component;
    use crossterm::event::KeyModifiers;
    use lipgloss_extras::lipgloss;

    fn route(s: &str) -> RoutePath {
        RoutePath::parse(s).unwrap()
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }) as Msg
    }

    #[test]
    fn test_route_path_normalization() {
        assert_eq!(route("/settings/").as_str(), "/settings");
        assert_eq!(route("///").as_str(), "/");
        assert_eq!(route("/"), RoutePath::root());
        assert!(RoutePath::parse("settings").is_err());
        assert!(RoutePath::parse("/card request").is_err());
        assert!(RoutePath::parse("").is_err());
    }

    #[test]
    fn test_default_entries_order() {
        let labels: Vec<String> = default_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "Dashboard Summary",
                "Customer Relationship",
                "Transaction & Account Management",
                "Analytics & Reporting",
                "Operations & Compliance",
                "Communication & Engagement",
                "Cheque Book Request",
                "Card Request",
                "Account Opening",
                "Settings",
            ]
        );
    }

    #[test]
    fn test_active_index_exact_match() {
        let nav = Model::default();
        assert_eq!(nav.active_index(&route("/dashboard")), Some(0));
        assert_eq!(nav.active_index(&route("/card-request/")), Some(7));
        assert_eq!(nav.active_index(&route("/card")), None);
        assert_eq!(nav.active_index(&route("/card-request/42")), None);
        assert_eq!(nav.active_index(&RoutePath::root()), None);
    }

    #[test]
    fn test_view_lists_entries_and_logout() {
        let nav = Model::default();
        let plain = lipgloss::strip_ansi(&nav.view(&route("/settings")));
        assert!(plain.contains("Settings"));
        assert!(plain.contains("Logout"));
        // ten entries, the rule and the logout action
        assert_eq!(plain.lines().count(), 12);
    }

    #[test]
    fn test_view_active_uses_active_style() {
        let mut nav = Model::new(vec![
            NavEntry::new("One", route("/one"), IconRef::new("1")),
            NavEntry::new("Two", route("/two"), IconRef::new("2")),
        ])
        .with_width(10);
        nav.styles.active = Style::new().bold(true);

        let two = nav.item_text(&IconRef::new("2"), "Two");
        assert_eq!(two, " 2 Two   ");
        let view = nav.view(&route("/two"));
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines[1], format!(" {}", nav.styles.active.render(&two)));
        let one = nav.item_text(&IconRef::new("1"), "One");
        assert_eq!(lines[0], format!(" {}", nav.styles.item.render(&one)));
    }

    #[test]
    fn test_collapsed_shows_icons_only() {
        let mut nav = Model::default();
        nav.set_collapsed(true);
        let plain = lipgloss::strip_ansi(&nav.view(&route("/dashboard")));
        assert!(!plain.contains("Dashboard Summary"));
        assert!(plain.contains("▣"));
        assert!(!plain.contains("Logout"));
        assert!(plain.contains("⏻"));

        nav.toggle_collapsed();
        assert!(!nav.collapsed());
        let plain = lipgloss::strip_ansi(&nav.view(&route("/dashboard")));
        assert!(plain.contains("Dashboard Summary"));
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let nav = Model::default().with_width(20);
        let plain = lipgloss::strip_ansi(&nav.view(&RoutePath::root()));
        assert!(plain.contains("Transaction & A…"));
        assert!(!plain.contains("Management"));
    }

    #[test]
    fn test_cursor_clamps_at_ends() {
        let mut nav = Model::default();
        nav.cursor_up();
        assert_eq!(nav.cursor(), 0);
        for _ in 0..20 {
            nav.cursor_down();
        }
        assert_eq!(nav.cursor(), 10);
        assert!(nav.on_logout());
    }

    #[test]
    fn test_selection_and_logout() {
        let mut nav = Model::default();
        nav.cursor_down();
        assert_eq!(
            nav.selection(),
            NavigateMsg {
                destination: route("/customer-relationship"),
                kind: NavigateKind::Entry,
            }
        );

        nav.sync_cursor(&route("/settings"));
        assert_eq!(nav.cursor(), 9);
        nav.cursor_down();
        let msg = nav.selection();
        assert_eq!(msg.kind, NavigateKind::Logout);
        assert_eq!(msg.destination, RoutePath::root());
        assert_eq!(nav.logout(), msg);
    }

    #[test]
    fn test_update_requires_focus() {
        let mut nav = Model::default();
        assert!(nav.update(&key(KeyCode::Down)).is_none());
        assert_eq!(nav.cursor(), 0);

        nav.focus();
        assert!(nav.update(&key(KeyCode::Char('j'))).is_none());
        assert_eq!(nav.cursor(), 1);
        assert!(nav.update(&key(KeyCode::Up)).is_none());
        assert_eq!(nav.cursor(), 0);
        assert!(nav.update(&key(KeyCode::Char('['))).is_none());
        assert!(nav.collapsed());
        assert!(nav.update(&key(KeyCode::Enter)).is_some());

        nav.blur();
        assert!(!nav.focused());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abcdef", 0), "");
    }
}
