//! Branch-operations dashboard demo.
//!
//! Renders the sidebar next to a column of progress cards. Configuration is
//! read from the file named by `BRANCHDASH_CONFIG`; logs go to
//! `branchdash.log` in the system temp directory, filtered by `RUST_LOG`.

use branchdash_widgets::config::{DashboardConfig, CONFIG_ENV_VAR};
use branchdash_widgets::help;
use branchdash_widgets::key::{Binding, KeyMap};
use branchdash_widgets::nav::{self, NavigateKind, NavigateMsg, RoutePath};
use branchdash_widgets::progress;
use branchdash_widgets::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, Program};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static CONFIG: OnceCell<DashboardConfig> = OnceCell::new();

const WIDGET_WIDTH: i32 = 44;

struct AppKeys {
    quit: Binding,
    next_pane: Binding,
    prev_pane: Binding,
    sign_in: Binding,
}

impl Default for AppKeys {
    fn default() -> Self {
        Self {
            quit: Binding::new(vec![
                (KeyCode::Char('q'), KeyModifiers::NONE),
                (KeyCode::Char('c'), KeyModifiers::CONTROL),
            ])
            .with_help("q", "quit"),
            next_pane: Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
                .with_help("→/l", "next pane"),
            prev_pane: Binding::new(vec![KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h", "prev pane"),
            sign_in: Binding::new(vec![KeyCode::Enter]).with_help("enter", "sign in"),
        }
    }
}

impl KeyMap for AppKeys {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next_pane, &self.prev_pane, &self.quit]
    }
}

struct Dashboard {
    config: DashboardConfig,
    route: RoutePath,
    nav: nav::Model,
    widgets: Vec<progress::Model>,
    /// 0 is the sidebar, `i + 1` is widget `i`.
    pane: usize,
    keys: AppKeys,
    help: help::Model,
}

impl Dashboard {
    fn new(config: DashboardConfig) -> Self {
        let mut nav = nav::Model::new(config.nav_entries()).with_collapsed(config.collapsed);
        let route = config.route.clone();
        nav.sync_cursor(&route);
        nav.focus();
        let widgets = Self::mount_widgets(&config);
        Self {
            config,
            route,
            nav,
            widgets,
            pane: 0,
            keys: AppKeys::default(),
            help: help::Model::new().with_width(100),
        }
    }

    fn mount_widgets(config: &DashboardConfig) -> Vec<progress::Model> {
        config
            .widget_configs()
            .into_iter()
            .map(|c| progress::new(c, &[progress::with_width(WIDGET_WIDTH)]))
            .collect()
    }

    fn signed_out(&self) -> bool {
        self.route == RoutePath::root()
    }

    fn set_pane(&mut self, pane: usize) {
        let panes = self.widgets.len() + 1;
        self.pane = pane % panes;
        self.nav.blur();
        for w in &mut self.widgets {
            w.blur();
        }
        if self.pane == 0 {
            self.nav.focus();
        } else if let Some(w) = self.widgets.get_mut(self.pane - 1) {
            w.focus();
        }
    }

    fn navigate(&mut self, msg: &NavigateMsg) {
        info!(destination = %msg.destination, kind = ?msg.kind, "navigating");
        self.route = msg.destination.clone();
        if msg.kind == NavigateKind::Logout {
            for w in &mut self.widgets {
                w.destroy();
            }
            self.widgets.clear();
            self.set_pane(0);
        }
    }

    fn sign_in(&mut self) {
        self.route = self.config.route.clone();
        self.nav.sync_cursor(&self.route);
        self.widgets = Self::mount_widgets(&self.config);
        self.set_pane(0);
        info!(route = %self.route, "signed in");
    }

    fn focused_help(&self) -> String {
        let mut bindings = self.keys.short_help();
        if self.pane == 0 {
            bindings.extend(self.nav.keymap.short_help());
        } else if let Some(w) = self.widgets.get(self.pane - 1) {
            bindings.extend(w.keymap.short_help());
        }
        self.help.short_help_view(bindings)
    }
}

impl BubbleTeaModel for Dashboard {
    fn init() -> (Self, Option<Cmd>) {
        let config = CONFIG.get().cloned().unwrap_or_default();
        (Self::new(config), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(nav_msg) = msg.downcast_ref::<NavigateMsg>() {
            self.navigate(nav_msg);
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keys.quit.matches(key_msg) {
                return Some(bubbletea_rs::quit());
            }
            if self.signed_out() {
                if self.keys.sign_in.matches(key_msg) {
                    self.sign_in();
                }
                return None;
            }
            if self.keys.next_pane.matches(key_msg) {
                self.set_pane(self.pane + 1);
                return None;
            }
            if self.keys.prev_pane.matches(key_msg) {
                let panes = self.widgets.len() + 1;
                self.set_pane(self.pane + panes - 1);
                return None;
            }
        }

        if let Some(cmd) = self.nav.update(&msg) {
            return Some(cmd);
        }
        for w in &mut self.widgets {
            if let Some(cmd) = w.update(&msg) {
                return Some(cmd);
            }
        }
        None
    }

    fn view(&self) -> String {
        if self.signed_out() {
            return format!(
                "Signed out.\n\n{}",
                self.help
                    .short_help_view(vec![&self.keys.sign_in, &self.keys.quit])
            );
        }

        let header = Style::new()
            .bold(true)
            .render(&format!("Branch operations  {}", self.route));
        let cards: Vec<String> = self.widgets.iter().map(|w| w.view()).collect();
        let main = format!("{}\n\n{}", header, cards.join("\n\n"));

        let sidebar = self.nav.view(&self.route);
        let body =
            lipgloss::join_horizontal(lipgloss::TOP, &[sidebar.as_str(), "   ", main.as_str()]);
        format!("{}\n\n{}", body, self.focused_help())
    }
}

fn init_tracing() -> Option<WorkerGuard> {
    let path = std::env::temp_dir().join("branchdash.log");
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("logging disabled: cannot open {}: {}", path.display(), e);
            return None;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn load_config() -> DashboardConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) else {
        return DashboardConfig::default();
    };
    match DashboardConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "falling back to the reference dashboard");
            DashboardConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "branchdash starting");

    let _ = CONFIG.set(load_config());

    let program = Program::<Dashboard>::builder().alt_screen(true).build()?;
    program.run().await?;

    info!("branchdash stopped");
    Ok(())
}
