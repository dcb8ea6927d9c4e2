//! State machine of the stepped progress widget.

use super::geometry::{compute_geometry, Geometry};
use super::keymap::ProgressKeyMap;
use super::types::{
    Config, HitTarget, ProgressOption, PulseResetMsg, DEFAULT_WIDTH, INITIAL_STEP,
    PULSE_DURATION, STEPS,
};
use super::view::Styles;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, trace, warn};

// Internal ID management for widget instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// A progress card whose label cycles through [`STEPS`] and whose track
/// pulses for [`PULSE_DURATION`] when activated.
///
/// The two pieces of state are independent: `advance_step` only moves the
/// step index and `trigger_pulse` only touches the pulse. Geometry is derived
/// from the step index and the configured target on every call to
/// [`geometry`](Model::geometry).
///
/// # Examples
///
/// ```rust
/// use branchdash_widgets::progress::{new, Config};
///
/// let mut w = new(Config::new(50.0, "Card requests", "this week", "+4%"), &[]);
/// assert_eq!(w.geometry().display_percentage, 15);
/// assert!((w.geometry().fill_fraction - 0.3).abs() < 1e-9);
///
/// w.advance_step();
/// assert_eq!(w.geometry().display_percentage, 25);
///
/// let _reset = w.trigger_pulse();
/// assert!(w.is_animating());
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    /// An identifier to keep us from receiving messages intended for other
    /// widgets.
    id: i64,

    /// Pulse generation. Only the reset carrying the current tag is honoured.
    tag: i64,

    config: Config,
    step_index: usize,
    animating: bool,
    destroyed: bool,

    focus: bool,
    hit_target: HitTarget,

    /// Total width of the bar line, including the percentage label.
    pub width: i32,
    /// Styles used by `view`.
    pub styles: Styles,
    /// Key bindings handled while focused.
    pub keymap: ProgressKeyMap,
}

/// Creates a widget in its initial state: step 1, not animating, unfocused.
///
/// # Arguments
///
/// * `config` - Target and display strings for the card
/// * `opts` - Construction options applied in order, e.g. [`with_width`](super::with_width)
///
/// A target that is zero, negative or not finite is accepted; the bar then
/// renders empty and a warning is logged.
///
/// # Examples
///
/// ```rust
/// use branchdash_widgets::progress::{declined, new, with_width, Config};
///
/// let w = new(
///     Config::new(75.0, "Cheque books", "vs last week", "-2%"),
///     &[with_width(30), declined()],
/// );
/// assert_eq!(w.width, 30);
/// assert!(!w.config().is_positive);
/// ```
pub fn new(config: Config, opts: &[ProgressOption]) -> Model {
    let mut m = Model {
        id: next_id(),
        tag: 0,
        config,
        step_index: INITIAL_STEP,
        animating: false,
        destroyed: false,
        focus: false,
        hit_target: HitTarget::default(),
        width: DEFAULT_WIDTH,
        styles: Styles::default(),
        keymap: ProgressKeyMap::default(),
    };

    for opt in opts {
        m.apply(opt);
    }

    if !m.config.has_usable_target() {
        warn!(
            id = m.id,
            target = m.config.target,
            title = %m.config.title,
            "progress target is not positive; bar will render empty"
        );
    }

    m
}

impl Model {
    fn apply(&mut self, opt: &ProgressOption) {
        match opt {
            ProgressOption::WithWidth(w) => self.width = *w,
            ProgressOption::WithStyles(styles) => self.styles = styles.clone(),
            ProgressOption::WithKeyMap(keymap) => self.keymap = keymap.clone(),
            ProgressOption::WithStyleClass(class) => {
                self.config.style_class = Some(class.clone());
            }
            ProgressOption::Declined => self.config.is_positive = false,
        }
    }

    /// Unique id of this widget.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The configuration the widget was mounted with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Opaque style class, if one was supplied.
    pub fn style_class(&self) -> Option<&str> {
        self.config.style_class.as_deref()
    }

    /// Current index into [`STEPS`].
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Whether a pulse is currently showing.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether [`destroy`](Model::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The hit target keyboard activation applies to.
    pub fn hit_target(&self) -> HitTarget {
        self.hit_target
    }

    /// Moves keyboard activation to `target`.
    pub fn set_hit_target(&mut self, target: HitTarget) {
        self.hit_target = target;
    }

    /// Derives display percentage and fill fraction from the current state.
    pub fn geometry(&self) -> Geometry {
        compute_geometry(self.step_index, self.config.target)
    }

    /// Moves to the next step, wrapping from the last back to the first.
    ///
    /// Only the step index changes; a running pulse is left alone. Does
    /// nothing after [`destroy`](Model::destroy).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::progress::{new, Config, STEPS};
    ///
    /// let mut w = new(Config::new(100.0, "t", "", ""), &[]);
    /// for _ in 0..STEPS.len() {
    ///     w.advance_step();
    /// }
    /// // A full cycle lands back on the initial step.
    /// assert_eq!(w.geometry().display_percentage, 15);
    /// ```
    pub fn advance_step(&mut self) {
        if self.destroyed {
            return;
        }
        self.step_index = (self.step_index + 1) % STEPS.len();
        debug!(
            id = self.id,
            step_index = self.step_index,
            display_percentage = STEPS[self.step_index],
            "progress step advanced"
        );
    }

    /// Starts a pulse and returns the command that will end it.
    ///
    /// A pulse started while another is pending supersedes it: the earlier
    /// reset still arrives but is ignored, so the pulse lasts a full
    /// [`PULSE_DURATION`] from the latest call. Returns `None` after teardown.
    ///
    /// The returned command must be handed to the bubbletea runtime (or
    /// awaited) and its message fed back into [`update`](Model::update).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::progress::{new, Config};
    ///
    /// let mut w = new(Config::new(50.0, "t", "", ""), &[]);
    /// assert!(w.trigger_pulse().is_some());
    /// assert!(w.is_animating());
    ///
    /// // Feeding back the latest reset ends the pulse.
    /// let reset: bubbletea_rs::Msg = Box::new(w.reset_msg());
    /// w.update(&reset);
    /// assert!(!w.is_animating());
    ///
    /// w.destroy();
    /// assert!(w.trigger_pulse().is_none());
    /// ```
    pub fn trigger_pulse(&mut self) -> Option<Cmd> {
        if self.destroyed {
            return None;
        }
        self.animating = true;
        self.tag += 1;
        debug!(id = self.id, tag = self.tag, "progress pulse started");
        Some(self.pulse_reset())
    }

    /// Activates the focused hit target.
    pub fn activate(&mut self) -> Option<Cmd> {
        match self.hit_target {
            HitTarget::Label => {
                self.advance_step();
                None
            }
            HitTarget::Track => self.trigger_pulse(),
        }
    }

    /// The reset message for the current pulse generation.
    pub fn reset_msg(&self) -> PulseResetMsg {
        PulseResetMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Tears the widget down. Pending resets are invalidated and every later
    /// message or interaction is ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.focus = false;
        self.tag += 1;
        debug!(id = self.id, "progress widget destroyed");
    }

    fn pulse_reset(&self) -> Cmd {
        let msg = self.reset_msg();
        bubbletea_tick(PULSE_DURATION, move |_| Box::new(msg.clone()) as Msg)
    }

    fn handle_reset(&mut self, reset: &PulseResetMsg) {
        if reset.id != self.id {
            return;
        }
        if self.destroyed {
            trace!(id = self.id, tag = reset.tag, "pulse reset after teardown ignored");
            return;
        }
        // If the tag isn't the one we expect, a newer pulse superseded it.
        if reset.tag != self.tag {
            trace!(
                id = self.id,
                tag = reset.tag,
                current = self.tag,
                "superseded pulse reset ignored"
            );
            return;
        }
        self.animating = false;
        debug!(id = self.id, tag = self.tag, "progress pulse ended");
    }

    /// Handles pulse resets and, while focused, key presses.
    ///
    /// Resets addressed to another widget, resets from a superseded pulse and
    /// anything arriving after teardown are ignored. Key presses map to the
    /// bindings in [`keymap`](Model::keymap).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use branchdash_widgets::progress::{new, Config};
    /// use branchdash_widgets::Component;
    /// use bubbletea_rs::{KeyMsg, Msg};
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let mut w = new(Config::new(50.0, "t", "", ""), &[]);
    /// let advance: Msg = Box::new(KeyMsg {
    ///     key: KeyCode::Char('s'),
    ///     modifiers: KeyModifiers::NONE,
    /// });
    ///
    /// w.update(&advance);
    /// assert_eq!(w.step_index(), 1);
    ///
    /// w.focus();
    /// w.update(&advance);
    /// assert_eq!(w.step_index(), 2);
    /// ```
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(reset) = msg.downcast_ref::<PulseResetMsg>() {
            self.handle_reset(reset);
            return None;
        }

        if !self.focus || self.destroyed {
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.advance_step.matches(key_msg) {
                self.advance_step();
            } else if self.keymap.pulse.matches(key_msg) {
                return self.trigger_pulse();
            } else if self.keymap.switch_target.matches(key_msg) {
                self.hit_target = self.hit_target.toggle();
            } else if self.keymap.activate.matches(key_msg) {
                return self.activate();
            }
        }

        None
    }
}

impl crate::Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        if !self.destroyed {
            self.focus = true;
        }
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = new(Config::default(), &[]);
        model.focus = true;
        (model, None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        Model::update(self, &msg)
    }

    fn view(&self) -> String {
        Model::view(self)
    }
}

impl Default for Model {
    fn default() -> Self {
        new(Config::default(), &[])
    }
}
