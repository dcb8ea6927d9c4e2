//! Tests for the progress widget state machine.

use super::*;
use crate::Component;
use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::lipgloss;

fn widget(target: f64) -> Model {
    new(Config::new(target, "Account opening", "vs last month", "+12%"), &[])
}

fn key(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    }) as Msg
}

fn deliver(w: &mut Model, reset: PulseResetMsg) {
    let msg = Box::new(reset) as Msg;
    assert!(w.update(&msg).is_none());
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_initial_state() {
    let w = widget(50.0);
    assert_eq!(w.step_index(), INITIAL_STEP);
    assert_eq!(w.geometry().display_percentage, 15);
    assert!(!w.is_animating());
    assert!(!w.is_destroyed());
    assert!(!w.focused());
    assert_eq!(w.hit_target(), HitTarget::Label);
    assert!(w.config().is_positive);
}

#[test]
fn test_advance_step_wraps_modulo_steps() {
    let mut w = widget(100.0);
    for n in 1..=30 {
        w.advance_step();
        let expected = (INITIAL_STEP + n) % STEPS.len();
        assert_eq!(w.step_index(), expected);
        assert_eq!(w.geometry().display_percentage, STEPS[expected]);
    }
}

#[test]
fn test_advance_step_leaves_pulse_alone() {
    let mut w = widget(100.0);
    let _reset = w.trigger_pulse();
    w.advance_step();
    assert!(w.is_animating());

    let mut idle = widget(100.0);
    idle.advance_step();
    assert!(!idle.is_animating());
}

#[test]
fn test_target_fifty_scenario() {
    let mut w = widget(50.0);
    let g = w.geometry();
    assert_eq!(g.display_percentage, 15);
    assert!(approx(g.fill_fraction, 0.30));

    w.advance_step();
    let g = w.geometry();
    assert_eq!(g.display_percentage, 25);
    assert!(approx(g.fill_fraction, 0.50));

    let mut seen = Vec::new();
    for _ in 0..6 {
        w.advance_step();
        seen.push(w.geometry().display_percentage);
    }
    assert_eq!(seen, vec![35, 50, 75, 100, 10, 15]);
    assert_eq!(w.step_index(), 1);
    // 75 and 100 exceed the target and clamp to a full bar.
    assert_eq!(compute_geometry(5, 50.0).fill_fraction, 1.0);
}

#[test]
fn test_geometry_is_idempotent() {
    let mut w = widget(35.0);
    w.advance_step();
    let first = w.geometry();
    let second = w.geometry();
    assert_eq!(first, second);
    assert_eq!(w.view(), w.view());
}

#[test]
fn test_zero_and_negative_target_render_empty() {
    for target in [0.0, -20.0] {
        let mut w = widget(target);
        for _ in 0..STEPS.len() {
            let g = w.geometry();
            assert_eq!(g.fill_fraction, 0.0);
            assert!(g.fill_fraction.is_finite());
            w.advance_step();
        }
    }
}

#[test]
fn test_trigger_pulse_sets_animating_synchronously() {
    let mut w = widget(50.0);
    let cmd = w.trigger_pulse();
    assert!(cmd.is_some());
    assert!(w.is_animating());
}

#[test]
fn test_pulse_reset_clears_animation() {
    let mut w = widget(50.0);
    let _cmd = w.trigger_pulse();
    let reset = w.reset_msg();
    deliver(&mut w, reset);
    assert!(!w.is_animating());
}

#[test]
fn test_retrigger_supersedes_pending_reset() {
    let mut w = widget(50.0);

    // t = 0
    let _first = w.trigger_pulse();
    let reset_at_1000 = w.reset_msg();

    // t = 500
    let _second = w.trigger_pulse();
    let reset_at_1500 = w.reset_msg();
    assert!(w.is_animating());

    // t = 1000: the first reset is stale.
    deliver(&mut w, reset_at_1000);
    assert!(w.is_animating());

    // t = 1500
    deliver(&mut w, reset_at_1500);
    assert!(!w.is_animating());
}

#[test]
fn test_reset_for_other_widget_is_ignored() {
    let mut a = widget(50.0);
    let mut b = widget(50.0);
    assert_ne!(a.id(), b.id());

    let _a_cmd = a.trigger_pulse();
    let _b_cmd = b.trigger_pulse();
    let b_reset = b.reset_msg();
    deliver(&mut a, b_reset.clone());
    assert!(a.is_animating());

    deliver(&mut b, b_reset);
    assert!(!b.is_animating());
}

#[test]
fn test_destroy_ignores_pending_reset() {
    let mut w = widget(50.0);
    let _cmd = w.trigger_pulse();
    let pending = w.reset_msg();

    w.destroy();
    assert!(w.is_destroyed());
    let step_before = w.step_index();

    deliver(&mut w, pending);
    assert!(w.is_animating(), "reset after teardown must not write state");
    assert_eq!(w.step_index(), step_before);

    // Interactions after teardown are inert as well.
    assert!(w.trigger_pulse().is_none());
    w.advance_step();
    assert_eq!(w.step_index(), step_before);

    // Destroying twice is harmless.
    w.destroy();
    assert!(w.is_destroyed());
}

#[test]
fn test_keys_ignored_when_unfocused() {
    let mut w = widget(50.0);
    assert!(w.update(&key(KeyCode::Char('s'))).is_none());
    assert!(w.update(&key(KeyCode::Char('p'))).is_none());
    assert_eq!(w.step_index(), INITIAL_STEP);
    assert!(!w.is_animating());
}

#[test]
fn test_key_bindings_when_focused() {
    let mut w = widget(50.0);
    w.focus();

    assert!(w.update(&key(KeyCode::Char('s'))).is_none());
    assert_eq!(w.step_index(), 2);

    assert!(w.update(&key(KeyCode::Char('p'))).is_some());
    assert!(w.is_animating());
}

#[test]
fn test_activate_follows_hit_target() {
    let mut w = widget(50.0);
    w.focus();

    // Label is the default hit target.
    assert!(w.update(&key(KeyCode::Enter)).is_none());
    assert_eq!(w.step_index(), 2);
    assert!(!w.is_animating());

    w.update(&key(KeyCode::Tab));
    assert_eq!(w.hit_target(), HitTarget::Track);
    assert!(w.update(&key(KeyCode::Char(' '))).is_some());
    assert!(w.is_animating());
    assert_eq!(w.step_index(), 2);

    w.set_hit_target(HitTarget::Label);
    assert!(w.activate().is_none());
    assert_eq!(w.step_index(), 3);
}

#[test]
fn test_focus_refused_after_destroy() {
    let mut w = widget(50.0);
    w.focus();
    w.destroy();
    assert!(!w.focused());
    w.focus();
    assert!(!w.focused());
}

#[test]
fn test_options() {
    let w = new(
        Config::new(80.0, "Cards", "", "-2%"),
        &[with_width(24), with_style_class("card-compact"), declined()],
    );
    assert_eq!(w.width, 24);
    assert_eq!(w.style_class(), Some("card-compact"));
    assert!(!w.config().is_positive);
}

#[test]
fn test_view_contains_label_and_indicator() {
    let w = new(
        Config::new(50.0, "Account opening", "vs last month", "+12%"),
        &[with_width(25)],
    );
    let view = lipgloss::strip_ansi(&w.view());
    let lines: Vec<&str> = view.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Account opening");
    assert!(lines[1].ends_with("  15%"));
    assert!(lines[2].starts_with("▲ +12%"));
    assert!(lines[2].ends_with("vs last month"));

    let down = new(Config::new(50.0, "x", "", "-3%"), &[declined()]);
    let view = lipgloss::strip_ansi(&down.view());
    assert!(view.contains("▼ -3%"));
}

#[test]
fn test_view_bar_width_and_fill() {
    // 25 cells total; the five cell label leaves a 20 cell track.
    let mut w = new(Config::new(50.0, "t", "", ""), &[with_width(25)]);
    let bar = |w: &Model| {
        let view = lipgloss::strip_ansi(&w.view());
        view.lines().nth(1).unwrap_or_default().to_string()
    };

    let line = bar(&w);
    assert_eq!(lipgloss::width_visible(&line), 25);
    assert_eq!(line.chars().filter(|&c| c == '█').count(), 6); // 0.3 * 20
    assert_eq!(line.chars().filter(|&c| c == '░').count(), 14);

    // 100 against 50 stays inside the track.
    for _ in 0..5 {
        w.advance_step();
    }
    assert_eq!(w.geometry().display_percentage, 100);
    let line = bar(&w);
    assert_eq!(line.chars().filter(|&c| c == '█').count(), 20);
    assert_eq!(line.chars().filter(|&c| c == '░').count(), 0);
}

#[test]
fn test_view_as_preview() {
    let w = new(Config::new(50.0, "t", "", ""), &[with_width(14)]);
    let preview = w.view_as(Geometry {
        display_percentage: 50,
        fill_fraction: 1.0,
    });
    // " 50%" is padded to five cells, leaving nine for the track.
    let line = lipgloss::strip_ansi(&preview);
    assert!(line.contains("█████████  50%"));
    assert_eq!(line.chars().filter(|&c| c == '█').count(), 9);
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: Config = toml::from_str("target = 40\ntitle = \"Cheques\"").unwrap();
    assert_eq!(config.target, 40.0);
    assert!(config.is_positive);
    assert_eq!(config.style_class, None);

    let missing: Config = toml::from_str("title = \"No target\"").unwrap();
    assert!(!missing.has_usable_target());
    assert_eq!(compute_geometry(0, missing.target).fill_fraction, 0.0);
}

#[test]
fn test_pulse_duration_is_one_second() {
    assert_eq!(PULSE_DURATION, std::time::Duration::from_millis(1000));
}

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_resets_supersede_on_paused_clock() {
    use std::time::Duration;
    use tokio::time::{advance, Instant};

    let start = Instant::now();
    let mut w = widget(50.0);

    let first = tokio::spawn(w.trigger_pulse().unwrap());
    settle().await;
    advance(Duration::from_millis(500)).await;
    let second = tokio::spawn(w.trigger_pulse().unwrap());
    settle().await;

    advance(Duration::from_millis(499)).await;
    settle().await;
    assert!(!first.is_finished());
    assert!(w.is_animating());

    let stale = first.await.unwrap().unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
    let stale_reset = stale.downcast_ref::<PulseResetMsg>().unwrap().clone();
    assert_eq!(stale_reset.id(), w.id());
    assert!(w.update(&stale).is_none());
    assert!(w.is_animating());

    let current = second.await.unwrap().unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
    assert_eq!(current.downcast_ref::<PulseResetMsg>(), Some(&w.reset_msg()));
    assert!(w.update(&current).is_none());
    assert!(!w.is_animating());
}
