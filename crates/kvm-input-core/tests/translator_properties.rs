//! Integration tests for the key event translator.
//!
//! These drive `KeyEventTranslator` through its public API only, with a
//! `ManualClock` standing in for real time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use kvm_input_core::{
    KeyEventTranslator, KeySnapshot, ManualClock, TargetPlatform, TranslatorConfig,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Log = Arc<Mutex<Vec<KeySnapshot>>>;

fn translator(platform: TargetPlatform) -> (KeyEventTranslator, Arc<ManualClock>, Log) {
    let clock = Arc::new(ManualClock::new());
    let mut t = KeyEventTranslator::new(TranslatorConfig::for_platform(platform), clock.clone());
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    t.subscribe(move |s: &KeySnapshot| sink.lock().unwrap().push(s.clone()));
    (t, clock, log)
}

fn keys(t: &KeyEventTranslator) -> Vec<String> {
    t.pressed_keys().iter().map(|k| k.to_string()).collect()
}

fn count(log: &Log) -> usize {
    log.lock().unwrap().len()
}

// ── Ordering and idempotence ──────────────────────────────────────────────────

#[test]
fn test_distinct_key_downs_are_kept_once_in_first_seen_order() {
    let (mut t, _clock, _log) = translator(TargetPlatform::Linux);

    for code in ["ShiftLeft", "KeyH", "ShiftLeft", "KeyI", "KeyH", "Digit1"] {
        t.on_key_down(code);
    }

    assert_eq!(keys(&t), ["ShiftLeft", "KeyH", "KeyI", "Digit1"]);
}

#[test]
fn test_repeated_key_down_produces_no_notification() {
    let (mut t, _clock, log) = translator(TargetPlatform::Windows);
    t.on_key_down("KeyQ");
    let before = count(&log);

    t.on_key_down("KeyQ");
    t.on_key_down("KeyQ");

    assert_eq!(count(&log), before);
    assert_eq!(keys(&t), ["KeyQ"]);
}

#[test]
fn test_notifications_carry_insertion_order_not_sorted_order() {
    let (mut t, _clock, log) = translator(TargetPlatform::Linux);
    t.on_key_down("ShiftLeft");
    t.on_key_down("KeyZ");
    t.on_key_down("AltLeft");

    let log = log.lock().unwrap();
    let last: Vec<&str> = log.last().unwrap().keys.iter().map(|k| k.as_str()).collect();
    assert_eq!(last, ["ShiftLeft", "KeyZ", "AltLeft"]);
}

// ── AltGr disambiguation ──────────────────────────────────────────────────────

#[test]
fn test_altgr_chord_never_surfaces_control() {
    let (mut t, clock, log) = translator(TargetPlatform::Windows);

    t.on_key_down("ControlLeft");
    clock.advance(Duration::from_millis(2));
    t.on_key_down("AltRight");
    clock.advance(Duration::from_millis(100));
    t.poll_timer();

    assert_eq!(keys(&t), ["AltRight"]);
    let log = log.lock().unwrap();
    assert!(
        log.iter().all(|s| !s.keys.iter().any(|k| k == "ControlLeft")),
        "ControlLeft must not appear in any snapshot"
    );
}

#[test]
fn test_altgr_chord_release_sequence() {
    let (mut t, _clock, log) = translator(TargetPlatform::Windows);
    t.on_key_down("ControlLeft");
    t.on_key_down("AltRight");
    t.on_key_down("KeyQ");
    t.on_key_up("KeyQ");
    t.on_key_up("ControlLeft");
    t.on_key_up("AltRight");

    assert!(keys(&t).is_empty());
    // AltRight, AltRight+KeyQ, AltRight, [].  The ControlLeft release is a
    // tracking miss and sends nothing.
    assert_eq!(count(&log), 4);
    assert_eq!(t.stats().untracked_releases, 1);
}

#[test]
fn test_real_ctrl_combination_within_window() {
    let (mut t, clock, _log) = translator(TargetPlatform::Windows);

    t.on_key_down("ControlLeft");
    clock.advance(Duration::from_millis(20));
    t.on_key_down("KeyC");

    assert_eq!(keys(&t), ["ControlLeft", "KeyC"]);
}

#[test]
fn test_lone_control_resolves_at_deadline_not_at_press() {
    let (mut t, clock, log) = translator(TargetPlatform::Windows);

    clock.set(Duration::from_millis(1_000));
    t.on_key_down("ControlLeft");
    assert_eq!(count(&log), 0, "no notification at press time");

    clock.advance(Duration::from_millis(50));
    assert!(t.poll_timer());

    assert_eq!(keys(&t), ["ControlLeft"]);
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].timestamp_ms, 1_050.0);
}

#[test]
fn test_ctrl_combination_after_window_is_plain() {
    let (mut t, clock, _log) = translator(TargetPlatform::Windows);
    t.on_key_down("ControlLeft");
    clock.advance(Duration::from_millis(60));
    t.poll_timer();
    t.on_key_down("AltRight");

    // Past the window, Ctrl+AltRight is a genuine chord.
    assert_eq!(keys(&t), ["ControlLeft", "AltRight"]);
}

#[test]
fn test_non_windows_platform_forwards_control_immediately() {
    let (mut t, _clock, log) = translator(TargetPlatform::Linux);
    t.on_key_down("ControlLeft");
    t.on_key_down("AltRight");
    assert_eq!(keys(&t), ["ControlLeft", "AltRight"]);
    assert_eq!(count(&log), 2);
    assert!(t.pending_deadline().is_none());
}

// ── Release paths ─────────────────────────────────────────────────────────────

#[test]
fn test_meta_release_clears_even_when_meta_was_never_pressed() {
    let (mut t, _clock, _log) = translator(TargetPlatform::Linux);
    t.on_key_down("ControlLeft");
    t.on_key_down("KeyA");

    t.on_key_up("MetaLeft");

    assert!(keys(&t).is_empty());
}

#[test]
fn test_meta_right_release_sends_one_empty_snapshot() {
    let (mut t, _clock, log) = translator(TargetPlatform::Linux);
    t.on_key_down("MetaRight");
    t.on_key_down("KeyL");
    let before = count(&log);

    t.on_key_up("MetaRight");

    let log = log.lock().unwrap();
    assert_eq!(log.len(), before + 1);
    assert!(log.last().unwrap().is_empty());
}

#[test]
fn test_release_all_on_non_empty_set_notifies_once_with_empty_list() {
    let (mut t, _clock, log) = translator(TargetPlatform::Linux);
    t.on_key_down("ShiftLeft");
    t.on_key_down("KeyA");
    let before = count(&log);

    t.release_all();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), before + 1);
    assert!(log.last().unwrap().keys.is_empty());
}

#[test]
fn test_release_all_on_empty_set_is_silent() {
    let (mut t, _clock, log) = translator(TargetPlatform::Linux);
    t.release_all();
    assert_eq!(count(&log), 0);
}

#[test]
fn test_untracked_release_leaves_state_untouched() {
    let (mut t, _clock, log) = translator(TargetPlatform::Windows);
    t.on_key_down("KeyA");
    let before = count(&log);

    t.on_key_up("KeyZ");

    assert_eq!(keys(&t), ["KeyA"]);
    assert_eq!(count(&log), before);
}

#[test]
fn test_release_after_release_all_is_tolerated() {
    let (mut t, _clock, _log) = translator(TargetPlatform::Linux);
    t.on_key_down("KeyA");
    t.release_all();
    t.on_key_up("KeyA");
    t.on_virtual_key_release("a");
    assert!(keys(&t).is_empty());
    assert_eq!(t.stats().untracked_releases, 2);
}

// ── Mixed sources ─────────────────────────────────────────────────────────────

#[test]
fn test_virtual_release_of_physically_pressed_key() {
    let (mut t, _clock, _log) = translator(TargetPlatform::Linux);
    t.on_key_down("KeyA");
    t.on_virtual_key_release("a");
    assert!(keys(&t).is_empty());
}

#[test]
fn test_virtual_press_does_not_duplicate_physical_press() {
    let (mut t, _clock, log) = translator(TargetPlatform::Linux);
    t.on_key_down("Enter");
    t.on_virtual_key_press("{enter}");
    assert_eq!(keys(&t), ["Enter"]);
    assert_eq!(count(&log), 1);
}
