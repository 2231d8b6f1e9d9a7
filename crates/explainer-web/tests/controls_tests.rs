// Host-side tests for the transport helpers.
// The web crate is wasm-only, so the pure module is included directly.

#![allow(dead_code)]

mod controls {
    include!("../src/controls.rs");
}

use controls::*;

#[test]
fn space_toggles_pause() {
    assert_eq!(command_for_key(" ", 5), Some(Command::TogglePause));
    assert_eq!(command_for_key("Spacebar", 5), Some(Command::TogglePause));
}

#[test]
fn r_replays_in_either_case() {
    assert_eq!(command_for_key("r", 5), Some(Command::Replay));
    assert_eq!(command_for_key("R", 5), Some(Command::Replay));
}

#[test]
fn digits_seek_to_zero_based_scene() {
    assert_eq!(command_for_key("1", 5), Some(Command::Seek(0)));
    assert_eq!(command_for_key("3", 5), Some(Command::Seek(2)));
    assert_eq!(command_for_key("5", 5), Some(Command::Seek(4)));
}

#[test]
fn out_of_range_digits_and_other_keys_are_ignored() {
    assert_eq!(command_for_key("0", 5), None);
    assert_eq!(command_for_key("6", 5), None);
    assert_eq!(command_for_key("9", 5), None);
    assert_eq!(command_for_key("Enter", 5), None);
    assert_eq!(command_for_key("a", 5), None);
    assert_eq!(command_for_key("", 5), None);
}

#[test]
fn only_a_single_digit_key_seeks() {
    assert_eq!(command_for_key("+1", 5), None);
    assert_eq!(command_for_key("01", 5), None);
    assert_eq!(command_for_key("12", 5), None);
    assert_eq!(command_for_key(" 1", 5), None);
    assert_eq!(command_for_key("١", 5), None);
}

#[test]
fn dots_split_into_past_current_future() {
    let states: Vec<_> = (0..5).map(|i| dot_state(i, 2).as_str()).collect();
    assert_eq!(states, ["past", "past", "current", "future", "future"]);
}

#[test]
fn markers_reached_once_their_scene_starts() {
    // marker 0 sits at the start of scene 1
    assert!(!marker_reached(0, 0));
    assert!(marker_reached(0, 1));
    assert!(!marker_reached(3, 3));
    assert!(marker_reached(3, 4));
}

#[test]
fn progress_width_is_clamped_percent() {
    assert_eq!(progress_width_css(0.0), "width: 0.00%");
    assert_eq!(progress_width_css(0.436_36), "width: 43.64%");
    assert_eq!(progress_width_css(1.5), "width: 100.00%");
    assert_eq!(bool_attr(true), "true");
    assert_eq!(bool_attr(false), "false");
}
