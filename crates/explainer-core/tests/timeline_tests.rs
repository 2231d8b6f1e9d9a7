// Host-side timeline properties driven by a hand-advanced clock.

use explainer_core::{ManualClock, Playback, TickOutcome, TimelineConfig};

const T0: f64 = 10_000.0;

fn playback() -> (Playback<ManualClock>, ManualClock) {
    let clock = ManualClock::new(T0);
    let pb = Playback::new(TimelineConfig::default(), clock.clone()).unwrap();
    (pb, clock)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn mid_timeline_reports_scene_and_progress() {
    let (mut pb, clock) = playback();
    clock.set(T0 + 12_000.0);
    assert_eq!(pb.tick(), TickOutcome::Advanced);
    assert_eq!(pb.current_scene(), 2);
    assert!(close(pb.progress(), 12_000.0 / 27_500.0));
    assert!((pb.progress() * 100.0 - 43.636).abs() < 1e-3);
    assert!(!pb.is_complete());
}

#[test]
fn end_of_timeline_completes_on_last_scene() {
    let (mut pb, clock) = playback();
    clock.set(T0 + 27_500.0);
    assert_eq!(pb.tick(), TickOutcome::Completed);
    assert_eq!(pb.current_scene(), 4);
    assert_eq!(pb.progress(), 1.0);
    assert!(pb.is_complete());
}

#[test]
fn overrun_clamps_scene_and_progress() {
    let (mut pb, clock) = playback();
    clock.set(T0 + 90_000.0);
    pb.tick();
    assert_eq!(pb.current_scene(), 4);
    assert_eq!(pb.progress(), 1.0);
}

#[test]
fn ticks_after_completion_change_nothing() {
    let (mut pb, clock) = playback();
    clock.set(T0 + 28_000.0);
    pb.tick();
    let before = pb.snapshot();
    clock.advance(5_000.0);
    assert_eq!(pb.tick(), TickOutcome::Idle);
    assert_eq!(pb.snapshot(), before);
}

#[test]
fn pause_freezes_and_resume_continues_without_a_jump() {
    let (mut pb, clock) = playback();
    clock.advance(3_000.0);
    pb.tick();
    assert!(pb.toggle_pause());

    clock.advance(10_000.0);
    assert_eq!(pb.tick(), TickOutcome::Idle);
    assert!(close(pb.elapsed_ms(), 3_000.0));

    assert!(!pb.toggle_pause());
    clock.advance(1_000.0);
    pb.tick();
    assert!(close(pb.elapsed_ms(), 4_000.0));
    assert_eq!(pb.current_scene(), 0);
}

#[test]
fn progress_never_decreases_while_playing() {
    let (mut pb, clock) = playback();
    let mut last = 0.0;
    for step in 0..700 {
        clock.advance(50.0);
        if step == 200 || step == 260 {
            pb.toggle_pause();
        }
        pb.tick();
        assert!(pb.progress() >= last);
        last = pb.progress();
    }
    assert!(pb.is_complete());
}

#[test]
fn replay_resets_everything() {
    let (mut pb, clock) = playback();
    clock.advance(20_000.0);
    pb.tick();
    assert!(pb.show_drop());
    pb.replay();
    let s = pb.snapshot();
    assert_eq!((s.scene, s.progress, s.elapsed_ms), (0, 0.0, 0.0));
    assert!(!s.paused && !s.complete && !s.show_drop);

    clock.advance(100.0);
    pb.tick();
    assert!(close(pb.elapsed_ms(), 100.0));
}

#[test]
fn replay_after_completion_restarts_ticking() {
    let (mut pb, clock) = playback();
    clock.advance(30_000.0);
    pb.tick();
    assert!(!pb.wants_ticks());
    pb.replay();
    assert!(pb.wants_ticks());
}

#[test]
fn seek_sets_progress_from_scene_index() {
    let (mut pb, clock) = playback();
    pb.seek(1).unwrap();
    assert_eq!(pb.current_scene(), 1);
    assert!(close(pb.progress(), 0.2));
    assert!(close(pb.elapsed_ms(), 5_500.0));

    clock.advance(250.0);
    pb.tick();
    assert!(close(pb.elapsed_ms(), 5_750.0));
    assert_eq!(pb.current_scene(), 1);
}

#[test]
fn seek_from_completed_resumes_playback() {
    let (mut pb, clock) = playback();
    clock.advance(30_000.0);
    pb.tick();
    pb.seek(2).unwrap();
    assert!(!pb.is_complete());
    assert_eq!(pb.tick(), TickOutcome::Advanced);
    assert_eq!(pb.current_scene(), 2);
}

#[test]
fn seek_before_drop_scene_clears_the_drop() {
    let (mut pb, clock) = playback();
    clock.advance(3.0 * 5_500.0 + 2_000.0);
    pb.tick();
    assert!(pb.show_drop());

    pb.seek(4).unwrap();
    assert!(pb.show_drop(), "seeking forward keeps the drop");
    pb.seek(2).unwrap();
    assert!(!pb.show_drop());
}

#[test]
fn seek_while_paused_stays_paused() {
    let (mut pb, clock) = playback();
    pb.toggle_pause();
    pb.seek(3).unwrap();
    clock.advance(1_000.0);
    assert_eq!(pb.tick(), TickOutcome::Idle);
    assert!(close(pb.elapsed_ms(), 3.0 * 5_500.0));
}
