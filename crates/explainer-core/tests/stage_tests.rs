// Controller-to-engine wiring through the Stage.

use explainer_core::{
    Clock, DrawList, ManualClock, SceneId, Stage, StageConfig, TickOutcome, Viewport,
};
use glam::Vec2;

const TICK_MS: f64 = 50.0;

fn stage() -> (Stage<ManualClock>, ManualClock) {
    let clock = ManualClock::new(0.0);
    let config = StageConfig {
        seed: Some(2024),
        ..StageConfig::default()
    };
    let stage = Stage::new(config, clock.clone()).unwrap();
    (stage, clock)
}

fn run_until(stage: &mut Stage<ManualClock>, clock: &ManualClock, until_ms: f64) {
    while clock.now_ms() < until_ms {
        clock.advance(TICK_MS);
        stage.tick();
    }
}

#[test]
fn exactly_one_scene_engine_is_live_per_tick() {
    let (mut stage, clock) = stage();
    for _ in 0..600 {
        clock.advance(TICK_MS);
        stage.tick();
        let live: Vec<usize> = (0..5)
            .filter(|&i| stage.scene(i).is_some_and(|s| s.is_active()))
            .collect();
        assert_eq!(live, vec![stage.snapshot().scene]);
        for i in 0..5 {
            if i != stage.snapshot().scene {
                assert_eq!(stage.scene(i).map(|s| s.entity_count()), Some(0));
            }
        }
    }
}

#[test]
fn drop_signal_reaches_only_the_decision_engine() {
    let (mut stage, clock) = stage();
    run_until(&mut stage, &clock, 3.0 * 5_500.0 + 1_400.0);
    assert_eq!(stage.current_scene(), SceneId::Decision);
    assert!(!stage.signals()[3].show_drop);

    run_until(&mut stage, &clock, 3.0 * 5_500.0 + 1_600.0);
    assert!(stage.signals()[3].show_drop);
    assert!(stage.scene(3).is_some_and(|s| s.trigger()));
    assert!((0..5)
        .filter(|&i| i != 3)
        .all(|i| !stage.signals()[i].show_drop));

    let mut surface = DrawList::new(Vec2::new(1280.0, 720.0));
    assert!(stage.frame_scene(3, Some(&mut surface)));
    assert_eq!(stage.scene(3).map(|s| s.entity_count()), Some(16));
}

#[test]
fn inactive_scenes_do_not_draw() {
    let (mut stage, _clock) = stage();
    let mut surface = DrawList::new(Vec2::new(1280.0, 720.0));
    assert!(stage.frame_scene(0, Some(&mut surface)));
    assert!(!stage.frame_scene(1, Some(&mut surface)));
    assert!(!stage.frame_scene(7, Some(&mut surface)));
    assert!(stage.frame_ambient(Some(&mut surface)));
}

#[test]
fn replay_restarts_on_the_first_scene() {
    let (mut stage, clock) = stage();
    run_until(&mut stage, &clock, 28_000.0);
    assert!(stage.snapshot().complete);
    assert_eq!(stage.current_scene(), SceneId::Cta);

    stage.replay();
    let snap = stage.snapshot();
    assert_eq!((snap.scene, snap.progress), (0, 0.0));
    assert!(!snap.complete && !snap.show_drop);
    assert!(stage.scene(0).is_some_and(|s| s.is_active() && s.entity_count() > 0));
    assert!(stage.scene(4).is_some_and(|s| !s.is_active()));

    clock.advance(TICK_MS);
    assert_eq!(stage.tick(), TickOutcome::Advanced);
}

#[test]
fn seek_activates_the_target_scene() {
    let (mut stage, _clock) = stage();
    stage.seek(2).unwrap();
    assert_eq!(stage.current_scene(), SceneId::Prototype);
    assert!(stage.scene(2).is_some_and(|s| s.is_active()));
    assert!(stage.scene(0).is_some_and(|s| !s.is_active()));
    assert!(stage.seek(5).is_err());
    assert_eq!(stage.current_scene(), SceneId::Prototype);
}

#[test]
fn pause_keeps_engines_running_but_freezes_the_timeline() {
    let (mut stage, clock) = stage();
    run_until(&mut stage, &clock, 1_000.0);
    assert!(stage.toggle_pause());
    let frozen = stage.snapshot().progress;

    clock.advance(5_000.0);
    assert_eq!(stage.tick(), TickOutcome::Idle);
    assert_eq!(stage.snapshot().progress, frozen);

    let mut surface = DrawList::new(Vec2::new(1280.0, 720.0));
    assert!(stage.frame_scene(0, Some(&mut surface)));
}

#[test]
fn resize_reinitializes_the_live_engine() {
    let (mut stage, _clock) = stage();
    stage.resize(Viewport::new(640.0, 360.0));
    assert_eq!(stage.scene(0).map(|s| s.viewport()), Some(Viewport::new(640.0, 360.0)));
    assert_eq!(stage.scene(0).map(|s| s.entity_count()), Some(12));
    assert_eq!(stage.ambient().viewport(), Viewport::new(640.0, 360.0));
}

#[test]
fn teardown_stops_everything() {
    let (mut stage, _clock) = stage();
    stage.teardown();
    assert!(!stage.ambient().is_active());
    assert!((0..5).all(|i| stage.scene(i).is_some_and(|s| !s.is_active())));
    let mut surface = DrawList::new(Vec2::new(1280.0, 720.0));
    assert!(!stage.frame_ambient(Some(&mut surface)));
}
