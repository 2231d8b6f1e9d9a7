// Engine properties that hold for any seed and viewport.

use explainer_core::rng::sim_rng;
use explainer_core::viz::gravity::{BOB_AMPLITUDE, TRAILING_COUNT};
use explainer_core::viz::{
    AmbientField, ConvergingOrbit, FlowPipeline, GravityDrop, SpringNetwork, WaveField,
    WaveVariant,
};
use explainer_core::{DrawList, Viewport, Visualization};
use glam::Vec2;

fn engines() -> Vec<Box<dyn Visualization>> {
    vec![
        Box::new(AmbientField::new()),
        Box::new(ConvergingOrbit::new()),
        Box::new(FlowPipeline::new()),
        Box::new(WaveField::new(WaveVariant::Chaos)),
        Box::new(WaveField::new(WaveVariant::Order)),
        Box::new(SpringNetwork::new()),
        Box::new(GravityDrop::new()),
    ]
}

#[test]
fn entity_counts_are_fixed_across_frames() {
    let viewport = Viewport::new(1024.0, 640.0);
    for mut engine in engines() {
        let mut rng = sim_rng(Some(17));
        engine.init(viewport, &mut rng);
        let count = engine.entity_count();
        for _ in 0..300 {
            engine.step(&mut rng);
        }
        assert_eq!(engine.entity_count(), count, "{} grew or shrank", engine.name());
    }
}

#[test]
fn release_empties_and_init_rebuilds() {
    let viewport = Viewport::new(800.0, 450.0);
    for mut engine in engines() {
        let mut rng = sim_rng(Some(3));
        engine.init(viewport, &mut rng);
        let count = engine.entity_count();
        engine.release();
        assert_eq!(engine.entity_count(), 0, "{}", engine.name());
        engine.init(viewport, &mut rng);
        assert_eq!(engine.entity_count(), count, "{}", engine.name());
    }
}

#[test]
fn same_seed_draws_the_same_frame() {
    let viewport = Viewport::new(960.0, 540.0);
    let render = |seed: u64| {
        let mut list = DrawList::new(viewport.size());
        let mut rng = sim_rng(Some(seed));
        let mut engine = ConvergingOrbit::new();
        engine.init(viewport, &mut rng);
        for _ in 0..120 {
            engine.step(&mut rng);
        }
        engine.render(&mut list);
        list
    };
    assert_eq!(render(99).commands(), render(99).commands());
    assert_ne!(render(99).commands(), render(100).commands());
}

#[test]
fn every_engine_renders_finite_geometry() {
    let viewport = Viewport::new(1280.0, 720.0);
    for mut engine in engines() {
        let mut rng = sim_rng(Some(8));
        engine.init(viewport, &mut rng);
        engine.set_trigger(true);
        for _ in 0..200 {
            engine.step(&mut rng);
        }
        let mut list = DrawList::new(viewport.size());
        engine.render(&mut list);
        assert!(!list.commands().is_empty(), "{} drew nothing", engine.name());
        let debug = format!("{:?}", list.commands());
        assert!(!debug.contains("NaN") && !debug.contains("inf"), "{}", engine.name());
    }
}

#[test]
fn gravity_bodies_land_and_never_sink_past_target() {
    let viewport = Viewport::new(1280.0, 720.0);
    let mut rng = sim_rng(Some(12));
    let mut gravity = GravityDrop::new();
    gravity.init(viewport, &mut rng);
    gravity.set_trigger(true);

    let mut frames = 0;
    while !gravity.all_landed() {
        gravity.step(&mut rng);
        frames += 1;
        assert!(frames < 1_000, "bodies never came to rest");
        for body in gravity.bodies() {
            let limit = if body.landed { BOB_AMPLITUDE } else { 0.0 };
            assert!(body.pos.y <= body.target.y + limit + 1e-3);
        }
    }
    assert_eq!(gravity.entity_count(), TRAILING_COUNT + 1);

    for _ in 0..200 {
        gravity.step(&mut rng);
        for body in gravity.bodies() {
            assert!((body.pos.y - body.target.y).abs() <= BOB_AMPLITUDE + 1e-3);
        }
    }
}

#[test]
fn gravity_waits_for_the_trigger_edge() {
    let viewport = Viewport::new(1280.0, 720.0);
    let mut rng = sim_rng(Some(12));
    let mut gravity = GravityDrop::new();
    gravity.init(viewport, &mut rng);
    for _ in 0..50 {
        gravity.step(&mut rng);
    }
    assert_eq!(gravity.entity_count(), 0);
    gravity.set_trigger(true);
    gravity.step(&mut rng);
    assert!(gravity.has_dropped());
}

#[test]
fn pipeline_particles_stay_on_their_curves() {
    let viewport = Viewport::new(1200.0, 500.0);
    let mut rng = sim_rng(Some(5));
    let mut pipeline = FlowPipeline::new();
    pipeline.init(viewport, &mut rng);
    for _ in 0..500 {
        pipeline.step(&mut rng);
    }
    for p in pipeline.particles() {
        let path = pipeline.paths()[p.path_index];
        let at = path.sample(p.progress);
        assert_eq!(p.trail.head(), Some(at));
        assert!(at.x >= 0.0 && at.x <= viewport.width);
    }
}

#[test]
fn converging_particles_settle_into_orbit() {
    let viewport = Viewport::new(1280.0, 720.0);
    let mut rng = sim_rng(Some(42));
    let mut orbit = ConvergingOrbit::new();
    orbit.init(viewport, &mut rng);
    for _ in 0..3_000 {
        orbit.step(&mut rng);
    }
    let center = orbit.center();
    for p in orbit.particles() {
        assert!(
            p.pos.distance(center) <= p.orbit_radius * 1.5,
            "particle stuck at {:?}",
            p.pos
        );
    }
    assert!(orbit.particles().iter().filter(|p| p.is_orbiting()).count() > 40);
}

#[test]
fn resize_reflows_resolution_dependent_layout() {
    let mut rng = sim_rng(Some(6));
    let mut network = SpringNetwork::new();
    network.init(Viewport::new(600.0, 400.0), &mut rng);
    let small: Vec<Vec2> = network.nodes().iter().map(|n| n.target).collect();
    network.init(Viewport::new(1200.0, 800.0), &mut rng);
    let large: Vec<Vec2> = network.nodes().iter().map(|n| n.target).collect();
    assert_eq!(small.len(), large.len());
    assert_ne!(small, large);
}
