//! Binds the playback controller to the background field and the scene engines.

use crate::clock::Clock;
use crate::config::StageConfig;
use crate::constants::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::error::{ExplainerError, ExplainerResult};
use crate::paint::Surface;
use crate::rng::{derive_seed, sim_rng};
use crate::scenes::{scene_signals, SceneId, SceneSignals};
use crate::sim::Simulation;
use crate::timeline::{Playback, TickOutcome, TimelineSnapshot};
use crate::viz::{AmbientField, Viewport};

const AMBIENT_STREAM: u64 = 0;

pub struct Stage<C: Clock> {
    playback: Playback<C>,
    ambient: Simulation,
    scenes: Vec<Simulation>,
    signals: [SceneSignals; 5],
}

impl<C: Clock> Stage<C> {
    pub fn new(config: StageConfig, clock: C) -> ExplainerResult<Self> {
        let scene_count = SceneId::ALL.len();
        if config.timeline.total_scenes != scene_count {
            return Err(ExplainerError::invalid_config(format!(
                "stage hosts {} scenes, timeline has {}",
                scene_count, config.timeline.total_scenes
            )));
        }
        let playback = Playback::new(config.timeline.clone(), clock)?;

        let viewport = Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
        let rng_for = |stream: u64| sim_rng(config.seed.map(|s| derive_seed(s, stream)));

        let mut ambient = Simulation::new(
            Box::new(AmbientField::new()),
            rng_for(AMBIENT_STREAM),
            viewport,
        );
        ambient.set_active(true);

        let scenes = SceneId::ALL
            .iter()
            .map(|scene| {
                Simulation::new(
                    scene.visualization().build(),
                    rng_for(scene.index() as u64 + 1),
                    viewport,
                )
            })
            .collect();

        let mut stage = Self {
            playback,
            ambient,
            scenes,
            signals: [SceneSignals::default(); 5],
        };
        stage.apply(stage.playback.snapshot());
        log::info!(
            "[stage] ready: {} scenes, {:.0}ms timeline, seed {:?}",
            scene_count,
            stage.playback.config().total_duration_ms(),
            config.seed
        );
        Ok(stage)
    }

    pub fn playback(&self) -> &Playback<C> {
        &self.playback
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        self.playback.snapshot()
    }

    pub fn signals(&self) -> &[SceneSignals; 5] {
        &self.signals
    }

    pub fn scene(&self, index: usize) -> Option<&Simulation> {
        self.scenes.get(index)
    }

    pub fn ambient(&self) -> &Simulation {
        &self.ambient
    }

    pub fn current_scene(&self) -> SceneId {
        SceneId::from_index(self.playback.current_scene()).unwrap_or(SceneId::MessyToday)
    }

    /// Push one snapshot's signals to every scene. All signals are computed before any is applied.
    fn apply(&mut self, snapshot: TimelineSnapshot) {
        let signals = scene_signals(&snapshot);
        let was = self.signals.iter().position(|s| s.is_active);

        // falling edges first so at most one engine holds entities at a time
        for (sim, s) in self.scenes.iter_mut().zip(&signals) {
            if !s.is_active {
                sim.set_active(false);
            }
        }
        for (sim, s) in self.scenes.iter_mut().zip(&signals) {
            if s.is_active {
                sim.set_active(true);
            }
            if sim.trigger() != s.show_drop {
                sim.set_trigger(s.show_drop);
            }
        }

        if was != Some(snapshot.scene) {
            if let Some(scene) = SceneId::from_index(snapshot.scene) {
                log::info!("[stage] scene {} ({})", scene.index() + 1, scene.label());
            }
        }
        self.signals = signals;
    }

    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.playback.tick();
        if outcome != TickOutcome::Idle {
            self.apply(self.playback.snapshot());
        }
        if outcome == TickOutcome::Completed {
            log::info!("[stage] playback complete");
        }
        outcome
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.playback.toggle_pause()
    }

    /// Rewind to scene one. Every scene goes inactive before the first is re-activated.
    pub fn replay(&mut self) {
        for sim in &mut self.scenes {
            sim.stop();
        }
        self.signals = [SceneSignals::default(); 5];
        self.playback.replay();
        self.apply(self.playback.snapshot());
    }

    pub fn seek(&mut self, index: usize) -> ExplainerResult<()> {
        self.playback.seek(index)?;
        self.apply(self.playback.snapshot());
        Ok(())
    }

    /// Same viewport for every canvas, as in the headless driver.
    pub fn resize(&mut self, viewport: Viewport) {
        self.ambient.on_resize(viewport);
        for sim in &mut self.scenes {
            sim.on_resize(viewport);
        }
    }

    pub fn resize_ambient(&mut self, viewport: Viewport) {
        self.ambient.on_resize(viewport);
    }

    pub fn resize_scene(&mut self, index: usize, viewport: Viewport) -> ExplainerResult<()> {
        let total = self.scenes.len();
        let sim = self
            .scenes
            .get_mut(index)
            .ok_or(ExplainerError::SceneOutOfRange { index, total })?;
        sim.on_resize(viewport);
        Ok(())
    }

    pub fn frame_scene(&mut self, index: usize, surface: Option<&mut dyn Surface>) -> bool {
        match self.scenes.get_mut(index) {
            Some(sim) => sim.frame(surface),
            None => false,
        }
    }

    pub fn frame_ambient(&mut self, surface: Option<&mut dyn Surface>) -> bool {
        self.ambient.frame(surface)
    }

    pub fn teardown(&mut self) {
        self.ambient.stop();
        for sim in &mut self.scenes {
            sim.stop();
        }
        self.signals = [SceneSignals::default(); 5];
        log::info!("[stage] torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::TimelineConfig;

    #[test]
    fn rejects_scene_count_mismatch() {
        let config = StageConfig {
            timeline: TimelineConfig {
                total_scenes: 4,
                ..TimelineConfig::default()
            },
            seed: Some(1),
        };
        assert!(matches!(
            Stage::new(config, ManualClock::default()),
            Err(ExplainerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn first_scene_and_ambient_start_active() {
        let stage = Stage::new(StageConfig::default(), ManualClock::default()).unwrap();
        assert!(stage.ambient().is_active());
        assert!(stage.scene(0).unwrap().is_active());
        assert!((1..5).all(|i| !stage.scene(i).unwrap().is_active()));
        assert_eq!(stage.current_scene(), SceneId::MessyToday);
    }

    #[test]
    fn resize_scene_checks_bounds() {
        let mut stage = Stage::new(StageConfig::default(), ManualClock::default()).unwrap();
        assert!(stage.resize_scene(9, Viewport::new(10.0, 10.0)).is_err());
        assert!(stage.resize_scene(0, Viewport::new(10.0, 10.0)).is_ok());
        assert_eq!(stage.scene(0).unwrap().viewport(), Viewport::new(10.0, 10.0));
    }
}
