//! Playback controller: one timeline of N equal scene windows.
//!
//! Time is tracked as a *virtual* start instant. Whenever the timeline is
//! (re)anchored (construction, resume, replay, seek) the start instant is
//! recomputed from the accumulated progress, so `elapsed = now - start`
//! continues exactly where it left off. Ticks are no-ops while paused or
//! complete.

use crate::clock::Clock;
use crate::config::TimelineConfig;
use crate::error::{ExplainerError, ExplainerResult};

/// Read-only view handed to scenes and the transport UI after each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineSnapshot {
    pub elapsed_ms: f64,
    pub progress: f64, // 0..=1
    pub scene: usize,
    pub paused: bool,
    pub complete: bool,
    pub show_drop: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Advanced,
    Completed,
}

/// Start instant that makes `now - start` equal the time already played.
#[inline]
pub fn virtual_start_ms(now_ms: f64, progress: f64, total_duration_ms: f64) -> f64 {
    now_ms - progress * total_duration_ms
}

pub struct Playback<C: Clock> {
    config: TimelineConfig,
    clock: C,
    start_ms: f64,
    elapsed_ms: f64,
    progress: f64,
    scene: usize,
    paused: bool,
    complete: bool,
    show_drop: bool,
}

impl<C: Clock> Playback<C> {
    pub fn new(config: TimelineConfig, clock: C) -> ExplainerResult<Self> {
        config.validate()?;
        let start_ms = clock.now_ms();
        Ok(Self {
            config,
            clock,
            start_ms,
            elapsed_ms: 0.0,
            progress: 0.0,
            scene: 0,
            paused: false,
            complete: false,
            show_drop: false,
        })
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn current_scene(&self) -> usize {
        self.scene
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn show_drop(&self) -> bool {
        self.show_drop
    }

    pub fn is_scene_active(&self, index: usize) -> bool {
        index == self.scene
    }

    /// The periodic tick source should run exactly while this is true.
    pub fn wants_ticks(&self) -> bool {
        !self.paused && !self.complete
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            elapsed_ms: self.elapsed_ms,
            progress: self.progress,
            scene: self.scene,
            paused: self.paused,
            complete: self.complete,
            show_drop: self.show_drop,
        }
    }

    fn scene_at(&self, elapsed_ms: f64) -> usize {
        let raw = (elapsed_ms / self.config.scene_duration_ms).floor().max(0.0) as usize;
        raw.min(self.config.total_scenes - 1)
    }

    fn anchor(&mut self) {
        self.start_ms = virtual_start_ms(
            self.clock.now_ms(),
            self.progress,
            self.config.total_duration_ms(),
        );
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.wants_ticks() {
            return TickOutcome::Idle;
        }

        let total = self.config.total_duration_ms();
        let elapsed = (self.clock.now_ms() - self.start_ms).max(0.0);
        let progress = (elapsed / total).min(1.0);
        let scene = self.scene_at(elapsed);

        if scene != self.scene {
            log::debug!("[timeline] scene {} -> {} at {:.0}ms", self.scene, scene, elapsed);
        }
        let trigger_drop = scene == self.config.drop_scene_index
            && elapsed % self.config.scene_duration_ms > self.config.drop_trigger_offset_ms;
        if trigger_drop && !self.show_drop {
            log::debug!("[timeline] drop triggered at {:.0}ms", elapsed);
        }

        self.elapsed_ms = elapsed;
        self.progress = progress;
        self.scene = scene;
        self.show_drop |= trigger_drop;

        if progress >= 1.0 {
            self.complete = true;
            log::debug!("[timeline] complete after {:.0}ms", elapsed);
            return TickOutcome::Completed;
        }
        TickOutcome::Advanced
    }

    /// Returns the new paused state. Completed timelines cannot be paused.
    pub fn toggle_pause(&mut self) -> bool {
        if self.complete {
            return self.paused;
        }
        self.paused = !self.paused;
        if self.paused {
            log::info!("[timeline] paused at {:.1}%", self.progress * 100.0);
        } else {
            self.anchor();
            log::info!("[timeline] resumed at {:.1}%", self.progress * 100.0);
        }
        self.paused
    }

    pub fn replay(&mut self) {
        self.elapsed_ms = 0.0;
        self.progress = 0.0;
        self.scene = 0;
        self.paused = false;
        self.complete = false;
        self.show_drop = false;
        self.anchor();
        log::info!("[timeline] replay");
    }

    /// Jump to a scene. Progress becomes `index / total_scenes`.
    pub fn seek(&mut self, index: usize) -> ExplainerResult<()> {
        let total = self.config.total_scenes;
        if index >= total {
            return Err(ExplainerError::SceneOutOfRange { index, total });
        }
        self.scene = index;
        self.progress = index as f64 / total as f64;
        self.elapsed_ms = self.progress * self.config.total_duration_ms();
        self.complete = false;
        if index < self.config.drop_scene_index {
            self.show_drop = false;
        }
        self.anchor();
        log::info!("[timeline] seek to scene {}", index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn playback() -> (Playback<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000.0);
        let pb = Playback::new(TimelineConfig::default(), clock.clone()).unwrap();
        (pb, clock)
    }

    #[test]
    fn virtual_start_round_trips_elapsed() {
        let start = virtual_start_ms(40_000.0, 0.25, 27_500.0);
        assert_eq!(40_000.0 - start, 6_875.0);
    }

    #[test]
    fn tick_tracks_scene_windows() {
        let (mut pb, clock) = playback();
        clock.advance(5_499.0);
        assert_eq!(pb.tick(), TickOutcome::Advanced);
        assert_eq!(pb.current_scene(), 0);
        clock.advance(1.0);
        pb.tick();
        assert_eq!(pb.current_scene(), 1);
    }

    #[test]
    fn drop_flag_needs_offset_into_scene_four() {
        let (mut pb, clock) = playback();
        clock.advance(3.0 * 5_500.0 + 1_500.0);
        pb.tick();
        assert_eq!(pb.current_scene(), 3);
        assert!(!pb.show_drop(), "offset must be exceeded, not reached");
        clock.advance(50.0);
        pb.tick();
        assert!(pb.show_drop());
        clock.advance(5_500.0);
        pb.tick();
        assert_eq!(pb.current_scene(), 4);
        assert!(pb.show_drop(), "flag is monotonic once raised");
    }

    #[test]
    fn completed_timeline_ignores_pause() {
        let (mut pb, clock) = playback();
        clock.advance(30_000.0);
        assert_eq!(pb.tick(), TickOutcome::Completed);
        assert!(!pb.toggle_pause());
        assert!(!pb.wants_ticks());
    }

    #[test]
    fn seek_rejects_out_of_range() {
        let (mut pb, _clock) = playback();
        assert_eq!(
            pb.seek(5),
            Err(ExplainerError::SceneOutOfRange { index: 5, total: 5 })
        );
        assert_eq!(pb.current_scene(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = TimelineConfig {
            total_scenes: 0,
            ..TimelineConfig::default()
        };
        assert!(Playback::new(cfg, ManualClock::default()).is_err());
    }
}
