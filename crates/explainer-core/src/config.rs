use crate::constants::{
    DROP_SCENE_INDEX, DROP_TRIGGER_OFFSET_MS, SCENE_DURATION_MS, TICK_INTERVAL_MS, TOTAL_SCENES,
};
use crate::error::{ExplainerError, ExplainerResult};

/// Fixed schedule of the explainer: N equal scene windows plus the scene-4 drop trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineConfig {
    pub scene_duration_ms: f64,
    pub total_scenes: usize,
    pub tick_interval_ms: u32,
    pub drop_scene_index: usize,
    pub drop_trigger_offset_ms: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            scene_duration_ms: SCENE_DURATION_MS,
            total_scenes: TOTAL_SCENES,
            tick_interval_ms: TICK_INTERVAL_MS,
            drop_scene_index: DROP_SCENE_INDEX,
            drop_trigger_offset_ms: DROP_TRIGGER_OFFSET_MS,
        }
    }
}

impl TimelineConfig {
    pub fn total_duration_ms(&self) -> f64 {
        self.scene_duration_ms * self.total_scenes as f64
    }

    pub fn validate(&self) -> ExplainerResult<()> {
        if !self.scene_duration_ms.is_finite() || self.scene_duration_ms <= 0.0 {
            return Err(ExplainerError::invalid_config(format!(
                "scene duration must be positive, got {}",
                self.scene_duration_ms
            )));
        }
        if self.total_scenes == 0 {
            return Err(ExplainerError::invalid_config(
                "timeline needs at least one scene",
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ExplainerError::invalid_config(
                "tick interval must be non-zero",
            ));
        }
        if self.drop_scene_index >= self.total_scenes {
            return Err(ExplainerError::invalid_config(format!(
                "drop scene {} is outside the {} scene timeline",
                self.drop_scene_index, self.total_scenes
            )));
        }
        if !(self.drop_trigger_offset_ms >= 0.0
            && self.drop_trigger_offset_ms < self.scene_duration_ms)
        {
            return Err(ExplainerError::invalid_config(format!(
                "drop trigger offset {} must fall inside one scene window",
                self.drop_trigger_offset_ms
            )));
        }
        Ok(())
    }
}

/// Everything a [`crate::Stage`] needs; `seed: None` draws engine randomness from entropy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageConfig {
    pub timeline: TimelineConfig,
    pub seed: Option<u64>,
}
