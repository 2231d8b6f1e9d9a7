//! Activation-gated wrapper around one visualization engine.

use crate::paint::Surface;
use crate::rng::SimRng;
use crate::viz::{Viewport, Visualization};

pub struct Simulation {
    engine: Box<dyn Visualization>,
    rng: SimRng,
    viewport: Viewport,
    active: bool,
    trigger: bool,
    frames: u64,
}

impl Simulation {
    pub fn new(engine: Box<dyn Visualization>, rng: SimRng, viewport: Viewport) -> Self {
        Self {
            engine,
            rng,
            viewport,
            active: false,
            trigger: false,
            frames: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn engine(&self) -> &dyn Visualization {
        self.engine.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn trigger(&self) -> bool {
        self.trigger
    }

    /// Frames actually simulated since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn entity_count(&self) -> usize {
        self.engine.entity_count()
    }

    /// Rising edge builds fresh entities, falling edge drops them.
    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        self.active = active;
        if active {
            self.engine.init(self.viewport, &mut self.rng);
            log::debug!(
                "[sim] {} activated with {} entities",
                self.engine.name(),
                self.engine.entity_count()
            );
        } else {
            self.engine.release();
            log::debug!("[sim] {} released", self.engine.name());
        }
    }

    pub fn set_trigger(&mut self, armed: bool) {
        self.trigger = armed;
        self.engine.set_trigger(armed);
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if self.active && !viewport.is_drawable() {
            log::warn!("[sim] {} has a zero-size viewport", self.engine.name());
        }
        if self.active {
            self.engine.init(viewport, &mut self.rng);
            log::debug!(
                "[sim] {} re-initialised for {:.0}x{:.0}",
                self.engine.name(),
                viewport.width,
                viewport.height
            );
        }
    }

    /// One constant-timestep frame. Returns `false` when nothing was drawn.
    pub fn frame(&mut self, surface: Option<&mut dyn Surface>) -> bool {
        if !self.active || !self.viewport.is_drawable() {
            return false;
        }
        let Some(surface) = surface else {
            return false;
        };
        self.engine.step(&mut self.rng);
        surface.clear();
        self.engine.render(surface);
        self.frames += 1;
        true
    }

    pub fn stop(&mut self) {
        self.set_active(false);
        self.set_trigger(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::DrawList;
    use crate::rng::sim_rng;
    use crate::viz::{GravityDrop, SpringNetwork};

    fn network_sim() -> Simulation {
        Simulation::new(
            Box::new(SpringNetwork::new()),
            sim_rng(Some(1)),
            Viewport::new(640.0, 360.0),
        )
    }

    #[test]
    fn inactive_frames_are_skipped() {
        let mut sim = network_sim();
        let mut list = DrawList::new(glam::Vec2::new(640.0, 360.0));
        assert!(!sim.frame(Some(&mut list)));
        assert_eq!(list.clear_count(), 0);
        assert_eq!(sim.entity_count(), 0);
    }

    #[test]
    fn missing_surface_is_silent() {
        let mut sim = network_sim();
        sim.set_active(true);
        assert!(!sim.frame(None));
        assert_eq!(sim.frames(), 0);
    }

    #[test]
    fn active_frame_clears_then_draws() {
        let mut sim = network_sim();
        sim.set_active(true);
        assert_eq!(sim.entity_count(), 12);
        let mut list = DrawList::new(glam::Vec2::new(640.0, 360.0));
        assert!(sim.frame(Some(&mut list)));
        assert_eq!(list.clear_count(), 1);
        assert!(!list.commands().is_empty());
    }

    #[test]
    fn deactivation_releases_entities() {
        let mut sim = network_sim();
        sim.set_active(true);
        sim.set_active(false);
        assert_eq!(sim.entity_count(), 0);
    }

    #[test]
    fn zero_area_viewport_does_not_render() {
        let mut sim = network_sim();
        sim.set_active(true);
        sim.on_resize(Viewport::new(0.0, 0.0));
        let mut list = DrawList::new(glam::Vec2::ZERO);
        assert!(!sim.frame(Some(&mut list)));
    }

    #[test]
    fn stop_disarms_the_trigger() {
        let mut sim = Simulation::new(
            Box::new(GravityDrop::new()),
            sim_rng(Some(2)),
            Viewport::new(640.0, 360.0),
        );
        sim.set_active(true);
        sim.set_trigger(true);
        let mut list = DrawList::new(glam::Vec2::new(640.0, 360.0));
        sim.frame(Some(&mut list));
        assert_eq!(sim.entity_count(), 16);
        sim.stop();
        assert!(!sim.is_active() && !sim.trigger());
        assert_eq!(sim.entity_count(), 0);
    }
}
