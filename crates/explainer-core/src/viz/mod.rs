//! Procedural visualization engines.
//!
//! Every engine follows the same lifecycle: `init` builds a fixed-size entity
//! collection (and any static topology) from the viewport, `step` advances one
//! constant-timestep frame, `render` draws the current state, and `release`
//! drops the entities. Scheduling lives in [`crate::sim::Simulation`].

pub mod ambient;
pub mod converging;
pub mod gravity;
pub mod network;
pub mod pipeline;
pub mod waves;

pub use ambient::AmbientField;
pub use converging::ConvergingOrbit;
pub use gravity::GravityDrop;
pub use network::SpringNetwork;
pub use pipeline::{FlowPath, FlowPipeline};
pub use waves::{WaveField, WaveVariant};

use crate::paint::{Hsla, Paint, Path, StrokeStyle, Surface};
use crate::rng::SimRng;
use glam::Vec2;
use std::collections::VecDeque;

/// Container dimensions in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
        }
    }

    pub fn with_dpr(self, dpr: f32) -> Self {
        Self { dpr, ..self }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Backing-store size for a high-density display.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpr = if self.dpr > 0.0 { self.dpr } else { 1.0 };
        (
            ((self.width * dpr) as u32).max(1),
            ((self.height * dpr) as u32).max(1),
        )
    }
}

/// Most-recent-first position history with a fixed capacity.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push_front(&mut self, p: Vec2) {
        self.points.push_front(p);
        self.points.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn head(&self) -> Option<Vec2> {
        self.points.front().copied()
    }

    pub fn tail(&self) -> Option<Vec2> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    /// Fade factor for the i-th point, 1 at the head falling linearly.
    pub fn fade_at(&self, i: usize) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        1.0 - i as f32 / self.points.len() as f32
    }
}

/// Gradient-faded polyline from the newest trail point to the oldest.
pub fn fade_trail(surface: &mut dyn Surface, trail: &Trail, head: Hsla, width: f32) {
    let (Some(first), Some(last)) = (trail.head(), trail.tail()) else {
        return;
    };
    if trail.len() < 2 {
        return;
    }
    let paint = Paint::linear(first, last, &[(0.0, head), (1.0, head.with_alpha(0.0))]);
    surface.stroke_path(&Path::polyline(trail.iter()), &paint, StrokeStyle::round(width));
}

/// `1 + sin(time * rate + phase) * depth`, the breathing scale used for glows.
#[inline]
pub fn pulse(time: f32, rate: f32, phase: f32, depth: f32) -> f32 {
    1.0 + (time * rate + phase).sin() * depth
}

/// One procedural engine. Implementations own their entities exclusively.
pub trait Visualization {
    fn name(&self) -> &'static str;

    /// Build entities and topology for `viewport`. Called on activation and resize.
    fn init(&mut self, viewport: Viewport, rng: &mut SimRng);

    /// Advance one constant-timestep frame.
    fn step(&mut self, rng: &mut SimRng);

    fn render(&self, surface: &mut dyn Surface);

    /// Drop every entity; the engine stays reusable.
    fn release(&mut self);

    fn entity_count(&self) -> usize;

    /// Secondary one-shot trigger. Only the gravity engine listens.
    fn set_trigger(&mut self, _armed: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_keeps_newest_first_and_bounded() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push_front(Vec2::splat(i as f32));
        }
        let pts: Vec<Vec2> = trail.iter().collect();
        assert_eq!(pts, vec![Vec2::splat(4.0), Vec2::splat(3.0), Vec2::splat(2.0)]);
        assert_eq!(trail.fade_at(0), 1.0);
        assert!(trail.fade_at(2) < trail.fade_at(1));
    }

    #[test]
    fn viewport_pixel_size_scales_with_dpr() {
        let vp = Viewport::new(400.0, 300.0).with_dpr(2.0);
        assert_eq!(vp.pixel_size(), (800, 600));
        assert!(!Viewport::new(0.0, 300.0).is_drawable());
    }

    #[test]
    fn short_trails_are_not_drawn() {
        let mut list = crate::paint::DrawList::new(Vec2::ONE);
        let mut trail = Trail::new(4);
        trail.push_front(Vec2::ZERO);
        fade_trail(&mut list, &trail, Hsla::new(185.0, 55.0, 60.0, 0.5), 2.0);
        assert!(list.commands().is_empty());
        trail.push_front(Vec2::ONE);
        fade_trail(&mut list, &trail, Hsla::new(185.0, 55.0, 60.0, 0.5), 2.0);
        assert_eq!(list.commands().len(), 1);
    }
}
