use super::{pulse, Viewport, Visualization};
use crate::constants::{FRAME_DT, HUE_LAVENDER, HUE_TEAL};
use crate::paint::{glow_disc, Hsla, Paint, Path, StrokeStyle, Surface};
use crate::rng::{centered, range, unit, SimRng};
use glam::Vec2;
use std::f32::consts::TAU;

const PARTICLE_COUNT: usize = 45;
const WRAP_MARGIN: f32 = 20.0;
const LINK_DISTANCE: f32 = 120.0;
const DRIFT_SPEED: f32 = 0.35; // px per frame, per axis at most

#[derive(Clone, Debug)]
pub struct Mote {
    /// Drifting anchor; the drawn position adds a sine sway on top.
    pub base: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub hue: f32,
    pub phase: f32,
    pub sway: f32,
}

/// Slow background field behind every scene.
#[derive(Debug, Default)]
pub struct AmbientField {
    motes: Vec<Mote>,
    size: Vec2,
    time: f32,
}

impl AmbientField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    /// Drawn position: anchor plus two layered sine terms.
    pub fn position(&self, mote: &Mote) -> Vec2 {
        let t = self.time;
        mote.base
            + Vec2::new(
                (t * 0.7 + mote.phase).sin() * mote.sway
                    + (t * 0.3 + mote.phase * 2.0).sin() * mote.sway * 0.5,
                (t * 0.5 + mote.phase).cos() * mote.sway * 0.6,
            )
    }

    fn wrap(&self, p: Vec2) -> Vec2 {
        let (w, h) = (self.size.x, self.size.y);
        let wrap_axis = |v: f32, max: f32| {
            if v < -WRAP_MARGIN {
                max + WRAP_MARGIN
            } else if v > max + WRAP_MARGIN {
                -WRAP_MARGIN
            } else {
                v
            }
        };
        Vec2::new(wrap_axis(p.x, w), wrap_axis(p.y, h))
    }

    fn draw_backdrop(&self, surface: &mut dyn Surface) {
        let drift = Vec2::new((self.time * 0.1).sin(), (self.time * 0.08).cos()) * 40.0;
        let radius = self.size.x.max(self.size.y) * 0.45;
        glow_disc(
            surface,
            Vec2::new(self.size.x * 0.25, self.size.y * 0.3) + drift,
            radius,
            Hsla::new(HUE_LAVENDER, 40.0, 55.0, 0.06),
        );
        glow_disc(
            surface,
            Vec2::new(self.size.x * 0.75, self.size.y * 0.7) - drift,
            radius,
            Hsla::new(HUE_TEAL, 45.0, 50.0, 0.05),
        );
    }
}

impl Visualization for AmbientField {
    fn name(&self) -> &'static str {
        "ambient-field"
    }

    fn init(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.size = viewport.size();
        self.motes = (0..PARTICLE_COUNT)
            .map(|i| Mote {
                base: Vec2::new(unit(rng) * viewport.width, unit(rng) * viewport.height),
                vel: Vec2::new(centered(rng), centered(rng)) * 2.0 * DRIFT_SPEED,
                size: range(rng, 1.0, 3.0),
                opacity: range(rng, 0.15, 0.45),
                hue: if i % 3 == 0 { HUE_TEAL } else { HUE_LAVENDER },
                phase: unit(rng) * TAU,
                sway: range(rng, 4.0, 14.0),
            })
            .collect();
        log::debug!("[viz] {} init: {} motes", self.name(), self.motes.len());
    }

    fn step(&mut self, _rng: &mut SimRng) {
        self.time += FRAME_DT;
        for i in 0..self.motes.len() {
            let moved = self.motes[i].base + self.motes[i].vel;
            self.motes[i].base = self.wrap(moved);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.draw_backdrop(surface);

        let positions: Vec<Vec2> = self.motes.iter().map(|m| self.position(m)).collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                let d = a.distance(*b);
                if d < LINK_DISTANCE {
                    surface.stroke_path(
                        &Path::line(*a, *b),
                        &Paint::Solid(Hsla::new(
                            HUE_LAVENDER,
                            30.0,
                            65.0,
                            0.08 * (1.0 - d / LINK_DISTANCE),
                        )),
                        StrokeStyle::new(0.6),
                    );
                }
            }
        }

        for (mote, at) in self.motes.iter().zip(&positions) {
            let twinkle = pulse(self.time, 1.2, mote.phase, 0.25);
            glow_disc(
                surface,
                *at,
                mote.size * 4.0 * twinkle,
                Hsla::new(mote.hue, 50.0, 60.0, mote.opacity * 0.5),
            );
            surface.fill_path(
                &Path::circle(*at, mote.size),
                &Paint::Solid(Hsla::new(mote.hue, 55.0, 70.0, mote.opacity)),
            );
        }
    }

    fn release(&mut self) {
        self.motes.clear();
    }

    fn entity_count(&self) -> usize {
        self.motes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::sim_rng;

    #[test]
    fn motes_wrap_around_the_edges() {
        let mut rng = sim_rng(Some(21));
        let mut field = AmbientField::new();
        field.init(Viewport::new(300.0, 200.0), &mut rng);
        for _ in 0..5_000 {
            field.step(&mut rng);
        }
        assert_eq!(field.entity_count(), PARTICLE_COUNT);
        for m in field.motes() {
            assert!((-WRAP_MARGIN..=300.0 + WRAP_MARGIN).contains(&m.base.x));
            assert!((-WRAP_MARGIN..=200.0 + WRAP_MARGIN).contains(&m.base.y));
        }
    }

    #[test]
    fn sway_stays_bounded() {
        let mut rng = sim_rng(Some(21));
        let mut field = AmbientField::new();
        field.init(Viewport::new(300.0, 200.0), &mut rng);
        for _ in 0..100 {
            field.step(&mut rng);
            for m in field.motes() {
                assert!(field.position(m).distance(m.base) <= m.sway * 1.7 + 1e-3);
            }
        }
    }
}
