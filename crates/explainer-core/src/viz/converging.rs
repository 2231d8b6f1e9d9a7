use super::{fade_trail, pulse, Trail, Viewport, Visualization};
use crate::constants::{FRAME_DT, HUE_LAVENDER, HUE_TEAL};
use crate::paint::{
    glow_disc, glow_disc_stops, shaded_core, Hsla, Paint, Path, StrokeStyle, Surface,
};
use crate::rng::{centered, unit, SimRng};
use glam::Vec2;
use std::f32::consts::TAU;

const PARTICLE_COUNT: usize = 80;
const TRAIL_LEN: usize = 10;
const CENTER_Y_FRACTION: f32 = 0.38;
const SPAWN_DISTANCE_FRACTION: f32 = 0.9; // of the larger viewport side
const ORBIT_SQUASH: f32 = 0.6; // vertical scale of the elliptical orbits
const CONVERGE_GAIN: f32 = 0.006;
const ORBIT_GAIN: f32 = 0.03;
const DAMPING: f32 = 0.95;
const LINK_DISTANCE: f32 = 50.0;
const MAX_DELAY_SEC: f32 = 1.5;

#[derive(Clone, Copy, Debug)]
struct OrbitRing {
    radius: f32,
    speed: f32,
    particles: usize,
    phase: f32,
}

const RINGS: [OrbitRing; 3] = [
    OrbitRing {
        radius: 60.0,
        speed: 0.8,
        particles: 8,
        phase: 0.0,
    },
    OrbitRing {
        radius: 100.0,
        speed: -0.5,
        particles: 12,
        phase: std::f32::consts::FRAC_PI_4,
    },
    OrbitRing {
        radius: 150.0,
        speed: 0.3,
        particles: 16,
        phase: std::f32::consts::FRAC_PI_2,
    },
];

#[derive(Clone, Debug)]
pub struct OrbitParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub hue: f32,
    pub delay: f32,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub orbit_phase: f32,
    pub trail: Trail,
    distance: f32, // to target, measured before the last move
}

impl OrbitParticle {
    pub fn distance_to_target(&self) -> f32 {
        self.distance
    }

    pub fn is_orbiting(&self) -> bool {
        self.distance <= self.orbit_radius
    }
}

/// Particles stream in from the edges and settle into elliptical orbits.
#[derive(Debug, Default)]
pub struct ConvergingOrbit {
    particles: Vec<OrbitParticle>,
    center: Vec2,
    time: f32,
}

impl ConvergingOrbit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[OrbitParticle] {
        &self.particles
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    fn orbit_point(&self, angle: f32, radius: f32) -> Vec2 {
        self.center + Vec2::new(angle.cos() * radius, angle.sin() * radius * ORBIT_SQUASH)
    }

    fn draw_rings(&self, surface: &mut dyn Surface) {
        for (ring_index, ring) in RINGS.iter().enumerate() {
            let scale = pulse(self.time, 1.5, ring_index as f32, 0.05);
            let hue = if ring_index == 1 { HUE_TEAL } else { HUE_LAVENDER };
            surface.stroke_path(
                &Path::circle(self.center, ring.radius * scale),
                &Paint::Solid(Hsla::new(hue, 40.0, 55.0, 0.15)),
                StrokeStyle::new(1.0),
            );

            for i in 0..ring.particles {
                let angle = i as f32 / ring.particles as f32 * TAU
                    + self.time * ring.speed
                    + ring.phase;
                let p = self.orbit_point(angle, ring.radius * scale);
                glow_disc(surface, p, 8.0, Hsla::new(hue, 55.0, 60.0, 0.6));
                surface.fill_path(
                    &Path::circle(p, 2.5),
                    &Paint::Solid(Hsla::new(hue, 60.0, 65.0, 0.9)),
                );
            }
        }
    }

    fn draw_core_glow(&self, surface: &mut dyn Surface) {
        let scale = pulse(self.time, 2.0, 0.0, 0.15);
        glow_disc_stops(
            surface,
            self.center,
            140.0 * scale,
            &[
                (0.0, Hsla::new(HUE_LAVENDER, 40.0, 55.0, 0.2)),
                (0.4, Hsla::new(HUE_TEAL, 50.0, 55.0, 0.1)),
                (1.0, Hsla::new(HUE_LAVENDER, 40.0, 55.0, 0.0)),
            ],
        );
        glow_disc_stops(
            surface,
            self.center,
            50.0 * scale,
            &[
                (0.0, Hsla::new(HUE_TEAL, 55.0, 60.0, 0.4)),
                (0.6, Hsla::new(HUE_LAVENDER, 45.0, 55.0, 0.2)),
                (1.0, Hsla::new(HUE_TEAL, 50.0, 55.0, 0.0)),
            ],
        );
    }

    fn draw_focus_point(&self, surface: &mut dyn Surface) {
        let scale = pulse(self.time, 3.0, 0.0, 0.1);
        surface.stroke_path(
            &Path::circle(self.center, 18.0 * scale),
            &Paint::Solid(Hsla::new(HUE_TEAL, 55.0, 60.0, 0.5)),
            StrokeStyle::new(2.0),
        );
        let focal = self.center - Vec2::splat(3.0);
        surface.fill_path(
            &Path::circle(self.center, 12.0),
            &Paint::radial_offset(
                focal,
                self.center,
                12.0,
                &[
                    (0.0, Hsla::new(HUE_TEAL, 60.0, 70.0, 1.0)),
                    (0.5, Hsla::new(HUE_LAVENDER, 45.0, 55.0, 0.9)),
                    (1.0, Hsla::new(HUE_LAVENDER, 40.0, 45.0, 0.8)),
                ],
            ),
        );
        surface.fill_path(
            &Path::circle(focal, 4.0),
            &Paint::Solid(Hsla::new(0.0, 0.0, 100.0, 0.6)),
        );
    }
}

impl Visualization for ConvergingOrbit {
    fn name(&self) -> &'static str {
        "converging-orbit"
    }

    fn init(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.center = Vec2::new(viewport.width * 0.5, viewport.height * CENTER_Y_FRACTION);
        let spawn = viewport.width.max(viewport.height) * SPAWN_DISTANCE_FRACTION;

        self.particles = (0..PARTICLE_COUNT)
            .map(|i| {
                let angle = i as f32 / PARTICLE_COUNT as f32 * TAU;
                let ring = RINGS[i % RINGS.len()];
                let pos = self.center
                    + Vec2::new(angle.cos() * spawn, angle.sin() * spawn * ORBIT_SQUASH);
                OrbitParticle {
                    pos,
                    vel: Vec2::ZERO,
                    target: self.center,
                    size: 2.0 + unit(rng) * 4.0,
                    opacity: 0.3 + unit(rng) * 0.7,
                    hue: if i % 3 == 0 { HUE_TEAL } else { HUE_LAVENDER },
                    delay: unit(rng) * MAX_DELAY_SEC,
                    orbit_radius: ring.radius + centered(rng) * 30.0,
                    orbit_speed: ring.speed * (0.8 + unit(rng) * 0.4),
                    orbit_phase: angle,
                    trail: Trail::new(TRAIL_LEN),
                    distance: (self.center - pos).length(),
                }
            })
            .collect();
        log::debug!(
            "[viz] {} init: {} particles around ({:.0},{:.0})",
            self.name(),
            self.particles.len(),
            self.center.x,
            self.center.y
        );
    }

    fn step(&mut self, _rng: &mut SimRng) {
        self.time += FRAME_DT;
        let time = self.time;
        let center = self.center;

        for p in &mut self.particles {
            if time < p.delay {
                continue;
            }
            let to_target = p.target - p.pos;
            let distance = to_target.length();

            if distance > p.orbit_radius {
                p.vel += to_target * CONVERGE_GAIN;
            } else {
                let angle = p.orbit_phase + time * p.orbit_speed;
                let orbit = center
                    + Vec2::new(
                        angle.cos() * p.orbit_radius,
                        angle.sin() * p.orbit_radius * ORBIT_SQUASH,
                    );
                p.vel += (orbit - p.pos) * ORBIT_GAIN;
            }

            p.vel *= DAMPING;
            p.pos += p.vel;
            p.distance = distance;
            p.trail.push_front(p.pos);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let size = surface.size();
        surface.fill_rect(
            Vec2::ZERO,
            size,
            &Paint::radial(
                self.center,
                200.0,
                &[
                    (0.0, Hsla::new(HUE_LAVENDER, 40.0, 55.0, 0.08)),
                    (0.5, Hsla::new(HUE_TEAL, 50.0, 50.0, 0.04)),
                    (1.0, Hsla::new(HUE_LAVENDER, 40.0, 55.0, 0.0)),
                ],
            ),
        );
        self.draw_rings(surface);
        self.draw_core_glow(surface);

        for (index, p) in self.particles.iter().enumerate() {
            if self.time < p.delay {
                continue;
            }
            if p.distance > p.orbit_radius * 0.5 {
                fade_trail(
                    surface,
                    &p.trail,
                    Hsla::new(p.hue, 55.0, 60.0, p.opacity * 0.5),
                    p.size * 0.4,
                );
            }
            glow_disc(
                surface,
                p.pos,
                p.size * 2.5,
                Hsla::new(p.hue, 60.0, 60.0, p.opacity * 0.7),
            );
            shaded_core(
                surface,
                p.pos,
                p.size,
                0.2,
                Hsla::new(p.hue, 65.0, 75.0, p.opacity),
                Hsla::new(p.hue, 60.0, 55.0, p.opacity),
            );

            // proximity graph between settled particles
            if p.distance < p.orbit_radius * 1.5 {
                for other in &self.particles[index + 1..] {
                    let d = p.pos.distance(other.pos);
                    if d < LINK_DISTANCE {
                        surface.stroke_path(
                            &Path::line(p.pos, other.pos),
                            &Paint::Solid(Hsla::new(
                                HUE_LAVENDER,
                                35.0,
                                60.0,
                                0.2 * (1.0 - d / LINK_DISTANCE),
                            )),
                            StrokeStyle::new(0.8),
                        );
                    }
                }
            }
        }

        self.draw_focus_point(surface);
    }

    fn release(&mut self) {
        self.particles.clear();
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::DrawList;
    use crate::rng::sim_rng;

    fn engine() -> (ConvergingOrbit, SimRng) {
        let mut rng = sim_rng(Some(42));
        let mut e = ConvergingOrbit::new();
        e.init(Viewport::new(1280.0, 720.0), &mut rng);
        (e, rng)
    }

    #[test]
    fn spawns_outside_every_orbit() {
        let (e, _) = engine();
        assert_eq!(e.entity_count(), PARTICLE_COUNT);
        assert_eq!(e.center(), Vec2::new(640.0, 720.0 * 0.38));
        for p in e.particles() {
            assert!(p.distance_to_target() > p.orbit_radius);
            assert!(p.delay >= 0.0 && p.delay < MAX_DELAY_SEC);
        }
    }

    #[test]
    fn delayed_particles_hold_still() {
        let (mut e, mut rng) = engine();
        let before: Vec<Vec2> = e.particles().iter().map(|p| p.pos).collect();
        e.step(&mut rng);
        for (p, b) in e.particles().iter().zip(before) {
            if p.delay > e.time() {
                assert_eq!(p.pos, b);
                assert!(p.trail.is_empty());
            }
        }
    }

    #[test]
    fn render_skips_links_before_settling() {
        let (e, _) = engine();
        let mut list = DrawList::new(Vec2::new(1280.0, 720.0));
        e.render(&mut list);
        // one background fill rect, nothing else rectangular
        assert_eq!(
            list.count_where(|c| matches!(c, crate::paint::DrawCmd::FillRect { .. })),
            1
        );
    }
}
