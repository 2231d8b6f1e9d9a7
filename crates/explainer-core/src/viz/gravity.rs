use super::{fade_trail, pulse, Trail, Viewport, Visualization};
use crate::constants::{FRAME_DT, HUE_LAVENDER, HUE_MIST, HUE_TEAL};
use crate::paint::{
    glow_disc, glow_disc_stops, shaded_core, Hsla, Paint, Path, StrokeStyle, Surface,
};
use crate::rng::{centered, unit, SimRng};
use glam::Vec2;
use std::f32::consts::TAU;

pub const GRAVITY: f32 = 0.18;
pub const BOUNCE: f32 = 0.25;
pub const FRICTION: f32 = 0.97;
const STEER: f32 = 0.002;
/// Rebound speed below which a body comes to rest.
pub const LAND_THRESHOLD: f32 = 1.5;
/// Resting bodies bob at most this far around their target height.
pub const BOB_AMPLITUDE: f32 = 3.0;

pub const TRAILING_COUNT: usize = 15;
const TRAIL_LEN: usize = 15;
const MAIN_SIZE: f32 = 35.0;
const SPAWN_Y_FRACTION: f32 = 0.12;
const LANDING_Y_FRACTION: f32 = 0.62;
const RIPPLE_DROP_Y: f32 = 15.0;
const RIPPLE_GROWTH: f32 = 3.0;
const RIPPLE_FADE: f32 = 0.02;

const CARD_Y_FRACTION: f32 = 0.52;
const CARD_RADIUS: f32 = 16.0;
const CARD_X_FRACTIONS: [f32; 3] = [0.2, 0.5, 0.8]; // keep, expand, discard
const ACTIVE_CARD: usize = 0;

#[derive(Clone, Debug)]
pub struct FallingBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub opacity: f32,
    pub hue: f32,
    pub landed: bool,
    pub is_main: bool,
    pub trail: Trail,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

/// One-shot drop: a prototype card and its debris fall into the "keep" slot.
///
/// Bodies are only spawned on the rising edge of the trigger while the engine
/// is initialised, and at most once until the next `release`.
#[derive(Debug, Default)]
pub struct GravityDrop {
    viewport: Option<Viewport>,
    bodies: Vec<FallingBody>,
    ripples: Vec<Ripple>,
    armed: bool,
    spawn_pending: bool,
    has_dropped: bool,
    time: f32,
}

impl GravityDrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bodies(&self) -> &[FallingBody] {
        &self.bodies
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn has_dropped(&self) -> bool {
        self.has_dropped
    }

    pub fn all_landed(&self) -> bool {
        !self.bodies.is_empty() && self.bodies.iter().all(|b| b.landed)
    }

    fn spawn(&mut self, viewport: Viewport, rng: &mut SimRng) {
        let (w, h) = (viewport.width, viewport.height);
        let cx = w * 0.5;
        let spawn_y = h * SPAWN_Y_FRACTION;
        let land_y = h * LANDING_Y_FRACTION;
        let slot_x = cx - w * 0.25;

        let mut bodies = Vec::with_capacity(TRAILING_COUNT + 1);
        bodies.push(FallingBody {
            pos: Vec2::new(cx, spawn_y),
            vel: Vec2::ZERO,
            target: Vec2::new(slot_x, land_y),
            size: MAIN_SIZE,
            rotation: 0.0,
            rotation_speed: 0.015,
            opacity: 1.0,
            hue: HUE_TEAL,
            landed: false,
            is_main: true,
            trail: Trail::new(TRAIL_LEN),
        });
        for _ in 0..TRAILING_COUNT {
            bodies.push(FallingBody {
                pos: Vec2::new(cx + centered(rng) * 50.0, spawn_y + unit(rng) * 30.0),
                vel: Vec2::new(centered(rng) * 3.0, -unit(rng)),
                target: Vec2::new(slot_x + centered(rng) * 80.0, land_y + unit(rng) * 40.0),
                size: 3.0 + unit(rng) * 8.0,
                rotation: unit(rng) * TAU,
                rotation_speed: centered(rng) * 0.15,
                opacity: 0.5 + unit(rng) * 0.5,
                hue: if unit(rng) > 0.5 { HUE_LAVENDER } else { HUE_TEAL },
                landed: false,
                is_main: false,
                trail: Trail::new(TRAIL_LEN),
            });
        }
        self.bodies = bodies;
        self.ripples.clear();
        self.has_dropped = true;
        log::debug!("[viz] {} spawned {} bodies", self.name(), self.bodies.len());
    }

    fn update_bodies(&mut self) {
        let time = self.time;
        let mut ripples = Vec::new();
        for (index, body) in self.bodies.iter_mut().enumerate() {
            let phase = index as f32;
            if body.landed {
                body.pos.y = body.target.y + (time * 2.0 + phase).sin() * BOB_AMPLITUDE;
                body.rotation = (time * 1.5 + phase).sin() * 0.1;
                continue;
            }

            body.vel.y += GRAVITY;
            body.vel.x *= FRICTION;
            body.vel.x += (body.target.x - body.pos.x) * STEER;
            body.pos += body.vel;
            body.rotation += body.rotation_speed;
            body.trail.push_front(body.pos);

            if body.pos.y >= body.target.y {
                body.pos.y = body.target.y;
                body.vel.y *= -BOUNCE;
                if body.vel.y.abs() < LAND_THRESHOLD {
                    body.landed = true;
                    body.vel.y = 0.0;
                    if body.is_main {
                        ripples.push(Ripple {
                            center: Vec2::new(body.pos.x, body.target.y + RIPPLE_DROP_Y),
                            radius: 10.0,
                            opacity: 0.6,
                        });
                    }
                }
            }
        }
        self.ripples.extend(ripples);
    }

    fn update_ripples(&mut self) {
        self.ripples.retain_mut(|r| {
            r.radius += RIPPLE_GROWTH;
            r.opacity -= RIPPLE_FADE;
            r.opacity > 0.0
        });
    }

    fn draw_cards(&self, surface: &mut dyn Surface, viewport: Viewport) {
        let card = Vec2::new(viewport.width * 0.22, viewport.height * 0.35);
        let card_y = viewport.height * CARD_Y_FRACTION;

        for (i, fx) in CARD_X_FRACTIONS.iter().enumerate() {
            let x = viewport.width * fx;
            let active = i == ACTIVE_CARD;
            if active {
                surface.fill_rect(
                    Vec2::new(x - card.x, card_y - 20.0),
                    Vec2::new(card.x * 2.0, card.y + 40.0),
                    &Paint::radial(
                        Vec2::new(x, card_y + card.y * 0.5),
                        card.x * 0.8,
                        &[
                            (0.0, Hsla::new(HUE_LAVENDER, 35.0, 55.0, 0.15)),
                            (1.0, Hsla::new(HUE_LAVENDER, 35.0, 55.0, 0.0)),
                        ],
                    ),
                );
            }

            let origin = Vec2::new(x - card.x * 0.5, card_y);
            let outline = Path::round_rect(origin, card, CARD_RADIUS);
            if active {
                let paint = Paint::linear(
                    origin,
                    origin + card,
                    &[
                        (0.0, Hsla::new(HUE_LAVENDER, 40.0, 60.0, 0.5)),
                        (0.5, Hsla::new(HUE_TEAL, 50.0, 55.0, 0.5)),
                        (1.0, Hsla::new(HUE_LAVENDER, 40.0, 60.0, 0.5)),
                    ],
                );
                surface.stroke_path(&outline, &paint, StrokeStyle::new(2.5));
            } else {
                surface.stroke_path(
                    &outline,
                    &Paint::Solid(Hsla::new(HUE_MIST, 20.0, 75.0, 0.25)),
                    StrokeStyle::new(1.5),
                );
            }
        }
    }

    fn draw_main(&self, surface: &mut dyn Surface, body: &FallingBody) {
        let s = body.size;
        surface.save();
        surface.translate(body.pos);
        surface.rotate(body.rotation);

        surface.fill_rect(
            Vec2::new(-s * 2.0, -s),
            Vec2::new(s * 4.0, s * 2.0),
            &Paint::radial(
                Vec2::ZERO,
                s * 2.0,
                &[
                    (0.0, Hsla::new(HUE_TEAL, 55.0, 55.0, 0.4)),
                    (1.0, Hsla::new(HUE_TEAL, 55.0, 55.0, 0.0)),
                ],
            ),
        );

        let origin = Vec2::new(-s, -s * 0.5);
        let extent = Vec2::new(s * 2.0, s);
        let card = Path::round_rect(origin, extent, 10.0);
        surface.fill_path(
            &card,
            &Paint::linear(
                origin,
                origin + extent,
                &[
                    (0.0, Hsla::new(HUE_LAVENDER, 40.0, 60.0, 1.0)),
                    (0.5, Hsla::new(HUE_TEAL, 55.0, 55.0, 1.0)),
                    (1.0, Hsla::new(HUE_LAVENDER, 40.0, 60.0, 1.0)),
                ],
            ),
        );
        surface.stroke_path(
            &card,
            &Paint::Solid(Hsla::new(HUE_TEAL, 60.0, 70.0, 1.0)),
            StrokeStyle::new(2.5),
        );
        surface.fill_path(
            &Path::round_rect(
                origin + Vec2::splat(4.0),
                Vec2::new(s * 2.0 - 8.0, s * 0.4),
                6.0,
            ),
            &Paint::Solid(Hsla::new(0.0, 0.0, 100.0, 0.25)),
        );

        for i in 0..4 {
            let fi = i as f32;
            let radius = 3.0 * pulse(self.time, 4.0, fi * 0.5, 0.2);
            let alpha = 0.5 + (self.time * 3.0 + fi).sin() * 0.2;
            surface.fill_path(
                &Path::circle(Vec2::new(-s + 14.0 + fi * 14.0, 0.0), radius),
                &Paint::Solid(Hsla::new(0.0, 0.0, 100.0, alpha)),
            );
        }
        surface.restore();
    }

    fn draw_debris(&self, surface: &mut dyn Surface, body: &FallingBody) {
        glow_disc(
            surface,
            body.pos,
            body.size * 2.0,
            Hsla::new(body.hue, 50.0, 60.0, body.opacity),
        );
        shaded_core(
            surface,
            body.pos,
            body.size,
            0.2,
            Hsla::new(body.hue, 60.0, 70.0, body.opacity),
            Hsla::new(body.hue, 55.0, 50.0, body.opacity),
        );
    }
}

impl Visualization for GravityDrop {
    fn name(&self) -> &'static str {
        "gravity-drop"
    }

    fn init(&mut self, viewport: Viewport, _rng: &mut SimRng) {
        self.viewport = Some(viewport);
        self.bodies.clear();
        self.ripples.clear();
        self.has_dropped = false;
        // an already-raised trigger still drops once on (re)activation
        self.spawn_pending = self.armed;
    }

    fn step(&mut self, rng: &mut SimRng) {
        self.time += FRAME_DT;
        if let Some(viewport) = self.viewport {
            if self.spawn_pending && !self.has_dropped {
                self.spawn(viewport, rng);
            }
        }
        self.spawn_pending = false;
        self.update_ripples();
        self.update_bodies();
    }

    fn render(&self, surface: &mut dyn Surface) {
        let Some(viewport) = self.viewport else {
            return;
        };
        self.draw_cards(surface, viewport);

        for ripple in &self.ripples {
            surface.stroke_path(
                &Path::circle(ripple.center, ripple.radius),
                &Paint::Solid(Hsla::new(HUE_LAVENDER, 40.0, 60.0, ripple.opacity)),
                StrokeStyle::new(2.0),
            );
        }

        for body in &self.bodies {
            if !body.landed {
                fade_trail(
                    surface,
                    &body.trail,
                    Hsla::new(body.hue, 55.0, 60.0, body.opacity * 0.4),
                    body.size * 0.3,
                );
            }
            if body.is_main {
                self.draw_main(surface, body);
            } else {
                self.draw_debris(surface, body);
            }
        }

        if let Some(main) = self.bodies.iter().find(|b| b.is_main && b.landed) {
            glow_disc_stops(
                surface,
                Vec2::new(main.pos.x, main.target.y + RIPPLE_DROP_Y),
                70.0 * pulse(self.time, 3.0, 0.0, 0.08),
                &[
                    (0.0, Hsla::new(HUE_LAVENDER, 40.0, 55.0, 0.25)),
                    (0.5, Hsla::new(HUE_TEAL, 50.0, 55.0, 0.1)),
                    (1.0, Hsla::new(HUE_LAVENDER, 40.0, 55.0, 0.0)),
                ],
            );
        }
    }

    fn release(&mut self) {
        self.bodies.clear();
        self.ripples.clear();
        self.has_dropped = false;
        self.spawn_pending = false;
        self.viewport = None;
    }

    fn entity_count(&self) -> usize {
        self.bodies.len()
    }

    fn set_trigger(&mut self, armed: bool) {
        if armed && !self.armed {
            self.spawn_pending = true;
        }
        self.armed = armed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::sim_rng;

    fn armed_drop() -> (GravityDrop, SimRng) {
        let mut rng = sim_rng(Some(4));
        let mut g = GravityDrop::new();
        g.init(Viewport::new(1200.0, 800.0), &mut rng);
        g.set_trigger(true);
        (g, rng)
    }

    #[test]
    fn nothing_falls_without_trigger() {
        let mut rng = sim_rng(Some(4));
        let mut g = GravityDrop::new();
        g.init(Viewport::new(1200.0, 800.0), &mut rng);
        for _ in 0..10 {
            g.step(&mut rng);
        }
        assert_eq!(g.entity_count(), 0);
        assert!(!g.has_dropped());
    }

    #[test]
    fn trigger_spawns_main_and_debris_once() {
        let (mut g, mut rng) = armed_drop();
        g.step(&mut rng);
        assert_eq!(g.entity_count(), TRAILING_COUNT + 1);
        assert_eq!(g.bodies().iter().filter(|b| b.is_main).count(), 1);

        g.set_trigger(false);
        g.set_trigger(true);
        g.step(&mut rng);
        assert_eq!(g.entity_count(), TRAILING_COUNT + 1, "no second drop");
    }

    #[test]
    fn main_landing_emits_a_ripple() {
        let (mut g, mut rng) = armed_drop();
        let mut ripple_seen = false;
        for _ in 0..400 {
            g.step(&mut rng);
            ripple_seen |= !g.ripples().is_empty();
            if g.bodies().iter().any(|b| b.is_main && b.landed) {
                break;
            }
        }
        assert!(g.bodies().iter().any(|b| b.is_main && b.landed));
        assert!(ripple_seen);
    }

    #[test]
    fn ripples_fade_out() {
        let (mut g, mut rng) = armed_drop();
        for _ in 0..800 {
            g.step(&mut rng);
        }
        assert!(g.all_landed());
        assert!(g.ripples().is_empty());
    }

    #[test]
    fn release_rearms_for_the_next_activation() {
        let (mut g, mut rng) = armed_drop();
        g.step(&mut rng);
        g.release();
        assert!(!g.has_dropped());
        assert_eq!(g.entity_count(), 0);
        g.init(Viewport::new(1200.0, 800.0), &mut rng);
        g.step(&mut rng);
        assert!(g.has_dropped(), "trigger still raised, so it drops again");
    }
}
