use super::{pulse, Viewport, Visualization};
use crate::constants::{FRAME_DT, HUE_LAVENDER, HUE_TEAL};
use crate::paint::{
    glow_disc, glow_disc_stops, shaded_core, Hsla, Paint, Path, StrokeStyle, Surface,
};
use crate::rng::{centered, unit, SimRng};
use glam::Vec2;
use std::f32::consts::TAU;

const COLS: usize = 4;
const ROWS: usize = 3;
const SPACING_FRACTION: f32 = 0.18; // of the smaller viewport side
const SCATTER: f32 = 150.0;
const SPRING: f32 = 0.025;
const DAMPING: f32 = 0.9;
const HIGHLIGHTED: [usize; 4] = [1, 4, 5, 9];
const PULSES_PER_EDGE: usize = 2;

#[derive(Clone, Debug)]
pub struct NetNode {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    pub radius: f32,
    pub highlighted: bool,
    pub pulse_phase: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetEdge {
    pub from: usize,
    pub to: usize,
    pub strength: f32,
    pub pulse_offset: f32,
}

/// Grid of spring-anchored nodes with a highlighted sub-network.
#[derive(Debug, Default)]
pub struct SpringNetwork {
    nodes: Vec<NetNode>,
    edges: Vec<NetEdge>,
    time: f32,
}

impl SpringNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NetNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[NetEdge] {
        &self.edges
    }

    /// An edge lights up when either end is highlighted.
    fn edge_highlighted(&self, edge: &NetEdge) -> bool {
        self.nodes[edge.from].highlighted || self.nodes[edge.to].highlighted
    }

    fn draw_edges(&self, surface: &mut dyn Surface) {
        for edge in &self.edges {
            let (a, b) = (self.nodes[edge.from].pos, self.nodes[edge.to].pos);
            let lit = self.edge_highlighted(edge);
            let end_color = |highlighted: bool| {
                if !lit {
                    Hsla::new(HUE_LAVENDER, 25.0, 70.0, 0.25)
                } else if highlighted {
                    Hsla::new(HUE_TEAL, 60.0, 50.0, 0.7)
                } else {
                    Hsla::new(HUE_LAVENDER, 35.0, 60.0, 0.4)
                }
            };
            let paint = Paint::linear(
                a,
                b,
                &[
                    (0.0, end_color(self.nodes[edge.from].highlighted)),
                    (1.0, end_color(self.nodes[edge.to].highlighted)),
                ],
            );
            let width = edge.strength * if lit { 2.5 } else { 1.5 };
            surface.stroke_path(&Path::line(a, b), &paint, StrokeStyle::new(width));

            if !lit {
                continue;
            }
            for k in 0..PULSES_PER_EDGE {
                let kf = k as f32;
                let t = (self.time * 0.5 + edge.pulse_offset + kf * 0.5) % 1.0;
                let at = a.lerp(b, t);
                let size = 3.0 + (self.time * 4.0 + kf).sin();
                glow_disc(surface, at, size * 3.0, Hsla::new(HUE_TEAL, 65.0, 60.0, 0.8));
                surface.fill_path(
                    &Path::circle(at, size),
                    &Paint::Solid(Hsla::new(HUE_TEAL, 70.0, 65.0, 1.0)),
                );
            }
        }
    }

    fn draw_node(&self, surface: &mut dyn Surface, node: &NetNode) {
        let scale = pulse(self.time, 2.5, node.pulse_phase, 0.15);
        let r = node.radius;
        if node.highlighted {
            glow_disc_stops(
                surface,
                node.pos,
                r * 4.0 * scale,
                &[
                    (0.0, Hsla::new(HUE_TEAL, 60.0, 55.0, 0.35)),
                    (0.5, Hsla::new(HUE_TEAL, 60.0, 55.0, 0.1)),
                    (1.0, Hsla::new(HUE_TEAL, 60.0, 55.0, 0.0)),
                ],
            );
            glow_disc(surface, node.pos, r * 2.5, Hsla::new(HUE_TEAL, 65.0, 60.0, 0.6));
            shaded_core(
                surface,
                node.pos,
                r,
                0.3,
                Hsla::new(HUE_TEAL, 65.0, 65.0, 1.0),
                Hsla::new(HUE_TEAL, 60.0, 45.0, 1.0),
            );
        } else {
            glow_disc(
                surface,
                node.pos,
                r * 4.0 * scale,
                Hsla::new(HUE_LAVENDER, 30.0, 60.0, 0.2),
            );
            shaded_core(
                surface,
                node.pos,
                r,
                0.3,
                Hsla::new(HUE_LAVENDER, 30.0, 75.0, 0.9),
                Hsla::new(HUE_LAVENDER, 25.0, 55.0, 0.7),
            );
        }

        let (border, width) = if node.highlighted {
            (Hsla::new(HUE_TEAL, 70.0, 70.0, 1.0), 2.5)
        } else {
            (Hsla::new(HUE_LAVENDER, 25.0, 80.0, 0.9), 1.5)
        };
        surface.stroke_path(
            &Path::circle(node.pos, r),
            &Paint::Solid(border),
            StrokeStyle::new(width),
        );
        surface.fill_path(
            &Path::circle(node.pos - Vec2::splat(r * 0.3), r * 0.3),
            &Paint::Solid(Hsla::new(0.0, 0.0, 100.0, 0.4)),
        );
    }
}

impl Visualization for SpringNetwork {
    fn name(&self) -> &'static str {
        "spring-network"
    }

    fn init(&mut self, viewport: Viewport, rng: &mut SimRng) {
        let spacing = viewport.width.min(viewport.height) * SPACING_FRACTION;
        let grid = Vec2::new((COLS - 1) as f32, (ROWS - 1) as f32) * spacing;
        let origin = viewport.center() - grid * 0.5;

        self.nodes = (0..COLS * ROWS)
            .map(|i| {
                let target = origin
                    + Vec2::new((i % COLS) as f32, (i / COLS) as f32) * spacing;
                let scatter = Vec2::new(centered(rng), centered(rng)) * SCATTER;
                NetNode {
                    pos: target + scatter,
                    vel: Vec2::ZERO,
                    target,
                    radius: 8.0 + unit(rng) * 6.0,
                    highlighted: HIGHLIGHTED.contains(&i),
                    pulse_phase: unit(rng) * TAU,
                }
            })
            .collect();

        self.edges.clear();
        for i in 0..COLS * ROWS {
            let (col, row) = (i % COLS, i / COLS);
            if col + 1 < COLS {
                self.edges.push(NetEdge {
                    from: i,
                    to: i + 1,
                    strength: 0.6 + unit(rng) * 0.4,
                    pulse_offset: unit(rng) * TAU,
                });
            }
            if row + 1 < ROWS {
                self.edges.push(NetEdge {
                    from: i,
                    to: i + COLS,
                    strength: 0.6 + unit(rng) * 0.4,
                    pulse_offset: unit(rng) * TAU,
                });
                if col + 1 < COLS && unit(rng) > 0.5 {
                    self.edges.push(NetEdge {
                        from: i,
                        to: i + COLS + 1,
                        strength: 0.4,
                        pulse_offset: unit(rng) * TAU,
                    });
                }
            }
        }
        log::debug!(
            "[viz] {} init: {} nodes, {} edges",
            self.name(),
            self.nodes.len(),
            self.edges.len()
        );
    }

    fn step(&mut self, _rng: &mut SimRng) {
        self.time += FRAME_DT;
        let t = self.time;
        for node in &mut self.nodes {
            node.vel += (node.target - node.pos) * SPRING;
            node.vel.x += (t * 1.5 + node.target.x * 0.01 + node.pulse_phase).sin() * 0.15;
            node.vel.y += (t * 1.2 + node.target.y * 0.01 + node.pulse_phase).cos() * 0.12;
            node.vel *= DAMPING;
            node.pos += node.vel;
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.draw_edges(surface);
        for node in &self.nodes {
            self.draw_node(surface, node);
        }
    }

    fn release(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    fn entity_count(&self) -> usize {
        self.nodes.len()
    }
}
