use super::{fade_trail, pulse, Trail, Viewport, Visualization};
use crate::constants::{HUE_LAVENDER, HUE_TEAL};
use crate::paint::{
    glow_disc, glow_disc_stops, shaded_core, Hsla, Paint, Path, StrokeStyle, Surface,
};
use crate::rng::{unit, SimRng};
use glam::Vec2;

const PARTICLE_COUNT: usize = 40;
const TRAIL_LEN: usize = 12;
const NODE_RADIUS: f32 = 24.0;
const LABEL_FONT: &str = "bold 11px Inter, system-ui, sans-serif";

/// Two cubic Bezier halves joined at `mid`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowPath {
    pub start: Vec2,
    pub cp1: Vec2,
    pub cp2: Vec2,
    pub mid: Vec2,
    pub cp3: Vec2,
    pub cp4: Vec2,
    pub end: Vec2,
    pub hue: f32,
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

impl FlowPath {
    /// Point at `t` in `[0, 1]`; the first half covers `start..mid`.
    pub fn sample(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        if t < 0.5 {
            cubic(self.start, self.cp1, self.cp2, self.mid, t * 2.0)
        } else {
            cubic(self.mid, self.cp3, self.cp4, self.end, (t - 0.5) * 2.0)
        }
    }

    pub fn to_path(&self) -> Path {
        let mut path = Path::new();
        path.move_to(self.start)
            .cubic_to(self.cp1, self.cp2, self.mid)
            .cubic_to(self.cp3, self.cp4, self.end);
        path
    }

    fn layout(viewport: Viewport) -> [FlowPath; 3] {
        let w = viewport.width;
        let cy = viewport.height * 0.5;
        let at = |fx: f32, dy: f32| Vec2::new(w * fx, cy + dy);
        [
            FlowPath {
                start: at(0.02, 0.0),
                cp1: at(0.2, -60.0),
                cp2: at(0.4, 40.0),
                mid: at(0.5, 0.0),
                cp3: at(0.6, -40.0),
                cp4: at(0.8, 60.0),
                end: at(0.98, 0.0),
                hue: HUE_TEAL,
            },
            FlowPath {
                start: at(0.05, -70.0),
                cp1: at(0.25, -120.0),
                cp2: at(0.45, -50.0),
                mid: at(0.52, -55.0),
                cp3: at(0.62, -65.0),
                cp4: at(0.82, -35.0),
                end: at(0.95, -45.0),
                hue: HUE_LAVENDER,
            },
            FlowPath {
                start: at(0.05, 70.0),
                cp1: at(0.25, 120.0),
                cp2: at(0.45, 50.0),
                mid: at(0.52, 55.0),
                cp3: at(0.62, 65.0),
                cp4: at(0.82, 35.0),
                end: at(0.95, 45.0),
                hue: HUE_LAVENDER,
            },
        ]
    }
}

#[derive(Clone, Debug)]
pub struct FlowParticle {
    pub path_index: usize,
    pub progress: f32,
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
    pub hue: f32,
    pub trail: Trail,
}

#[derive(Clone, Copy, Debug)]
struct FlowNode {
    pos: Vec2,
    label: &'static str,
    hue: f32,
}

/// IN -> AI -> OUT: particles ride three fixed curves past labelled nodes.
#[derive(Debug, Default)]
pub struct FlowPipeline {
    paths: Vec<FlowPath>,
    particles: Vec<FlowParticle>,
    nodes: Vec<FlowNode>,
    time: f32,
}

impl FlowPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[FlowPath] {
        &self.paths
    }

    pub fn particles(&self) -> &[FlowParticle] {
        &self.particles
    }

    fn particle_pos(&self, p: &FlowParticle) -> Option<Vec2> {
        self.paths.get(p.path_index).map(|path| path.sample(p.progress))
    }

    fn draw_paths(&self, surface: &mut dyn Surface) {
        for (index, path) in self.paths.iter().enumerate() {
            let shape = path.to_path();
            surface.stroke_path(
                &shape,
                &Paint::Solid(Hsla::new(path.hue, 40.0, 55.0, 0.1)),
                StrokeStyle::round(12.0),
            );
            let c = path.hue;
            let paint = Paint::linear(
                path.start,
                path.end,
                &[
                    (0.0, Hsla::new(c, 35.0, 55.0, 0.1)),
                    (0.3, Hsla::new(c, 50.0, 50.0, 0.35)),
                    (0.7, Hsla::new(c, 50.0, 50.0, 0.35)),
                    (1.0, Hsla::new(c, 35.0, 55.0, 0.1)),
                ],
            );
            let width = if index == 0 { 4.0 } else { 2.5 };
            surface.stroke_path(&shape, &paint, StrokeStyle::round(width));
        }
    }

    fn draw_nodes(&self, surface: &mut dyn Surface) {
        for (i, node) in self.nodes.iter().enumerate() {
            let scale = pulse(self.time, 2.5, i as f32 * 1.2, 0.12);
            let h = node.hue;
            glow_disc_stops(
                surface,
                node.pos,
                NODE_RADIUS * 3.0 * scale,
                &[
                    (0.0, Hsla::new(h, 45.0, 55.0, 0.3)),
                    (0.5, Hsla::new(h, 45.0, 55.0, 0.1)),
                    (1.0, Hsla::new(h, 45.0, 55.0, 0.0)),
                ],
            );
            surface.stroke_path(
                &Path::circle(node.pos, NODE_RADIUS * 1.5),
                &Paint::Solid(Hsla::new(h, 50.0, 60.0, 0.3)),
                StrokeStyle::new(2.0),
            );
            shaded_core(
                surface,
                node.pos,
                NODE_RADIUS,
                0.3,
                Hsla::new(h, 55.0, 65.0, 1.0),
                Hsla::new(h, 50.0, 45.0, 1.0),
            );
            surface.stroke_path(
                &Path::circle(node.pos, NODE_RADIUS),
                &Paint::Solid(Hsla::new(h, 60.0, 70.0, 1.0)),
                StrokeStyle::new(3.0),
            );
            surface.fill_path(
                &Path::circle(node.pos - Vec2::splat(NODE_RADIUS * 0.35), NODE_RADIUS * 0.25),
                &Paint::Solid(Hsla::new(0.0, 0.0, 100.0, 0.5)),
            );
            surface.fill_text(
                node.label,
                node.pos,
                LABEL_FONT,
                &Paint::Solid(Hsla::new(0.0, 0.0, 100.0, 1.0)),
            );
        }
    }
}

impl Visualization for FlowPipeline {
    fn name(&self) -> &'static str {
        "flow-pipeline"
    }

    fn init(&mut self, viewport: Viewport, rng: &mut SimRng) {
        self.paths = FlowPath::layout(viewport).to_vec();
        let cy = viewport.height * 0.5;
        self.nodes = vec![
            FlowNode {
                pos: Vec2::new(viewport.width * 0.18, cy),
                label: "IN",
                hue: HUE_LAVENDER,
            },
            FlowNode {
                pos: Vec2::new(viewport.width * 0.5, cy),
                label: "AI",
                hue: HUE_TEAL,
            },
            FlowNode {
                pos: Vec2::new(viewport.width * 0.82, cy),
                label: "OUT",
                hue: HUE_LAVENDER,
            },
        ];
        self.particles = (0..PARTICLE_COUNT)
            .map(|i| {
                let path_index = match i {
                    0..=19 => 0,
                    20..=29 => 1,
                    _ => 2,
                };
                FlowParticle {
                    path_index,
                    progress: unit(rng),
                    speed: 0.003 + unit(rng) * 0.004,
                    size: 3.0 + unit(rng) * 5.0,
                    opacity: 0.6 + unit(rng) * 0.4,
                    hue: self.paths[path_index].hue,
                    trail: Trail::new(TRAIL_LEN),
                }
            })
            .collect();
        log::debug!(
            "[viz] {} init: {} particles on {} paths",
            self.name(),
            self.particles.len(),
            self.paths.len()
        );
    }

    fn step(&mut self, rng: &mut SimRng) {
        self.time += crate::constants::FRAME_DT;
        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            p.progress += p.speed;
            if p.progress > 1.0 {
                p.progress = 0.0;
                p.trail.clear();
                p.size = 3.0 + unit(rng) * 5.0;
            }
            let Some(pos) = self.particle_pos(&self.particles[i]) else {
                continue;
            };
            self.particles[i].trail.push_front(pos);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.draw_paths(surface);

        for p in &self.particles {
            let Some(pos) = self.particle_pos(p) else {
                continue;
            };
            fade_trail(
                surface,
                &p.trail,
                Hsla::new(p.hue, 65.0, 60.0, p.opacity * 0.6),
                p.size * 0.6,
            );
            glow_disc(
                surface,
                pos,
                p.size * 3.0,
                Hsla::new(p.hue, 65.0, 60.0, p.opacity * 0.7),
            );
            shaded_core(
                surface,
                pos,
                p.size,
                0.3,
                Hsla::new(p.hue, 70.0, 75.0, p.opacity),
                Hsla::new(p.hue, 65.0, 55.0, p.opacity),
            );
        }

        self.draw_nodes(surface);
    }

    fn release(&mut self) {
        self.particles.clear();
        self.paths.clear();
        self.nodes.clear();
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{DrawCmd, DrawList};
    use crate::rng::sim_rng;

    #[test]
    fn sample_hits_the_anchor_points() {
        let path = FlowPath::layout(Viewport::new(1000.0, 400.0))[0];
        assert!(path.sample(0.0).distance(path.start) < 1e-4);
        assert!(path.sample(0.5).distance(path.mid) < 1e-4);
        assert!(path.sample(1.0).distance(path.end) < 1e-3);
    }

    #[test]
    fn particles_split_across_paths() {
        let mut rng = sim_rng(Some(9));
        let mut e = FlowPipeline::new();
        e.init(Viewport::new(800.0, 400.0), &mut rng);
        let on = |k| e.particles().iter().filter(|p| p.path_index == k).count();
        assert_eq!((on(0), on(1), on(2)), (20, 10, 10));
    }

    #[test]
    fn wrapped_particles_restart_with_empty_trail() {
        let mut rng = sim_rng(Some(9));
        let mut e = FlowPipeline::new();
        e.init(Viewport::new(800.0, 400.0), &mut rng);
        for _ in 0..400 {
            e.step(&mut rng);
            for p in e.particles() {
                assert!((0.0..=1.0).contains(&p.progress));
                assert!(p.trail.len() <= TRAIL_LEN);
                assert!((3.0..=8.0).contains(&p.size));
            }
        }
        assert_eq!(e.entity_count(), PARTICLE_COUNT);
    }

    #[test]
    fn nodes_are_labelled() {
        let mut rng = sim_rng(Some(1));
        let mut e = FlowPipeline::new();
        e.init(Viewport::new(800.0, 400.0), &mut rng);
        let mut list = DrawList::new(Vec2::new(800.0, 400.0));
        e.render(&mut list);
        let labels: Vec<&str> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCmd::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["IN", "AI", "OUT"]);
    }
}
