use super::{pulse, Viewport, Visualization};
use crate::constants::{HUE_LAVENDER, HUE_TEAL, WAVE_FRAME_DT};
use crate::paint::{glow_disc, Hsla, Paint, Path, StrokeStyle, Surface};
use crate::rng::{unit, SimRng};
use glam::Vec2;
use std::f32::consts::TAU;

const POINTS_PER_LINE: usize = 100;
const GLOW_BLUR_PX: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveVariant {
    /// Many overlapping, irregular lines.
    Chaos,
    /// Few calm, evenly phased lines.
    Order,
}

impl WaveVariant {
    pub fn line_count(self) -> usize {
        match self {
            WaveVariant::Chaos => 12,
            WaveVariant::Order => 6,
        }
    }

    pub fn spark_count(self) -> usize {
        match self {
            WaveVariant::Chaos => 20,
            WaveVariant::Order => 10,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WaveLine {
    pub base_y: f32,
    pub speed: f32,
    pub amplitude: f32,
    pub phase: f32,
    pub points: Vec<Vec2>,
    hue: f32,
    saturation: f32,
    lightness: f32,
    alpha: f32,
}

/// Horizontal sine bundles; the variant picks how tangled they look.
#[derive(Debug)]
pub struct WaveField {
    variant: WaveVariant,
    lines: Vec<WaveLine>,
    width: f32,
    time: f32,
}

impl WaveField {
    pub fn new(variant: WaveVariant) -> Self {
        Self {
            variant,
            lines: Vec::new(),
            width: 0.0,
            time: 0.0,
        }
    }

    pub fn variant(&self) -> WaveVariant {
        self.variant
    }

    pub fn lines(&self) -> &[WaveLine] {
        &self.lines
    }

    fn offset(&self, line: &WaveLine, i: usize) -> f32 {
        let t = self.time * line.speed;
        let x = i as f32;
        let a = line.amplitude;
        match self.variant {
            WaveVariant::Chaos => {
                (t * 50.0 + x * 0.08 + line.phase).sin() * a
                    + (t * 25.0 + x * 0.04).sin() * a * 0.4
                    + (t * 80.0 + x * 0.15).sin() * a * 0.2
            }
            WaveVariant::Order => {
                (t * 45.0 + x * 0.06 + line.phase).sin() * a + (t * 20.0 + x * 0.03).sin() * a * 0.3
            }
        }
    }

    fn line_path(points: &[Vec2]) -> Path {
        let mut path = Path::new();
        let Some(&first) = points.first() else {
            return path;
        };
        path.move_to(first);
        // smooth through midpoints, using each sample as the control point
        for pair in points.windows(2) {
            let mid = (pair[0] + pair[1]) * 0.5;
            path.quad_to(pair[0], mid);
        }
        path
    }

    fn stroke_width(&self, line_index: usize) -> f32 {
        match self.variant {
            WaveVariant::Chaos => 1.5 + (self.time + line_index as f32).sin() * 0.5,
            WaveVariant::Order => 2.5,
        }
    }

    fn draw_sparks(&self, surface: &mut dyn Surface) {
        if self.lines.is_empty() {
            return;
        }
        for i in 0..self.variant.spark_count() {
            let line = &self.lines[i % self.lines.len()];
            if line.points.is_empty() {
                continue;
            }
            let len = line.points.len() as f32;
            let idx = ((self.time * 10.0 + i as f32 * 10.0) % len).floor() as usize;
            let Some(&at) = line.points.get(idx) else {
                continue;
            };
            let size = pulse(self.time, 3.0, i as f32, 0.3);
            let alpha = 0.4 + (self.time * 2.0 + i as f32 * 0.5).sin() * 0.2;
            let hue = match self.variant {
                WaveVariant::Chaos if i % 2 == 0 => HUE_LAVENDER,
                _ => HUE_TEAL,
            };
            glow_disc(surface, at, 6.0 * size, Hsla::new(hue, 60.0, 60.0, alpha));
            surface.fill_path(
                &Path::circle(at, 2.0 * size),
                &Paint::Solid(Hsla::new(hue, 65.0, 65.0, alpha + 0.2)),
            );
        }
    }
}

impl Visualization for WaveField {
    fn name(&self) -> &'static str {
        match self.variant {
            WaveVariant::Chaos => "wave-field-chaos",
            WaveVariant::Order => "wave-field-order",
        }
    }

    fn init(&mut self, viewport: Viewport, rng: &mut SimRng) {
        let n = self.variant.line_count();
        self.width = viewport.width;
        let spacing = viewport.height / (n as f32 + 1.0);
        let chaos = self.variant == WaveVariant::Chaos;

        self.lines = (0..n)
            .map(|li| {
                let l = li as f32;
                let (speed, amplitude, phase) = if chaos {
                    (
                        0.015 + unit(rng) * 0.025,
                        12.0 + unit(rng) * 22.0,
                        unit(rng) * TAU,
                    )
                } else {
                    (0.012 + l * 0.002, 6.0 + l * 2.0, l * 0.4)
                };
                let (hue, saturation, lightness, alpha) = if chaos {
                    (
                        if li % 2 == 0 { HUE_LAVENDER } else { HUE_TEAL },
                        35.0 + l * 3.0,
                        50.0 + l * 2.0,
                        0.25 - l * 0.015,
                    )
                } else {
                    (HUE_TEAL, 55.0 - l * 5.0, 48.0 + l * 3.0, 0.4 - l * 0.05)
                };
                WaveLine {
                    base_y: spacing * (l + 1.0),
                    speed,
                    amplitude,
                    phase,
                    points: Vec::with_capacity(POINTS_PER_LINE),
                    hue,
                    saturation,
                    lightness,
                    alpha,
                }
            })
            .collect();
        log::debug!("[viz] {} init: {} lines", self.name(), n);
    }

    fn step(&mut self, _rng: &mut SimRng) {
        self.time += WAVE_FRAME_DT;
        let dx = self.width / (POINTS_PER_LINE - 1) as f32;
        let mut lines = std::mem::take(&mut self.lines);
        for line in &mut lines {
            let points: Vec<Vec2> = (0..POINTS_PER_LINE)
                .map(|i| Vec2::new(dx * i as f32, line.base_y + self.offset(line, i)))
                .collect();
            line.points = points;
        }
        self.lines = lines;
    }

    fn render(&self, surface: &mut dyn Surface) {
        for (li, line) in self.lines.iter().enumerate() {
            if line.points.len() < 2 {
                continue;
            }
            let path = Self::line_path(&line.points);
            let a = line.alpha;
            let base = Hsla::new(line.hue, line.saturation, line.lightness, a);
            let paint = Paint::linear(
                Vec2::ZERO,
                Vec2::new(self.width, 0.0),
                &[
                    (0.0, base.with_alpha(a * 0.3)),
                    (0.3, base),
                    (0.7, base),
                    (1.0, base.with_alpha(a * 0.3)),
                ],
            );
            surface.stroke_path(&path, &paint, StrokeStyle::round(self.stroke_width(li)));

            if li % 3 == 0 {
                surface.save();
                surface.set_blur(GLOW_BLUR_PX);
                surface.set_global_alpha(0.3);
                surface.stroke_path(
                    &path,
                    &Paint::Solid(Hsla::new(
                        line.hue,
                        line.saturation + 10.0,
                        line.lightness + 10.0,
                        a * 0.5,
                    )),
                    StrokeStyle::round(4.0),
                );
                surface.restore();
            }
        }
        self.draw_sparks(surface);
    }

    fn release(&mut self) {
        self.lines.clear();
    }

    fn entity_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{DrawCmd, DrawList};
    use crate::rng::sim_rng;

    fn field(variant: WaveVariant) -> (WaveField, SimRng) {
        let mut rng = sim_rng(Some(5));
        let mut f = WaveField::new(variant);
        f.init(Viewport::new(990.0, 700.0), &mut rng);
        (f, rng)
    }

    #[test]
    fn line_counts_follow_variant() {
        assert_eq!(field(WaveVariant::Chaos).0.entity_count(), 12);
        assert_eq!(field(WaveVariant::Order).0.entity_count(), 6);
    }

    #[test]
    fn order_lines_are_evenly_spaced_and_phased() {
        let (f, _) = field(WaveVariant::Order);
        for (i, line) in f.lines().iter().enumerate() {
            assert!((line.base_y - 100.0 * (i as f32 + 1.0)).abs() < 1e-3);
            assert!((line.phase - i as f32 * 0.4).abs() < 1e-6);
        }
    }

    #[test]
    fn points_span_the_width_within_amplitude() {
        let (mut f, mut rng) = field(WaveVariant::Chaos);
        f.step(&mut rng);
        for line in f.lines() {
            assert_eq!(line.points.len(), POINTS_PER_LINE);
            assert_eq!(line.points[0].x, 0.0);
            assert!((line.points[POINTS_PER_LINE - 1].x - 990.0).abs() < 1e-3);
            let bound = line.amplitude * 1.6 + 1e-3;
            assert!(line.points.iter().all(|p| (p.y - line.base_y).abs() <= bound));
        }
    }

    #[test]
    fn every_third_line_gets_a_blurred_glow() {
        let (mut f, mut rng) = field(WaveVariant::Order);
        f.step(&mut rng);
        let mut list = DrawList::new(Vec2::new(990.0, 700.0));
        f.render(&mut list);
        assert_eq!(list.count_where(|c| matches!(c, DrawCmd::Blur(_))), 2);
        assert_eq!(
            list.count_where(|c| matches!(c, DrawCmd::Save)),
            list.count_where(|c| matches!(c, DrawCmd::Restore))
        );
    }
}
