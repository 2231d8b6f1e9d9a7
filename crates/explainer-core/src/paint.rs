//! Minimal 2D drawing vocabulary shared by every visualization engine.
//!
//! Engines only ever talk to a [`Surface`]. The web frontend implements it on
//! top of a canvas 2D context; [`DrawList`] records commands for tests and the
//! native SVG exporter.

use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// Hue in degrees, saturation and lightness in percent, alpha in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn css(&self) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.h,
            self.s,
            self.l,
            self.a.clamp(0.0, 1.0)
        )
    }

    /// sRGB channels in 0..=255, alpha dropped.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return [v, v, v];
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |mut t: f32| {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };
        [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
    }
}

pub type ColorStops = SmallVec<[(f32, Hsla); 4]>;

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Hsla),
    Linear {
        from: Vec2,
        to: Vec2,
        stops: ColorStops,
    },
    Radial {
        inner: Vec2,
        inner_radius: f32,
        outer: Vec2,
        outer_radius: f32,
        stops: ColorStops,
    },
}

impl Paint {
    pub fn linear(from: Vec2, to: Vec2, stops: &[(f32, Hsla)]) -> Self {
        Self::Linear {
            from,
            to,
            stops: SmallVec::from_slice(stops),
        }
    }

    pub fn radial(center: Vec2, radius: f32, stops: &[(f32, Hsla)]) -> Self {
        Self::radial_offset(center, center, radius, stops)
    }

    /// Radial gradient whose focal point sits at `inner` (zero radius).
    pub fn radial_offset(inner: Vec2, outer: Vec2, radius: f32, stops: &[(f32, Hsla)]) -> Self {
        Self::Radial {
            inner,
            inner_radius: 0.0,
            outer,
            outer_radius: radius.max(0.0),
            stops: SmallVec::from_slice(stops),
        }
    }
}

impl From<Hsla> for Paint {
    fn from(c: Hsla) -> Self {
        Self::Solid(c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathEl {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
    },
    Close,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    els: Vec<PathEl>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        let mut p = Self::new();
        p.arc(center, radius.max(0.0), 0.0, TAU);
        p
    }

    pub fn line(a: Vec2, b: Vec2) -> Self {
        let mut p = Self::new();
        p.move_to(a).line_to(b);
        p
    }

    pub fn polyline(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut p = Self::new();
        for (i, pt) in points.into_iter().enumerate() {
            if i == 0 {
                p.move_to(pt);
            } else {
                p.line_to(pt);
            }
        }
        p
    }

    pub fn round_rect(origin: Vec2, size: Vec2, radius: f32) -> Self {
        let r = radius.min(size.x * 0.5).min(size.y * 0.5).max(0.0);
        let (x0, y0) = (origin.x, origin.y);
        let (x1, y1) = (origin.x + size.x, origin.y + size.y);
        let mut p = Self::new();
        p.move_to(Vec2::new(x0 + r, y0))
            .line_to(Vec2::new(x1 - r, y0))
            .quad_to(Vec2::new(x1, y0), Vec2::new(x1, y0 + r))
            .line_to(Vec2::new(x1, y1 - r))
            .quad_to(Vec2::new(x1, y1), Vec2::new(x1 - r, y1))
            .line_to(Vec2::new(x0 + r, y1))
            .quad_to(Vec2::new(x0, y1), Vec2::new(x0, y1 - r))
            .line_to(Vec2::new(x0, y0 + r))
            .quad_to(Vec2::new(x0, y0), Vec2::new(x0 + r, y0))
            .close();
        p
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.els.push(PathEl::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.els.push(PathEl::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, ctrl: Vec2, p: Vec2) -> &mut Self {
        self.els.push(PathEl::QuadTo(ctrl, p));
        self
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) -> &mut Self {
        self.els.push(PathEl::CubicTo(c1, c2, p));
        self
    }

    pub fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) -> &mut Self {
        self.els.push(PathEl::Arc {
            center,
            radius,
            start,
            end,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.els.push(PathEl::Close);
        self
    }

    pub fn elements(&self) -> &[PathEl] {
        &self.els
    }

    pub fn is_empty(&self) -> bool {
        self.els.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub const fn new(width: f32) -> Self {
        Self {
            width,
            cap: LineCap::Butt,
        }
    }

    pub const fn round(width: f32) -> Self {
        Self {
            width,
            cap: LineCap::Round,
        }
    }
}

/// A 2D drawing surface in CSS pixels.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, paint: &Paint, stroke: StrokeStyle);
    /// Text centred on `at` (both axes).
    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, paint: &Paint);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_blur(&mut self, radius_px: f32);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    FillRect {
        origin: Vec2,
        size: Vec2,
        paint: Paint,
    },
    FillPath {
        path: Path,
        paint: Paint,
    },
    StrokePath {
        path: Path,
        paint: Paint,
        stroke: StrokeStyle,
    },
    FillText {
        text: String,
        at: Vec2,
        font: String,
        paint: Paint,
    },
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    GlobalAlpha(f32),
    Blur(f32),
}

/// Recording surface. `clear` discards everything drawn so far.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    size: Vec2,
    cmds: Vec<DrawCmd>,
    clears: u64,
}

impl DrawList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            cmds: Vec::new(),
            clears: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn count_where(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.cmds.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.cmds.clear();
        self.clears += 1;
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.cmds.push(DrawCmd::FillRect {
            origin,
            size,
            paint: paint.clone(),
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.cmds.push(DrawCmd::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, stroke: StrokeStyle) {
        self.cmds.push(DrawCmd::StrokePath {
            path: path.clone(),
            paint: paint.clone(),
            stroke,
        });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, paint: &Paint) {
        self.cmds.push(DrawCmd::FillText {
            text: text.to_owned(),
            at,
            font: font.to_owned(),
            paint: paint.clone(),
        });
    }

    fn save(&mut self) {
        self.cmds.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.cmds.push(DrawCmd::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.cmds.push(DrawCmd::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.cmds.push(DrawCmd::Rotate(radians));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.cmds.push(DrawCmd::GlobalAlpha(alpha));
    }

    fn set_blur(&mut self, radius_px: f32) {
        self.cmds.push(DrawCmd::Blur(radius_px));
    }
}

// ---------------- Shared drawing helpers ----------------

/// Soft halo: `color` at the centre fading to transparent at `radius`.
pub fn glow_disc(surface: &mut dyn Surface, center: Vec2, radius: f32, color: Hsla) {
    if radius <= 0.0 {
        return;
    }
    let paint = Paint::radial(center, radius, &[(0.0, color), (1.0, color.with_alpha(0.0))]);
    surface.fill_path(&Path::circle(center, radius), &paint);
}

pub fn glow_disc_stops(
    surface: &mut dyn Surface,
    center: Vec2,
    radius: f32,
    stops: &[(f32, Hsla)],
) {
    if radius <= 0.0 {
        return;
    }
    surface.fill_path(&Path::circle(center, radius), &Paint::radial(center, radius, stops));
}

/// Solid sphere look: highlight offset up-left by `offset` of the radius.
pub fn shaded_core(
    surface: &mut dyn Surface,
    center: Vec2,
    radius: f32,
    offset: f32,
    light: Hsla,
    dark: Hsla,
) {
    if radius <= 0.0 {
        return;
    }
    let focal = center - Vec2::splat(radius * offset);
    let paint = Paint::radial_offset(focal, center, radius, &[(0.0, light), (1.0, dark)]);
    surface.fill_path(&Path::circle(center, radius), &paint);
}
