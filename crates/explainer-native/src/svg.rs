//! Serialises recorded draw commands into a standalone SVG document.

use explainer_core::{DrawCmd, Hsla, LineCap, Paint, Path, PathEl};
use glam::Vec2;
use std::f32::consts::{PI, TAU};
use std::fmt::Write as _;

#[derive(Clone, Copy)]
struct State {
    alpha: f32,
    blur: f32,
    open_groups: usize,
}

impl Default for State {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            blur: 0.0,
            open_groups: 0,
        }
    }
}

/// Accumulates one or more command layers and renders them bottom to top.
pub struct SvgDocument {
    size: Vec2,
    body: String,
    next_id: usize,
    stack: Vec<State>,
    state: State,
    blur_filters: Vec<f32>,
}

fn rgb(c: &Hsla) -> String {
    let [r, g, b] = c.to_rgb8();
    format!("rgb({},{},{})", r, g, b)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn point_on(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// SVG path data, with canvas `arc` segments expanded into elliptical arcs.
pub fn path_data(path: &Path) -> String {
    let mut d = String::new();
    let mut has_point = false;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                let _ = write!(d, "M{:.2} {:.2}", p.x, p.y);
                has_point = true;
            }
            PathEl::LineTo(p) => {
                let _ = write!(d, "L{:.2} {:.2}", p.x, p.y);
                has_point = true;
            }
            PathEl::QuadTo(c, p) => {
                let _ = write!(d, "Q{:.2} {:.2} {:.2} {:.2}", c.x, c.y, p.x, p.y);
            }
            PathEl::CubicTo(c1, c2, p) => {
                let _ = write!(
                    d,
                    "C{:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                );
            }
            PathEl::Arc {
                center,
                radius,
                start,
                end,
            } => {
                let r = radius.max(0.0);
                let from = point_on(center, r, start);
                let lead = if has_point { 'L' } else { 'M' };
                let _ = write!(d, "{}{:.2} {:.2}", lead, from.x, from.y);
                has_point = true;
                let mut sweep = end - start;
                if sweep < 0.0 {
                    sweep = sweep.rem_euclid(TAU);
                }
                if sweep >= TAU - 1e-4 {
                    // a full turn has no distinct end point, so draw two halves
                    let mid = point_on(center, r, start + PI);
                    let _ = write!(
                        d,
                        "A{r:.2} {r:.2} 0 1 1 {:.2} {:.2}A{r:.2} {r:.2} 0 1 1 {:.2} {:.2}",
                        mid.x,
                        mid.y,
                        from.x,
                        from.y,
                        r = r
                    );
                } else if sweep > 0.0 {
                    let to = point_on(center, r, start + sweep);
                    let large = u8::from(sweep > PI);
                    let _ = write!(
                        d,
                        "A{r:.2} {r:.2} 0 {} 1 {:.2} {:.2}",
                        large,
                        to.x,
                        to.y,
                        r = r
                    );
                }
            }
            PathEl::Close => d.push('Z'),
        }
    }
    d
}

impl SvgDocument {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            body: String::new(),
            next_id: 0,
            stack: Vec::new(),
            state: State::default(),
            blur_filters: Vec::new(),
        }
    }

    /// Append one recorded layer. Transform state never leaks between layers.
    pub fn push_layer(&mut self, cmds: &[DrawCmd]) {
        for cmd in cmds {
            self.command(cmd);
        }
        while !self.stack.is_empty() {
            self.restore();
        }
        self.close_groups();
        self.state = State::default();
    }

    pub fn finish(self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.size.x,
            h = self.size.y
        );
        if !self.blur_filters.is_empty() {
            out.push_str("<defs>");
            for radius in &self.blur_filters {
                let _ = write!(
                    out,
                    r#"<filter id="{}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{}"/></filter>"#,
                    blur_id(*radius),
                    radius
                );
            }
            out.push_str("</defs>\n");
        }
        let _ = writeln!(
            out,
            r##"<rect width="100%" height="100%" fill="#000"/>"##
        );
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    fn command(&mut self, cmd: &DrawCmd) {
        match cmd {
            DrawCmd::FillRect {
                origin,
                size,
                paint,
            } => {
                let fill = self.paint_ref(paint);
                let extra = self.state_attrs();
                let _ = writeln!(
                    self.body,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}{}/>"#,
                    origin.x, origin.y, size.x, size.y, fill.attrs("fill"), extra
                );
            }
            DrawCmd::FillPath { path, paint } => {
                let fill = self.paint_ref(paint);
                let extra = self.state_attrs();
                let _ = writeln!(
                    self.body,
                    r#"<path d="{}" {}{}/>"#,
                    path_data(path),
                    fill.attrs("fill"),
                    extra
                );
            }
            DrawCmd::StrokePath {
                path,
                paint,
                stroke,
            } => {
                let color = self.paint_ref(paint);
                let extra = self.state_attrs();
                let cap = match stroke.cap {
                    LineCap::Butt => "butt",
                    LineCap::Round => "round",
                };
                let _ = writeln!(
                    self.body,
                    r#"<path d="{}" fill="none" {} stroke-width="{:.2}" stroke-linecap="{}"{}/>"#,
                    path_data(path),
                    color.attrs("stroke"),
                    stroke.width,
                    cap,
                    extra
                );
            }
            DrawCmd::FillText {
                text,
                at,
                font,
                paint,
            } => {
                let fill = self.paint_ref(paint);
                let extra = self.state_attrs();
                let _ = writeln!(
                    self.body,
                    r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" style="font: {}" {}{}>{}</text>"#,
                    at.x,
                    at.y,
                    escape(font),
                    fill.attrs("fill"),
                    extra,
                    escape(text)
                );
            }
            DrawCmd::Save => {
                self.stack.push(self.state);
                self.state.open_groups = 0;
            }
            DrawCmd::Restore => self.restore(),
            DrawCmd::Translate(offset) => {
                let _ = writeln!(
                    self.body,
                    r#"<g transform="translate({:.2} {:.2})">"#,
                    offset.x, offset.y
                );
                self.state.open_groups += 1;
            }
            DrawCmd::Rotate(radians) => {
                let _ = writeln!(
                    self.body,
                    r#"<g transform="rotate({:.3})">"#,
                    radians.to_degrees()
                );
                self.state.open_groups += 1;
            }
            DrawCmd::GlobalAlpha(a) => self.state.alpha = a.clamp(0.0, 1.0),
            DrawCmd::Blur(r) => {
                let r = r.max(0.0);
                if r > 0.0 && !self.blur_filters.contains(&r) {
                    self.blur_filters.push(r);
                }
                self.state.blur = r;
            }
        }
    }

    fn close_groups(&mut self) {
        for _ in 0..self.state.open_groups {
            self.body.push_str("</g>\n");
        }
        self.state.open_groups = 0;
    }

    fn restore(&mut self) {
        self.close_groups();
        if let Some(prev) = self.stack.pop() {
            self.state = prev;
        }
    }

    fn state_attrs(&self) -> String {
        let mut s = String::new();
        if self.state.alpha < 1.0 {
            let _ = write!(s, r#" opacity="{:.3}""#, self.state.alpha);
        }
        if self.state.blur > 0.0 {
            let _ = write!(s, r#" filter="url(#{})""#, blur_id(self.state.blur));
        }
        s
    }

    /// Emits gradient defs inline when needed.
    fn paint_ref(&mut self, paint: &Paint) -> PaintRef {
        let stops = match paint {
            Paint::Solid(c) => return PaintRef::Color(*c),
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => stops,
        };
        let id = format!("g{}", self.next_id);
        self.next_id += 1;
        let mut stop_tags = String::new();
        for (offset, c) in stops.iter() {
            let _ = write!(
                stop_tags,
                r#"<stop offset="{:.3}" stop-color="{}" stop-opacity="{:.3}"/>"#,
                offset.clamp(0.0, 1.0),
                rgb(c),
                c.a.clamp(0.0, 1.0)
            );
        }
        let _ = match paint {
            Paint::Linear { from, to, .. } => writeln!(
                self.body,
                r#"<defs><linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}">{}</linearGradient></defs>"#,
                id, from.x, from.y, to.x, to.y, stop_tags
            ),
            Paint::Radial {
                inner,
                inner_radius,
                outer,
                outer_radius,
                ..
            } => writeln!(
                self.body,
                r#"<defs><radialGradient id="{}" gradientUnits="userSpaceOnUse" cx="{:.2}" cy="{:.2}" r="{:.2}" fx="{:.2}" fy="{:.2}" fr="{:.2}">{}</radialGradient></defs>"#,
                id, outer.x, outer.y, outer_radius, inner.x, inner.y, inner_radius, stop_tags
            ),
            Paint::Solid(_) => Ok(()),
        };
        PaintRef::Gradient(id)
    }
}

fn blur_id(radius: f32) -> String {
    format!("blur-{}", radius.to_string().replace('.', "_"))
}

enum PaintRef {
    Color(Hsla),
    Gradient(String),
}

impl PaintRef {
    fn attrs(&self, prop: &str) -> String {
        match self {
            PaintRef::Color(c) => format!(
                r#"{p}="{}" {p}-opacity="{:.3}""#,
                rgb(c),
                c.a.clamp(0.0, 1.0),
                p = prop
            ),
            PaintRef::Gradient(id) => format!(r#"{}="url(#{})""#, prop, id),
        }
    }
}
