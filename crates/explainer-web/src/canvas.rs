//! Canvas 2D implementation of the core drawing surface.

use explainer_core::{
    ExplainerError, ExplainerResult, Hsla, LineCap, Paint, Path, PathEl, StrokeStyle, Surface,
    Viewport,
};
use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    size: Vec2, // CSS pixels
    failed: bool,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> ExplainerResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| ExplainerError::surface(format!("get_context failed: {:?}", e)))?
            .ok_or_else(|| ExplainerError::surface("canvas has no 2d context"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| ExplainerError::surface(format!("not a 2d context: {:?}", e)))?;
        let mut surface = Self {
            canvas,
            ctx,
            size: Vec2::ZERO,
            failed: false,
        };
        surface.sync_backing_size();
        Ok(surface)
    }

    /// Match the backing store to CSS size × devicePixelRatio and draw in CSS units.
    pub fn sync_backing_size(&mut self) -> Viewport {
        let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let rect = self.canvas.get_bounding_client_rect();
        let viewport =
            Viewport::new(rect.width() as f32, rect.height() as f32).with_dpr(dpr as f32);
        let (w_px, h_px) = viewport.pixel_size();
        if self.canvas.width() != w_px || self.canvas.height() != h_px {
            self.canvas.set_width(w_px);
            self.canvas.set_height(h_px);
        }
        // resizing resets the context state, so always reapply the transform
        self.check(self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0));
        self.size = viewport.size();
        viewport
    }

    fn check(&mut self, result: Result<(), JsValue>) {
        if let Err(e) = result {
            // one report per surface, canvas errors tend to repeat every frame
            if !self.failed {
                log::warn!("[canvas] draw call failed: {:?}", e);
                self.failed = true;
            }
        }
    }

    fn gradient(&mut self, paint: &Paint) -> Option<web::CanvasGradient> {
        let (gradient, stops) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear { from, to, stops } => (
                self.ctx
                    .create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64),
                stops,
            ),
            Paint::Radial {
                inner,
                inner_radius,
                outer,
                outer_radius,
                stops,
            } => {
                let g = self.ctx.create_radial_gradient(
                    inner.x as f64,
                    inner.y as f64,
                    *inner_radius as f64,
                    outer.x as f64,
                    outer.y as f64,
                    *outer_radius as f64,
                );
                match g {
                    Ok(g) => (g, stops),
                    Err(e) => {
                        self.check(Err(e));
                        return None;
                    }
                }
            }
        };
        for (offset, color) in stops.iter() {
            let r = gradient.add_color_stop(offset.clamp(0.0, 1.0), &color.css());
            self.check(r);
        }
        Some(gradient)
    }

    fn fallback_color(paint: &Paint) -> Hsla {
        match paint {
            Paint::Solid(c) => *c,
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => stops
                .first()
                .map(|(_, c)| *c)
                .unwrap_or(Hsla::new(0.0, 0.0, 0.0, 0.0)),
        }
    }

    fn set_fill(&mut self, paint: &Paint) {
        match self.gradient(paint) {
            Some(g) => self.ctx.set_fill_style_canvas_gradient(&g),
            None => self.ctx.set_fill_style_str(&Self::fallback_color(paint).css()),
        }
    }

    fn set_stroke(&mut self, paint: &Paint) {
        match self.gradient(paint) {
            Some(g) => self.ctx.set_stroke_style_canvas_gradient(&g),
            None => self.ctx.set_stroke_style_str(&Self::fallback_color(paint).css()),
        }
    }

    fn trace(&mut self, path: &Path) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x as f64, p.y as f64),
                PathEl::LineTo(p) => self.ctx.line_to(p.x as f64, p.y as f64),
                PathEl::QuadTo(c, p) => {
                    self.ctx
                        .quadratic_curve_to(c.x as f64, c.y as f64, p.x as f64, p.y as f64)
                }
                PathEl::CubicTo(c1, c2, p) => self.ctx.bezier_curve_to(
                    c1.x as f64,
                    c1.y as f64,
                    c2.x as f64,
                    c2.y as f64,
                    p.x as f64,
                    p.y as f64,
                ),
                PathEl::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => {
                    let r = self.ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        radius.max(0.0) as f64,
                        start as f64,
                        end as f64,
                    );
                    self.check(r);
                }
                PathEl::Close => self.ctx.close_path(),
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.set_fill(paint);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.trace(path);
        self.set_fill(paint);
        self.ctx.fill();
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, stroke: StrokeStyle) {
        self.trace(path);
        self.set_stroke(paint);
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.set_line_cap(match stroke.cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        });
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let r = self.ctx.fill_text(text, at.x as f64, at.y as f64);
        self.check(r);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let r = self.ctx.translate(offset.x as f64, offset.y as f64);
        self.check(r);
    }

    fn rotate(&mut self, radians: f32) {
        let r = self.ctx.rotate(radians as f64);
        self.check(r);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_blur(&mut self, radius_px: f32) {
        if radius_px > 0.0 {
            self.ctx.set_filter(&format!("blur({}px)", radius_px));
        } else {
            self.ctx.set_filter("none");
        }
    }
}
