//! Canvas 2D execution of a [`Scene`].
//!
//! Coordinates in the scene are CSS pixels around the blob center; the
//! context transform folds in devicePixelRatio and the center offset.

use crate::constants::BACKGROUND_CSS;
use blob_core::{closed_path, Circle, MicGlyph, Rgba, Scene};
use glam::Vec2;
use std::f64::consts::TAU;
use web_sys as web;

pub struct Canvas2d {
    ctx: web::CanvasRenderingContext2d,
}

impl Canvas2d {
    pub fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        use wasm_bindgen::JsCast;
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self { ctx })
    }

    pub fn draw(&self, scene: &Scene, dpr: f64) {
        let ctx = &self.ctx;
        _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        ctx.set_fill_style_str(BACKGROUND_CSS);
        ctx.fill_rect(0.0, 0.0, scene.width as f64, scene.height as f64);

        let c = scene.center();
        _ = ctx.translate(c.x as f64, c.y as f64);
        ctx.set_line_join("round");

        for outline in &scene.internal {
            self.trace(&outline.points);
            self.stroke(outline.color, outline.line_width);
        }
        for layer in &scene.layers {
            self.trace(&layer.points);
            ctx.set_fill_style_str(&layer.color.to_css());
            ctx.fill();
        }
        self.trace(&scene.glow.points);
        self.stroke(scene.glow.color, scene.glow.line_width);

        if let Some(ripple) = &scene.pause_ripple {
            self.circle(ripple);
        }
        self.mic(&scene.mic);
    }

    fn trace(&self, points: &[Vec2]) {
        let ctx = &self.ctx;
        let path = closed_path(points);
        ctx.begin_path();
        ctx.move_to(path.start.x as f64, path.start.y as f64);
        for seg in &path.segments {
            ctx.bezier_curve_to(
                seg.c1.x as f64,
                seg.c1.y as f64,
                seg.c2.x as f64,
                seg.c2.y as f64,
                seg.to.x as f64,
                seg.to.y as f64,
            );
        }
        ctx.close_path();
    }

    fn stroke(&self, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn circle(&self, c: &Circle) {
        self.ctx.begin_path();
        _ = self.ctx.arc(0.0, 0.0, c.radius.max(0.0) as f64, 0.0, TAU);
        self.stroke(c.color, c.line_width);
    }

    fn mic(&self, mic: &MicGlyph) {
        let ctx = &self.ctx;
        self.circle(&mic.ring);

        ctx.set_fill_style_str(&mic.body.to_css());
        let (y, w, h, r) = mic.head();
        self.rounded_rect(-w / 2.0, y - h / 2.0, w, h, r);
        ctx.fill();

        let (y, w, h) = mic.stand();
        ctx.fill_rect(
            (-w / 2.0) as f64,
            (y - h / 2.0) as f64,
            w as f64,
            h as f64,
        );

        let (y, rx, ry) = mic.base();
        ctx.begin_path();
        _ = ctx.ellipse(0.0, y as f64, rx as f64, ry as f64, 0.0, 0.0, TAU);
        ctx.fill();

        let (dots, radius) = mic.grille();
        ctx.set_fill_style_str(&mic.accent.to_css());
        for d in dots {
            ctx.begin_path();
            _ = ctx.arc(d.x as f64, d.y as f64, radius as f64, 0.0, TAU);
            ctx.fill();
        }
    }

    fn rounded_rect(&self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        let ctx = &self.ctx;
        let r = r.min(w / 2.0).min(h / 2.0).max(0.0) as f64;
        let (x, y, w, h) = (x as f64, y as f64, w as f64, h as f64);
        ctx.begin_path();
        ctx.move_to(x + r, y);
        _ = ctx.arc_to(x + w, y, x + w, y + h, r);
        _ = ctx.arc_to(x + w, y + h, x, y + h, r);
        _ = ctx.arc_to(x, y + h, x, y, r);
        _ = ctx.arc_to(x, y, x + w, y, r);
        ctx.close_path();
    }
}
