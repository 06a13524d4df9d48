//! Canvas 2D painter
//!
//! Portrait screens draw the landscape table turned a quarter turn
//! clockwise, the inverse of `ScreenTracker::to_logical`.

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Painter, TextAlign};
use crate::error::{PongError, Result};
use crate::sim::{Color, Orientation, Surface};

pub struct Canvas2dPainter {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dPainter {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| PongError::InvalidArgument(format!("canvas context: {e:?}")))?
            .ok_or_else(|| PongError::InvalidArgument("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PongError::InvalidArgument("not a 2d context".into()))?;
        Ok(Self { ctx })
    }
}

impl Painter for Canvas2dPainter {
    fn clear(&mut self, table: Surface, orientation: Orientation, color: Color) {
        let ctx = &self.ctx;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        if orientation == Orientation::Portrait {
            // Physical width is the table height
            ctx.translate(table.height as f64, 0.0).ok();
            ctx.rotate(std::f64::consts::FRAC_PI_2).ok();
        }
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill_rect(0.0, 0.0, table.width as f64, table.height as f64);
    }

    fn fill_rect(&mut self, center: Vec2, size: Vec2, color: Color) {
        let corner = center - size / 2.0;
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(corner.x as f64, corner.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Color) {
        let ctx = &self.ctx;
        ctx.set_font(&format!("{}px monospace", size_px));
        ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        ctx.set_text_baseline("top");
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn dashed_line(&mut self, from: Vec2, to: Vec2, dash: f32, width: f32, color: Color) {
        let ctx = &self.ctx;
        let pattern = js_sys::Array::of2(&JsValue::from_f64(dash as f64), &JsValue::from_f64(dash as f64));
        ctx.set_line_dash(&pattern).ok();
        ctx.set_line_width(width as f64);
        ctx.set_stroke_style_str(&color.to_css());
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.stroke();
        ctx.set_line_dash(&js_sys::Array::new()).ok();
    }
}
