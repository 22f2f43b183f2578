use jigsaw_core::{PathSink, Point};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::constants::{HIGHLIGHT_BLUR, HIGHLIGHT_COLOR, HIGHLIGHT_OFFSET, HIGHLIGHT_OPACITY};

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

/// Red drop shadow for the dragged piece or group. Callers wrap it in
/// `save`/`restore`.
pub fn set_highlight_shadow(ctx: &CanvasRenderingContext2d) {
    ctx.set_shadow_color(HIGHLIGHT_COLOR);
    ctx.set_shadow_blur(HIGHLIGHT_BLUR);
    ctx.set_shadow_offset_x(HIGHLIGHT_OFFSET);
    ctx.set_shadow_offset_y(HIGHLIGHT_OFFSET);
    ctx.set_global_alpha(HIGHLIGHT_OPACITY);
}

/// Lets piece templates trace their outline straight into a 2D context.
pub struct CanvasPath<'a>(pub &'a CanvasRenderingContext2d);

impl PathSink for CanvasPath<'_> {
    fn begin_path(&mut self) {
        self.0.begin_path();
    }
    fn move_to(&mut self, p: Point) {
        self.0.move_to(p.x, p.y);
    }
    fn line_to(&mut self, p: Point) {
        self.0.line_to(p.x, p.y);
    }
    fn close_path(&mut self) {
        self.0.close_path();
    }
}

pub fn init_canvas(
    document: &Document,
    id: &str,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("canvas #{id} not found")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}
