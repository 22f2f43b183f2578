use jigsaw_core::{Point, PuzzleConfig};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent};

use crate::constants::DEFAULT_IMAGE_BASE;

/// Convert client coordinates into canvas internal pixel coordinates so hit
/// testing works even if CSS scales the canvas element.
pub fn event_canvas_coords(e: &MouseEvent, cv: &HtmlCanvasElement) -> Point {
    if let Some(el) = cv.dyn_ref::<web_sys::Element>() {
        let rect = el.get_bounding_client_rect();
        let x = (e.client_x() as f64 - rect.left()) * (cv.width() as f64) / rect.width().max(1.0);
        let y = (e.client_y() as f64 - rect.top()) * (cv.height() as f64) / rect.height().max(1.0);
        Point::new(x, y)
    } else {
        Point::new(e.offset_x() as f64, e.offset_y() as f64)
    }
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .unwrap_or_else(|_| s.into())
        .to_string()
}

/// Defaults overridden by `rows` and `cols`. Unparsable or invalid values
/// are logged and ignored.
pub fn config_from_search(search: &str) -> PuzzleConfig {
    let mut cfg = PuzzleConfig::default();
    let parse = |key: &str| {
        let raw = get_query_param(search, key)?;
        match raw.trim().parse::<usize>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, %raw, error = %e, "ignoring query parameter");
                None
            }
        }
    };
    if let Some(rows) = parse("rows") {
        cfg.rows = rows;
    }
    if let Some(cols) = parse("cols") {
        cfg.cols = cols;
    }
    if let Err(e) = cfg.validate() {
        tracing::warn!(error = %e, "falling back to the default grid");
        return PuzzleConfig::default();
    }
    cfg
}

pub fn seed_from_search(search: &str) -> Option<u64> {
    get_query_param(search, "seed")?.trim().parse().ok()
}

/// `img` query parameter, or a random picture the size of the solved puzzle.
pub fn image_url(search: &str, cfg: &PuzzleConfig) -> String {
    if let Some(url) = get_query_param(search, "img").filter(|u| !u.trim().is_empty()) {
        return url;
    }
    let (w, h) = cfg.picture_size();
    format!("{DEFAULT_IMAGE_BASE}/{}/{}", w.round() as u32, h.round() as u32)
}

/// Seed for a fresh layout when the page did not pin one.
pub fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}
