use std::cell::RefCell;
use std::rc::Rc;

use jigsaw_core::{Board, DragEnd, Node, PieceId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, HtmlImageElement, MouseEvent};

mod canvas;
mod constants;
mod state;
mod upload;
mod utils;

use crate::canvas::{CanvasPath, init_canvas, set_fill_style, set_highlight_shadow, set_stroke_style};
use crate::constants::{
    BACKGROUND, BLANK_FILL, CANVAS_ID, OUTLINE_COLOR, REGENERATE_ID, SOLVED_COLOR, STATUS_ID,
    UNSOLVED_COLOR,
};
use crate::state::{Drag, STATE, State, with_state};
use crate::utils::{config_from_search, event_canvas_coords, image_url, random_seed, seed_from_search};

fn draw(state: &State) {
    let ctx = &state.ctx;
    let width = state.canvas.width() as f64;
    let height = state.canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);
    set_fill_style(ctx, BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);

    let Some(board) = &state.board else {
        return;
    };
    let dragged = state.drag.map(|d| d.target);
    for &node in board.root() {
        let members: Vec<PieceId> = match node {
            Node::Piece(id) => vec![id],
            Node::Group(g) => board.group(g).map(|g| g.members.clone()).unwrap_or_default(),
        };
        // shadows first so they never cover a sibling in the same group
        if dragged == Some(node) {
            for &id in &members {
                draw_shadow(state, board, id);
            }
        }
        for &id in &members {
            draw_piece(state, board, id);
        }
    }
}

fn trace_piece(state: &State, board: &Board, id: PieceId) -> bool {
    let Some(piece) = board.piece(id) else {
        return false;
    };
    piece
        .template
        .draw(board.edges(), &mut CanvasPath(&state.ctx), piece.position);
    true
}

fn draw_shadow(state: &State, board: &Board, id: PieceId) {
    let ctx = &state.ctx;
    ctx.save();
    if trace_piece(state, board, id) {
        set_highlight_shadow(ctx);
        set_fill_style(ctx, BLANK_FILL);
        ctx.fill();
    }
    ctx.restore();
}

fn draw_piece(state: &State, board: &Board, id: PieceId) {
    let ctx = &state.ctx;
    let Some(piece) = board.piece(id) else {
        return;
    };
    let (tw, th) = board.tile_size();
    let (pw, ph) = board.config().picture_size();

    ctx.save();
    trace_piece(state, board, id);
    set_fill_style(ctx, BLANK_FILL);
    ctx.fill();
    ctx.clip();
    // best-effort: a picture that failed to decode leaves the blank fill
    if let Some(img) = state.image.as_ref().filter(|i| i.complete() && i.natural_width() > 0) {
        let x = piece.position.x - piece.col as f64 * tw;
        let y = piece.position.y - piece.row as f64 * th;
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, pw, ph);
    }
    ctx.restore();

    trace_piece(state, board, id);
    ctx.set_line_width(1.0);
    set_stroke_style(ctx, OUTLINE_COLOR);
    ctx.stroke();
}

fn update_status_dom(state: &State) {
    if let Some(el) = state.document.get_element_by_id(STATUS_ID)
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        let (txt, color) = match &state.board {
            None => ("Loading…".to_string(), UNSOLVED_COLOR),
            Some(b) if b.solved() => ("Solved!".to_string(), SOLVED_COLOR),
            Some(b) => {
                let loose = b.pieces().iter().filter(|p| p.group.is_none()).count();
                let groups = b.groups().count();
                (format!("Loose pieces: {loose}  |  Groups: {groups}"), UNSOLVED_COLOR)
            }
        };
        el.set_inner_text(&txt);
        let _ = el.style().set_property("color", color);
    }
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    upload::attach_file_input(state.clone())?;

    if let Some(btn) = doc.get_element_by_id(REGENERATE_ID) {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            spawn_regenerate(st.clone());
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Mouse events
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut guard = st.borrow_mut();
            let s = &mut *guard;
            let pt = event_canvas_coords(&e, &s.canvas);
            let Some(board) = s.board.as_mut() else {
                return;
            };
            let Some(target) = board.hit_test(pt) else {
                return;
            };
            let Some(at) = board.node_position(target) else {
                return;
            };
            board.raise(target);
            s.drag = Some(Drag {
                target,
                grab: pt - at,
            });
            tracing::trace!(node = ?target, "drag start");
            draw(s);
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut guard = st.borrow_mut();
            let s = &mut *guard;
            let Some(drag) = s.drag else {
                return;
            };
            let pt = event_canvas_coords(&e, &s.canvas);
            let Some(board) = s.board.as_mut() else {
                return;
            };
            let proposed = board.drag_bound(drag.target, pt - drag.grab);
            board.move_to(drag.target, proposed);
            draw(s);
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        let st = state.clone();
        let mouseup = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            let mut guard = st.borrow_mut();
            let s = &mut *guard;
            let Some(drag) = s.drag.take() else {
                return;
            };
            if let Some(board) = s.board.as_mut()
                && let Some(position) = board.node_position(drag.target)
            {
                let outcome = board.apply_drag_end(DragEnd {
                    target: drag.target,
                    position,
                });
                tracing::debug!(?outcome, "drag end");
            }
            update_status_dom(s);
            draw(s);
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
        mouseup.forget();
    }
    Ok(())
}

/// Decode the picture before the pieces exist. Failure is not fatal: the
/// puzzle still works with blank pieces.
async fn load_image(url: &str) -> Option<HtmlImageElement> {
    let img = HtmlImageElement::new().ok()?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(url);
    if let Err(e) = JsFuture::from(img.decode()).await {
        tracing::warn!(url, error = ?e, "image unavailable, continuing without it");
    }
    Some(img)
}

/// Tear down the current puzzle and cut a new one once the picture is ready.
async fn regenerate(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let (generation, url) = {
        let mut s = state.borrow_mut();
        s.generation += 1;
        s.board = None;
        s.drag = None;
        s.image = None;
        update_status_dom(&s);
        draw(&s);
        (s.generation, s.image_url.clone())
    };

    let image = load_image(&url).await;

    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    if s.generation != generation {
        tracing::debug!(generation, "superseded before the image arrived");
        return Ok(());
    }
    let board = Board::generate(s.config.clone(), &mut s.rng)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    tracing::info!(
        rows = s.config.rows,
        cols = s.config.cols,
        generation,
        "puzzle ready"
    );
    s.board = Some(board);
    s.image = image;
    update_status_dom(s);
    draw(s);
    Ok(())
}

pub(crate) fn spawn_regenerate(state: Rc<RefCell<State>>) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = regenerate(state).await {
            tracing::error!(error = ?err, "failed to generate puzzle");
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document, CANVAS_ID)?;

    let search = window.location().search().unwrap_or_default();
    let config = config_from_search(&search);
    canvas.set_width(config.canvas_width.round() as u32);
    canvas.set_height(config.canvas_height.round() as u32);
    let seed = seed_from_search(&search).unwrap_or_else(random_seed);
    let image_url = image_url(&search, &config);
    tracing::info!(seed, rows = config.rows, cols = config.cols, %image_url, "starting");

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        ctx,
        config,
        rng: StdRng::seed_from_u64(seed),
        image_url,
        board: None,
        image: None,
        drag: None,
        generation: 0,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));
    attach_ui(state.clone())?;
    spawn_regenerate(state);
    Ok(())
}

/// Throw the current puzzle away and cut a new one.
#[wasm_bindgen]
pub fn regenerate_puzzle() {
    if let Some(state) = STATE.with(|st| st.borrow().clone()) {
        spawn_regenerate(state);
    }
}

#[wasm_bindgen]
pub fn is_solved() -> bool {
    with_state(|s| s.board.as_ref().is_some_and(Board::solved)).unwrap_or(false)
}

/// Piece coordinates, positions and group ids as JSON; `null` while a puzzle
/// is being generated.
#[wasm_bindgen]
pub fn snapshot_json() -> Result<String, JsValue> {
    let json = with_state(|s| s.board.as_ref().map(Board::snapshot_json))
        .flatten()
        .unwrap_or_else(|| Ok("null".to_string()));
    json.map_err(|e| JsValue::from_str(&e.to_string()))
}
