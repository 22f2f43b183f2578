use std::cell::RefCell;
use std::rc::Rc;

use jigsaw_core::{Board, Node, Point, PuzzleConfig};
use rand::rngs::StdRng;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Window};

/// An in-progress pointer drag.
#[derive(Clone, Copy, Debug)]
pub struct Drag {
    pub target: Node,
    /// Pointer position minus the target's position at pointer-down.
    pub grab: Point,
}

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub config: PuzzleConfig,
    pub rng: StdRng,
    pub image_url: String,
    /// `None` while a (re)generation is waiting for its picture.
    pub board: Option<Board>,
    pub image: Option<HtmlImageElement>,
    pub drag: Option<Drag>,
    /// Bumped on every regeneration so a slow image load cannot install a
    /// board for a puzzle that has already been replaced.
    pub generation: u64,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

/// Run `f` against the live state, if the app has started.
pub fn with_state<T>(f: impl FnOnce(&mut State) -> T) -> Option<T> {
    let rc = STATE.with(|st| st.borrow().clone())?;
    let mut s = rc.borrow_mut();
    Some(f(&mut s))
}
