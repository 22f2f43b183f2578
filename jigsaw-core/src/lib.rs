//! Jigsaw puzzle core: cutting a picture into interlocking pieces and the
//! rules that snap dropped pieces together into groups.
//!
//! Nothing here touches a browser. A renderer implements [`PathSink`] to draw
//! piece outlines and feeds drag gestures into [`Board`].

pub mod board;
pub mod config;
pub mod curve;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod matching;
pub mod merge;
pub mod snapshot;
pub mod template;

pub use board::{Board, Group, GroupId, Node, Piece, PieceId, is_solved};
pub use config::{CenterZone, PuzzleConfig};
pub use edge::{EdgeId, EdgeKind, EdgeTable, MatchMode, Side};
pub use error::ConfigError;
pub use geometry::{PathSink, Point};
pub use matching::{GridCoord, can_be_merged, find_closest};
pub use merge::{DragEnd, Outcome};
pub use template::Template;
