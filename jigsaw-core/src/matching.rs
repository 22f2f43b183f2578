//! Deciding which neighbour a dropped piece snaps to.

use serde::{Deserialize, Serialize};

use crate::board::PieceId;
use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub fn new(row: usize, col: usize) -> Self {
        GridCoord { row, col }
    }
}

/// Two cells may join only when they share an edge in the grid.
pub fn can_be_merged(a: GridCoord, b: GridCoord) -> bool {
    let same_row = a.row == b.row && a.col.abs_diff(b.col) == 1;
    let same_col = a.col == b.col && a.row.abs_diff(b.row) == 1;
    same_row ^ same_col
}

/// Where a piece at `piece` belongs if its neighbour at `neighbor` sits at
/// `neighbor_pos`.
pub fn ideal_position(
    piece: GridCoord,
    neighbor: GridCoord,
    neighbor_pos: Point,
    tile_width: f64,
    tile_height: f64,
) -> Point {
    let dc = piece.col as f64 - neighbor.col as f64;
    let dr = piece.row as f64 - neighbor.row as f64;
    Point::new(neighbor_pos.x + dc * tile_width, neighbor_pos.y + dr * tile_height)
}

/// A shape on the canvas that a dropped piece could attach to.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub piece: PieceId,
    pub coord: GridCoord,
    /// Absolute top-left position.
    pub position: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    pub candidate: PieceId,
    /// Absolute position the dragged piece snaps to.
    pub ideal: Point,
}

/// First candidate (in iteration order) that is a grid neighbour of the
/// dragged piece and lies within `tolerance` of its ideal offset on both
/// axes. Not a nearest-neighbour search.
pub fn find_closest<I>(
    dragged: GridCoord,
    position: Point,
    candidates: I,
    tile: (f64, f64),
    tolerance: f64,
) -> Option<Match>
where
    I: IntoIterator<Item = Candidate>,
{
    let (w, h) = tile;
    candidates.into_iter().find_map(|c| {
        if !can_be_merged(dragged, c.coord) {
            return None;
        }
        let ideal = ideal_position(dragged, c.coord, c.position, w, h);
        let close = (ideal.x - position.x).abs() <= tolerance
            && (ideal.y - position.y).abs() <= tolerance;
        tracing::trace!(candidate = c.piece.0, close, "snap candidate");
        close.then_some(Match {
            candidate: c.piece,
            ideal,
        })
    })
}
