//! Edge shapes and their complements.
//!
//! Every edge shape is stored once in an [`EdgeTable`]; a [`MatchMode`] names
//! its complement by [`EdgeId`] instead of holding a reference, so the
//! `revert` relation is a pair of indices allocated together.

use std::ops::Index;

use rand::Rng;
use serde::Serialize;

use crate::curve;
use crate::geometry::Point;

/// Edge direction, in the clockwise order a silhouette is traced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Corners the edge runs between, clockwise, in tile-local coordinates.
    pub fn corners(self, w: f64, h: f64) -> (Point, Point) {
        match self {
            Side::Top => (Point::new(0.0, 0.0), Point::new(w, 0.0)),
            Side::Right => (Point::new(w, 0.0), Point::new(w, h)),
            Side::Bottom => (Point::new(w, h), Point::new(0.0, h)),
            Side::Left => (Point::new(0.0, h), Point::new(0.0, 0.0)),
        }
    }

    /// Vector from this tile's origin to the neighbour across this edge.
    pub fn neighbor_offset(self, w: f64, h: f64) -> Point {
        match self {
            Side::Top => Point::new(0.0, -h),
            Side::Right => Point::new(w, 0.0),
            Side::Bottom => Point::new(0.0, h),
            Side::Left => Point::new(-w, 0.0),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Straight,
    Protrusion,
    Indentation,
}

impl EdgeKind {
    pub fn complement(self) -> EdgeKind {
        match self {
            EdgeKind::Straight => EdgeKind::Straight,
            EdgeKind::Protrusion => EdgeKind::Indentation,
            EdgeKind::Indentation => EdgeKind::Protrusion,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub usize);

/// One edge of one tile.
#[derive(Clone, Debug, Serialize)]
pub struct MatchMode {
    pub side: Side,
    pub kind: EdgeKind,
    /// Tile-local points from the side's first corner to its second.
    pub path: Vec<Point>,
    /// The complementary edge on the neighbouring tile.
    pub revert: EdgeId,
}

#[derive(Clone, Debug)]
pub struct EdgeTable {
    tile_width: f64,
    tile_height: f64,
    modes: Vec<MatchMode>,
}

impl EdgeTable {
    /// A table holding only the four straight edges. They are shared by every
    /// border tile and point at each other across the tile.
    pub fn new(tile_width: f64, tile_height: f64) -> Self {
        let modes = Side::ALL
            .iter()
            .map(|&side| {
                let (a, b) = side.corners(tile_width, tile_height);
                MatchMode {
                    side,
                    kind: EdgeKind::Straight,
                    path: vec![a, b],
                    revert: EdgeId(side.opposite().index()),
                }
            })
            .collect();
        EdgeTable {
            tile_width,
            tile_height,
            modes,
        }
    }

    pub fn tile_size(&self) -> (f64, f64) {
        (self.tile_width, self.tile_height)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn get(&self, id: EdgeId) -> Option<&MatchMode> {
        self.modes.get(id.0)
    }

    pub fn revert(&self, id: EdgeId) -> EdgeId {
        self[id].revert
    }

    pub fn make_straight(&self, side: Side) -> EdgeId {
        EdgeId(side.index())
    }

    /// Sample a fresh curve for `side` and store it with its complement.
    /// Protrusion or indentation is a fair coin.
    pub fn make_curved<R: Rng + ?Sized>(&mut self, rng: &mut R, side: Side, samples: usize) -> EdgeId {
        let kind = if rng.random_bool(0.5) {
            EdgeKind::Protrusion
        } else {
            EdgeKind::Indentation
        };
        let lut = curve::sample_curve(rng, samples);
        self.insert_curve(side, kind, &lut)
    }

    /// Place a unit-frame lookup table on `side` and allocate the pair.
    ///
    /// The complement lives on the neighbour's opposite side: the same points
    /// in reverse order, shifted by one tile towards the neighbour.
    pub fn insert_curve(&mut self, side: Side, kind: EdgeKind, lut: &[Point]) -> EdgeId {
        let (w, h) = (self.tile_width, self.tile_height);
        let (a, b) = side.corners(w, h);
        let out = side.neighbor_offset(w, h);
        let sign = match kind {
            EdgeKind::Indentation => -1.0,
            _ => 1.0,
        };
        let path: Vec<Point> = lut
            .iter()
            .map(|q| Point {
                x: a.x + (b.x - a.x) * q.x + out.x * q.y * sign,
                y: a.y + (b.y - a.y) * q.x + out.y * q.y * sign,
            })
            .collect();
        let reverted: Vec<Point> = path.iter().rev().map(|&p| p - out).collect();

        let id = EdgeId(self.modes.len());
        let twin = EdgeId(id.0 + 1);
        self.modes.push(MatchMode {
            side,
            kind,
            path,
            revert: twin,
        });
        self.modes.push(MatchMode {
            side: side.opposite(),
            kind: kind.complement(),
            path: reverted,
            revert: id,
        });
        id
    }
}

impl Index<EdgeId> for EdgeTable {
    type Output = MatchMode;
    fn index(&self, id: EdgeId) -> &MatchMode {
        &self.modes[id.0]
    }
}
