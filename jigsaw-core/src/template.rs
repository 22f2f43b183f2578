//! Four edge ids per piece and the outline they trace.

use serde::Serialize;

use crate::edge::{EdgeId, EdgeTable, Side};
use crate::geometry::{PathSink, Point, polygon_contains};

/// The four edge shapes of one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Template {
    pub top: EdgeId,
    pub right: EdgeId,
    pub bottom: EdgeId,
    pub left: EdgeId,
}

impl Template {
    pub fn edge(&self, side: Side) -> EdgeId {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Closed silhouette in tile-local coordinates, traced clockwise from the
    /// top-left corner. Shared corners appear once.
    pub fn outline(&self, edges: &EdgeTable) -> Vec<Point> {
        let mut ring: Vec<Point> = Vec::new();
        for side in Side::ALL {
            let path = &edges[self.edge(side)].path;
            let skip = usize::from(!ring.is_empty());
            ring.extend(path.iter().skip(skip).copied());
        }
        // last point of the left edge is the starting corner again
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring
    }

    /// Emit the silhouette as one closed path, translated by `origin`.
    pub fn draw<S: PathSink + ?Sized>(&self, edges: &EdgeTable, sink: &mut S, origin: Point) {
        let ring = self.outline(edges);
        let Some((first, rest)) = ring.split_first() else {
            return;
        };
        sink.begin_path();
        sink.move_to(*first + origin);
        for p in rest {
            sink.line_to(*p + origin);
        }
        sink.close_path();
    }

    /// Hit test against the silhouette; `p` is tile-local.
    pub fn contains(&self, edges: &EdgeTable, p: Point) -> bool {
        polygon_contains(&self.outline(edges), p)
    }
}
