//! Scene model: pieces, the groups they were snapped into, and the z-order of
//! everything directly on the canvas.

use std::collections::BTreeMap;

use geo_types::Rect;
use rand::Rng;
use serde::Serialize;

use crate::config::PuzzleConfig;
use crate::edge::EdgeTable;
use crate::error::ConfigError;
use crate::geometry::{Point, bounding_rect, clamp_span, rect_at};
use crate::layout::{Layout, generate_layout};
use crate::matching::{Candidate, GridCoord};
use crate::template::Template;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PieceId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupId(pub u64);

#[derive(Clone, Debug, Serialize)]
pub struct Piece {
    pub id: PieceId,
    pub row: usize,
    pub col: usize,
    pub template: Template,
    /// Set by the first snap and never cleared afterwards.
    pub group: Option<GroupId>,
    /// Absolute top-left position of the tile on the canvas.
    pub position: Point,
}

impl Piece {
    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.row, self.col)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Group {
    pub id: GroupId,
    /// Position of the container; dragging the group moves this and every
    /// member by the same amount.
    pub origin: Point,
    /// Members in the order they joined.
    pub members: Vec<PieceId>,
}

/// Something sitting directly on the canvas: a loose piece or a group.
/// Also what a drag gesture moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Node {
    Piece(PieceId),
    Group(GroupId),
}

#[derive(Clone, Debug)]
pub struct Board {
    config: PuzzleConfig,
    edges: EdgeTable,
    pieces: Vec<Piece>,
    groups: BTreeMap<GroupId, Group>,
    /// Canvas children, bottom to top.
    root: Vec<Node>,
    next_group: u64,
    solved: bool,
}

impl Board {
    /// Cut a fresh puzzle. Replaces nothing: callers drop the old board.
    pub fn generate<R: Rng + ?Sized>(config: PuzzleConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = generate_layout(&config, rng);
        Ok(Board::from_layout(config, layout))
    }

    pub fn from_layout(config: PuzzleConfig, layout: Layout) -> Self {
        let root = layout.pieces.iter().map(|p| Node::Piece(p.id)).collect();
        let mut board = Board {
            config,
            edges: layout.edges,
            pieces: layout.pieces,
            groups: BTreeMap::new(),
            root,
            next_group: 1,
            solved: false,
        };
        board.solved = is_solved(&board.pieces);
        board
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    pub fn piece_at(&self, row: usize, col: usize) -> Option<&Piece> {
        if row >= self.config.rows || col >= self.config.cols {
            return None;
        }
        self.pieces.get(row * self.config.cols + col)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Groups in z-order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.root.iter().filter_map(|n| match n {
            Node::Group(g) => self.groups.get(g),
            Node::Piece(_) => None,
        })
    }

    pub fn root(&self) -> &[Node] {
        &self.root
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn tile_size(&self) -> (f64, f64) {
        (self.config.tile_width, self.config.tile_height)
    }

    /// What dragging `piece` actually moves.
    pub fn target_of(&self, piece: PieceId) -> Option<Node> {
        let p = self.piece(piece)?;
        Some(match p.group {
            Some(g) => Node::Group(g),
            None => Node::Piece(piece),
        })
    }

    /// Current position of a drag target: a loose piece's top-left corner or
    /// a group's origin. `None` for grouped pieces and unknown ids.
    pub fn node_position(&self, node: Node) -> Option<Point> {
        match node {
            Node::Piece(id) => self
                .piece(id)
                .filter(|p| p.group.is_none())
                .map(|p| p.position),
            Node::Group(g) => self.group(g).map(|g| g.origin),
        }
    }

    pub fn piece_rect(&self, id: PieceId) -> Option<Rect<f64>> {
        let (w, h) = self.tile_size();
        self.piece(id).map(|p| rect_at(p.position, w, h))
    }

    /// Union of the member tiles; this is what a group is bounded by.
    pub fn group_rect(&self, id: GroupId) -> Option<Rect<f64>> {
        let group = self.group(id)?;
        bounding_rect(group.members.iter().filter_map(|&m| self.piece_rect(m)))
    }

    /// Clamp a proposed drag position so the whole target stays on the canvas.
    /// Positions that already keep it inside come back unchanged.
    pub fn drag_bound(&self, node: Node, proposed: Point) -> Point {
        let (cw, ch) = (self.config.canvas_width, self.config.canvas_height);
        match node {
            Node::Piece(_) => {
                let (w, h) = self.tile_size();
                Point::new(
                    clamp_span(proposed.x, 0.0, cw - w),
                    clamp_span(proposed.y, 0.0, ch - h),
                )
            }
            Node::Group(g) => {
                let (Some(group), Some(rect)) = (self.group(g), self.group_rect(g)) else {
                    return proposed;
                };
                let dx = proposed.x - group.origin.x;
                let dy = proposed.y - group.origin.y;
                let dx = clamp_span(dx, -rect.min().x, cw - rect.max().x);
                let dy = clamp_span(dy, -rect.min().y, ch - rect.max().y);
                Point::new(group.origin.x + dx, group.origin.y + dy)
            }
        }
    }

    /// Commit a drag-move. Returns false (and does nothing) when the target is
    /// not something that can be dragged on its own.
    pub fn move_to(&mut self, node: Node, position: Point) -> bool {
        match node {
            Node::Piece(id) => match self.pieces.get_mut(id.0) {
                Some(p) if p.group.is_none() => {
                    p.position = position;
                    true
                }
                _ => false,
            },
            Node::Group(g) => {
                let Some(group) = self.groups.get_mut(&g) else {
                    return false;
                };
                let delta = position - group.origin;
                group.origin = position;
                for m in &group.members {
                    let p = &mut self.pieces[m.0];
                    p.position = p.position + delta;
                }
                true
            }
        }
    }

    /// Bring a node to the top of the z-order.
    pub fn raise(&mut self, node: Node) {
        if let Some(i) = self.root.iter().position(|n| *n == node) {
            let n = self.root.remove(i);
            self.root.push(n);
        }
    }

    /// Topmost drag target whose silhouette covers `p`.
    pub fn hit_test(&self, p: Point) -> Option<Node> {
        let covers = |id: PieceId| {
            let piece = &self.pieces[id.0];
            piece.template.contains(&self.edges, p - piece.position)
        };
        self.root.iter().rev().copied().find(|node| match node {
            Node::Piece(id) => covers(*id),
            Node::Group(g) => self
                .groups
                .get(g)
                .is_some_and(|group| group.members.iter().rev().any(|&m| covers(m))),
        })
    }

    /// Snap candidates in scan order: loose pieces bottom to top, then the
    /// members of every group other than `exclude_group`.
    pub fn candidates(&self, dragged: PieceId, exclude_group: Option<GroupId>) -> Vec<Candidate> {
        let candidate = |p: &Piece| Candidate {
            piece: p.id,
            coord: p.coord(),
            position: p.position,
        };
        let loose = self.root.iter().filter_map(|n| match n {
            Node::Piece(id) if *id != dragged => Some(candidate(&self.pieces[id.0])),
            _ => None,
        });
        let grouped = self
            .groups()
            .filter(|g| Some(g.id) != exclude_group)
            .flat_map(move |g| g.members.iter().map(move |m| candidate(&self.pieces[m.0])));
        loose.chain(grouped).collect()
    }

    pub(crate) fn create_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        self.groups.insert(
            id,
            Group {
                id,
                origin: Point::ORIGIN,
                members: Vec::new(),
            },
        );
        self.root.push(Node::Group(id));
        id
    }

    /// Re-parent a loose piece into `group`. Its absolute position is kept.
    pub(crate) fn adopt(&mut self, group: GroupId, piece: PieceId) {
        let Some(g) = self.groups.get_mut(&group) else {
            return;
        };
        self.root.retain(|n| *n != Node::Piece(piece));
        g.members.push(piece);
        self.pieces[piece.0].group = Some(group);
    }

    /// Move every member of `other` into `into` and drop the emptied group.
    /// Returns the moved pieces.
    pub(crate) fn absorb(&mut self, into: GroupId, other: GroupId) -> Vec<PieceId> {
        if into == other || !self.groups.contains_key(&into) {
            return Vec::new();
        }
        let Some(absorbed) = self.groups.remove(&other) else {
            return Vec::new();
        };
        self.root.retain(|n| *n != Node::Group(other));
        for &m in &absorbed.members {
            self.pieces[m.0].group = Some(into);
        }
        if let Some(g) = self.groups.get_mut(&into) {
            g.members.extend(absorbed.members.iter().copied());
        }
        absorbed.members
    }

    /// Set a piece's absolute position without touching its group.
    pub(crate) fn place(&mut self, piece: PieceId, position: Point) {
        self.pieces[piece.0].position = position;
    }

    /// Shift a group's container by `delta`, pinning `anchor` exactly at
    /// `anchor_at` so snapping leaves no rounding residue.
    pub(crate) fn shift_group(&mut self, group: GroupId, delta: Point, anchor: PieceId, anchor_at: Point) {
        let Some(g) = self.groups.get_mut(&group) else {
            return;
        };
        g.origin = g.origin + delta;
        for &m in &g.members {
            let p = &mut self.pieces[m.0];
            p.position = if m == anchor { anchor_at } else { p.position + delta };
        }
    }

    pub(crate) fn refresh_solved(&mut self) -> bool {
        let was = self.solved;
        self.solved = is_solved(&self.pieces);
        if self.solved && !was {
            tracing::info!(pieces = self.pieces.len(), "puzzle solved");
        }
        self.solved
    }
}

/// Solved when every piece has a group and they all share the same one.
pub fn is_solved(pieces: &[Piece]) -> bool {
    let Some(first) = pieces.first().and_then(|p| p.group) else {
        return false;
    };
    pieces.iter().all(|p| p.group == Some(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(rows: usize, cols: usize) -> Board {
        let cfg = PuzzleConfig {
            rows,
            cols,
            ..Default::default()
        };
        Board::generate(cfg, &mut StdRng::seed_from_u64(9)).unwrap()
    }

    #[test]
    fn generate_rejects_bad_config() {
        let cfg = PuzzleConfig {
            cols: 0,
            ..Default::default()
        };
        assert!(Board::generate(cfg, &mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn fresh_board_is_all_loose() {
        let b = board(2, 3);
        assert_eq!(b.root().len(), 6);
        assert!(b.root().iter().all(|n| matches!(n, Node::Piece(_))));
        assert!(!b.solved());
        assert_eq!(b.piece_at(1, 2).map(|p| p.id), Some(PieceId(5)));
        assert!(b.piece_at(2, 0).is_none());
    }

    #[test]
    fn piece_bound_clamps_into_canvas() {
        let b = board(2, 2);
        let n = Node::Piece(PieceId(0));
        assert_eq!(b.drag_bound(n, Point::new(-5.0, 600.0)), Point::new(0.0, 440.0));
        assert_eq!(b.drag_bound(n, Point::new(12.5, 30.0)), Point::new(12.5, 30.0));
    }

    #[test]
    fn moving_a_group_moves_members() {
        let mut b = board(1, 2);
        b.move_to(Node::Piece(PieceId(0)), Point::new(10.0, 10.0));
        b.move_to(Node::Piece(PieceId(1)), Point::new(70.0, 10.0));
        let g = b.create_group();
        b.adopt(g, PieceId(0));
        b.adopt(g, PieceId(1));
        assert!(!b.move_to(Node::Piece(PieceId(0)), Point::ORIGIN));
        assert!(b.move_to(Node::Group(g), Point::new(5.0, -2.0)));
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(15.0, 8.0));
        assert_eq!(b.piece(PieceId(1)).unwrap().position, Point::new(75.0, 8.0));
        assert_eq!(b.root(), &[Node::Group(g)]);
    }

    #[test]
    fn group_bound_keeps_union_rect_inside() {
        let mut b = board(1, 2);
        b.move_to(Node::Piece(PieceId(0)), Point::new(100.0, 100.0));
        b.move_to(Node::Piece(PieceId(1)), Point::new(160.0, 100.0));
        let g = b.create_group();
        b.adopt(g, PieceId(0));
        b.adopt(g, PieceId(1));
        // members span x 100..220, y 100..160 with the container at the origin
        assert_eq!(b.drag_bound(Node::Group(g), Point::new(-500.0, -500.0)), Point::new(-100.0, -100.0));
        assert_eq!(b.drag_bound(Node::Group(g), Point::new(400.0, 400.0)), Point::new(280.0, 340.0));
        assert_eq!(b.drag_bound(Node::Group(g), Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut b = board(1, 2);
        b.move_to(Node::Piece(PieceId(0)), Point::new(200.0, 10.0));
        b.move_to(Node::Piece(PieceId(1)), Point::new(200.0, 10.0));
        let p = Point::new(230.0, 40.0);
        assert_eq!(b.hit_test(p), Some(Node::Piece(PieceId(1))));
        b.raise(Node::Piece(PieceId(0)));
        assert_eq!(b.hit_test(p), Some(Node::Piece(PieceId(0))));
        assert_eq!(b.hit_test(Point::new(5.0, 480.0)), None);
    }

    #[test]
    fn solved_needs_one_shared_group() {
        let mut b = board(1, 2);
        assert!(!is_solved(b.pieces()));
        let g = b.create_group();
        b.adopt(g, PieceId(0));
        assert!(!is_solved(b.pieces()));
        b.adopt(g, PieceId(1));
        assert!(is_solved(b.pieces()));
        assert!(!is_solved(&[]));
    }
}
