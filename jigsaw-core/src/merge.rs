//! What happens when the user lets go of a piece or a group.

use serde::Serialize;

use crate::board::{Board, GroupId, Node, PieceId};
use crate::geometry::Point;
use crate::matching::find_closest;

/// End of a drag gesture: the target and where it was released, already
/// bounded to the canvas by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEnd {
    pub target: Node,
    pub position: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The target was not something that can be dragged on its own.
    Ignored,
    /// No neighbour close enough; the target stays where it was dropped.
    Dropped,
    /// A loose piece snapped to `neighbor`. `created` is set when the two
    /// formed a new group instead of the piece joining the neighbour's.
    Joined {
        piece: PieceId,
        neighbor: PieceId,
        group: GroupId,
        created: bool,
    },
    /// A dragged group snapped to a loose piece and took it in.
    Adopted { group: GroupId, piece: PieceId },
    /// A dragged group snapped to a member of another group and took over all
    /// of its members.
    Absorbed {
        group: GroupId,
        absorbed: GroupId,
        moved: Vec<PieceId>,
    },
}

impl Outcome {
    pub fn merged(&self) -> bool {
        !matches!(self, Outcome::Ignored | Outcome::Dropped)
    }
}

impl Board {
    /// Commit the drop and attempt at most one merge.
    pub fn apply_drag_end(&mut self, ev: DragEnd) -> Outcome {
        if !self.move_to(ev.target, ev.position) {
            tracing::debug!(node = ?ev.target, "drag end on a target that cannot move");
            return Outcome::Ignored;
        }
        let outcome = match ev.target {
            Node::Piece(piece) => self.drop_piece(piece),
            Node::Group(group) => self.drop_group(group),
        };
        if outcome.merged() {
            tracing::debug!(?outcome, "merged");
        }
        self.refresh_solved();
        outcome
    }

    fn drop_piece(&mut self, piece: PieceId) -> Outcome {
        let Some(p) = self.piece(piece) else {
            return Outcome::Ignored;
        };
        let (coord, at) = (p.coord(), p.position);
        let candidates = self.candidates(piece, None);
        let tolerance = self.config().snap_tolerance;
        let Some(hit) = find_closest(coord, at, candidates, self.tile_size(), tolerance) else {
            return Outcome::Dropped;
        };

        self.place(piece, hit.ideal);
        let neighbor = hit.candidate;
        let existing = self.piece(neighbor).and_then(|n| n.group);
        let (group, created) = match existing {
            Some(g) => (g, false),
            None => (self.create_group(), true),
        };
        self.adopt(group, piece);
        if created {
            self.adopt(group, neighbor);
        }
        self.raise(Node::Group(group));
        Outcome::Joined {
            piece,
            neighbor,
            group,
            created,
        }
    }

    /// Members are tried in `members` order; the first one with a match sets the
    /// shift and picks what gets merged, even if a later member sits closer.
    fn drop_group(&mut self, group: GroupId) -> Outcome {
        let Some(members) = self.group(group).map(|g| g.members.clone()) else {
            return Outcome::Ignored;
        };
        let tile = self.tile_size();
        let tolerance = self.config().snap_tolerance;
        let found = members.iter().find_map(|&m| {
            let p = self.piece(m)?;
            // other members are not candidates: they share the excluded group
            let candidates = self.candidates(m, Some(group));
            find_closest(p.coord(), p.position, candidates, tile, tolerance).map(|hit| (m, p.position, hit))
        });
        let Some((member, at, hit)) = found else {
            return Outcome::Dropped;
        };

        self.shift_group(group, hit.ideal - at, member, hit.ideal);
        let outcome = match self.piece(hit.candidate).and_then(|c| c.group) {
            Some(other) => {
                let moved = self.absorb(group, other);
                Outcome::Absorbed {
                    group,
                    absorbed: other,
                    moved,
                }
            }
            None => {
                self.adopt(group, hit.candidate);
                Outcome::Adopted {
                    group,
                    piece: hit.candidate,
                }
            }
        };
        self.raise(Node::Group(group));
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PuzzleConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(rows: usize, cols: usize) -> Board {
        let cfg = PuzzleConfig {
            rows,
            cols,
            ..Default::default()
        };
        Board::generate(cfg, &mut StdRng::seed_from_u64(17)).unwrap()
    }

    fn put(b: &mut Board, id: usize, x: f64, y: f64) {
        assert!(b.move_to(Node::Piece(PieceId(id)), Point::new(x, y)));
    }

    fn drop_at(b: &mut Board, target: Node, x: f64, y: f64) -> Outcome {
        b.apply_drag_end(DragEnd {
            target,
            position: Point::new(x, y),
        })
    }

    #[test]
    fn far_drop_only_moves() {
        let mut b = board(2, 2);
        put(&mut b, 1, 400.0, 400.0);
        put(&mut b, 2, 0.0, 400.0);
        put(&mut b, 3, 400.0, 0.0);
        let out = drop_at(&mut b, Node::Piece(PieceId(0)), 100.0, 100.0);
        assert_eq!(out, Outcome::Dropped);
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(100.0, 100.0));
        assert!(b.piece(PieceId(0)).unwrap().group.is_none());
    }

    #[test]
    fn two_loose_pieces_form_a_group() {
        let mut b = board(1, 2);
        put(&mut b, 1, 200.0, 200.0);
        let out = drop_at(&mut b, Node::Piece(PieceId(0)), 143.0, 206.0);
        let Outcome::Joined {
            piece,
            neighbor,
            group,
            created,
        } = out
        else {
            panic!("expected a join, got {out:?}");
        };
        assert_eq!((piece, neighbor, created), (PieceId(0), PieceId(1), true));
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(140.0, 200.0));
        let g = b.group(group).unwrap();
        assert_eq!(g.origin, Point::ORIGIN);
        assert_eq!(g.members, vec![PieceId(0), PieceId(1)]);
        assert_eq!(b.root(), &[Node::Group(group)]);
        assert!(b.solved());
    }

    #[test]
    fn grouped_piece_cannot_be_dragged_alone() {
        let mut b = board(1, 2);
        put(&mut b, 1, 200.0, 200.0);
        drop_at(&mut b, Node::Piece(PieceId(0)), 140.0, 200.0);
        let out = drop_at(&mut b, Node::Piece(PieceId(0)), 0.0, 0.0);
        assert_eq!(out, Outcome::Ignored);
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(140.0, 200.0));
    }

    #[test]
    fn loose_piece_joins_existing_group() {
        let mut b = board(1, 3);
        put(&mut b, 1, 200.0, 200.0);
        put(&mut b, 2, 400.0, 400.0);
        drop_at(&mut b, Node::Piece(PieceId(0)), 140.0, 200.0);
        let g = b.piece(PieceId(0)).unwrap().group.unwrap();
        let out = drop_at(&mut b, Node::Piece(PieceId(2)), 255.0, 195.0);
        assert_eq!(
            out,
            Outcome::Joined {
                piece: PieceId(2),
                neighbor: PieceId(1),
                group: g,
                created: false
            }
        );
        assert_eq!(b.piece(PieceId(2)).unwrap().position, Point::new(260.0, 200.0));
        assert_eq!(b.group(g).unwrap().members.len(), 3);
        assert!(b.solved());
    }

    #[test]
    fn dragged_group_adopts_loose_piece() {
        let mut b = board(1, 3);
        put(&mut b, 0, 100.0, 100.0);
        put(&mut b, 2, 300.0, 300.0);
        drop_at(&mut b, Node::Piece(PieceId(1)), 160.0, 100.0);
        let g = b.piece(PieceId(1)).unwrap().group.unwrap();

        let out = drop_at(&mut b, Node::Group(g), 76.0, 203.0);
        assert_eq!(
            out,
            Outcome::Adopted {
                group: g,
                piece: PieceId(2)
            }
        );
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(180.0, 300.0));
        assert_eq!(b.piece(PieceId(1)).unwrap().position, Point::new(240.0, 300.0));
        assert_eq!(b.piece(PieceId(2)).unwrap().position, Point::new(300.0, 300.0));
        assert_eq!(b.group(g).unwrap().origin, Point::new(80.0, 200.0));
        assert!(b.solved());
    }

    #[test]
    fn dragged_group_absorbs_the_other_one() {
        let mut b = board(1, 4);
        put(&mut b, 0, 0.0, 0.0);
        put(&mut b, 1, 300.0, 0.0);
        put(&mut b, 2, 0.0, 300.0);
        put(&mut b, 3, 300.0, 300.0);
        drop_at(&mut b, Node::Piece(PieceId(1)), 60.0, 0.0);
        drop_at(&mut b, Node::Piece(PieceId(3)), 60.0, 300.0);
        let left = b.piece(PieceId(0)).unwrap().group.unwrap();
        let right = b.piece(PieceId(2)).unwrap().group.unwrap();
        assert_ne!(left, right);

        // the right group's origin is (0, 0); piece 2 must land at (120, 0)
        let out = drop_at(&mut b, Node::Group(right), 118.0, -297.0);
        let Outcome::Absorbed {
            group,
            absorbed,
            moved,
        } = out.clone()
        else {
            panic!("expected absorb, got {out:?}");
        };
        assert_eq!((group, absorbed), (right, left));
        assert_eq!(moved, vec![PieceId(1), PieceId(0)]);
        assert!(b.group(left).is_none());
        assert_eq!(b.root(), &[Node::Group(right)]);
        let xs: Vec<f64> = (0..4).map(|i| b.piece(PieceId(i)).unwrap().position.x).collect();
        assert_eq!(xs, vec![0.0, 60.0, 120.0, 180.0]);
        assert!(b.pieces().iter().all(|p| p.position.y == 0.0));
        assert!(b.solved());
    }

    /// 2×2 board with pieces 2 and 3 parked just below where the top row will
    /// land, each a few pixels off its own ideal spot.
    fn top_row_over_two_matches(first: usize, second: usize) -> (Board, GroupId) {
        let mut b = board(2, 2);
        put(&mut b, 2, 203.0, 366.0);
        put(&mut b, 3, 258.0, 364.0);
        let at = |id: usize| if id == 0 { 40.0 } else { 100.0 };
        put(&mut b, second, at(second), 100.0);
        drop_at(&mut b, Node::Piece(PieceId(first)), at(first), 100.0);
        let g = b.piece(PieceId(0)).unwrap().group.unwrap();
        assert_eq!(b.group(g).unwrap().members, vec![PieceId(first), PieceId(second)]);
        (b, g)
    }

    #[test]
    fn earliest_member_with_a_match_decides_the_snap() {
        let (mut b, g) = top_row_over_two_matches(0, 1);
        // piece 0 is 3,6 off piece 2; piece 1 is -2,4 off piece 3
        let out = drop_at(&mut b, Node::Group(g), 160.0, 200.0);
        assert_eq!(
            out,
            Outcome::Adopted {
                group: g,
                piece: PieceId(2)
            }
        );
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(203.0, 306.0));
        assert_eq!(b.piece(PieceId(1)).unwrap().position, Point::new(263.0, 306.0));
        assert_eq!(b.group(g).unwrap().origin, Point::new(163.0, 206.0));
        assert_eq!(b.piece(PieceId(3)).unwrap().position, Point::new(258.0, 364.0));
        assert!(b.piece(PieceId(3)).unwrap().group.is_none());
        assert!(!b.solved());
    }

    #[test]
    fn member_order_not_proximity_picks_the_target() {
        let (mut b, g) = top_row_over_two_matches(1, 0);
        let out = drop_at(&mut b, Node::Group(g), 160.0, 200.0);
        assert_eq!(
            out,
            Outcome::Adopted {
                group: g,
                piece: PieceId(3)
            }
        );
        assert_eq!(b.piece(PieceId(1)).unwrap().position, Point::new(258.0, 304.0));
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(198.0, 304.0));
        assert_eq!(b.group(g).unwrap().origin, Point::new(158.0, 204.0));
        assert!(b.piece(PieceId(2)).unwrap().group.is_none());
    }

    #[test]
    fn group_drop_without_match_keeps_membership() {
        let mut b = board(1, 3);
        put(&mut b, 0, 100.0, 100.0);
        put(&mut b, 2, 400.0, 400.0);
        drop_at(&mut b, Node::Piece(PieceId(1)), 160.0, 100.0);
        let g = b.piece(PieceId(1)).unwrap().group.unwrap();
        let out = drop_at(&mut b, Node::Group(g), 10.0, 10.0);
        assert_eq!(out, Outcome::Dropped);
        assert_eq!(b.piece(PieceId(0)).unwrap().position, Point::new(110.0, 110.0));
        assert_eq!(b.group(g).unwrap().members, vec![PieceId(1), PieceId(0)]);
        assert!(!b.solved());
    }
}
