use std::collections::BTreeSet;

use jigsaw_core::{Board, DragEnd, GroupId, Node, Outcome, PieceId, Point, PuzzleConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn board(rows: usize, cols: usize, seed: u64) -> Board {
    let cfg = PuzzleConfig {
        rows,
        cols,
        ..Default::default()
    };
    Board::generate(cfg, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn pos(b: &Board, id: usize) -> Point {
    b.piece(PieceId(id)).unwrap().position
}

fn group_ids(b: &Board) -> BTreeSet<GroupId> {
    b.pieces().iter().filter_map(|p| p.group).collect()
}

fn release(b: &mut Board, target: Node, x: f64, y: f64) -> Outcome {
    b.apply_drag_end(DragEnd {
        target,
        position: Point::new(x, y),
    })
}

#[test]
fn two_by_two_solves_after_joining_both_rows() {
    let mut b = board(2, 2, 11);
    for (id, x, y) in [(0, 20.0, 20.0), (1, 300.0, 20.0), (2, 20.0, 300.0), (3, 300.0, 300.0)] {
        b.move_to(Node::Piece(PieceId(id)), Point::new(x, y));
    }

    let top = release(&mut b, Node::Piece(PieceId(1)), 82.0, 18.0);
    assert!(matches!(top, Outcome::Joined { created: true, .. }));
    let bottom = release(&mut b, Node::Piece(PieceId(3)), 81.0, 305.0);
    assert!(matches!(bottom, Outcome::Joined { created: true, .. }));

    assert_eq!(group_ids(&b).len(), 2);
    assert!(!b.solved());

    let lower = b.target_of(PieceId(3)).unwrap();
    let origin = b.node_position(lower).unwrap();
    let out = release(&mut b, lower, origin.x, origin.y - 218.0);
    assert!(matches!(out, Outcome::Absorbed { .. }), "{out:?}");

    assert_eq!(group_ids(&b).len(), 1);
    assert!(b.solved());
    assert_eq!(pos(&b, 0), Point::new(20.0, 20.0));
    assert_eq!(pos(&b, 1), Point::new(80.0, 20.0));
    assert_eq!(pos(&b, 2), Point::new(20.0, 80.0));
    assert_eq!(pos(&b, 3), Point::new(80.0, 80.0));
}

#[test]
fn snapped_position_is_exact_for_fractional_drops() {
    let mut b = board(1, 3, 12);
    b.move_to(Node::Piece(PieceId(0)), Point::new(20.1, 40.3));
    b.move_to(Node::Piece(PieceId(2)), Point::new(377.7, 401.9));

    release(&mut b, Node::Piece(PieceId(1)), 86.4, 31.15);
    assert_eq!(pos(&b, 1), Point::new(20.1 + 60.0, 40.3));

    let g = b.target_of(PieceId(1)).unwrap();
    let origin = b.node_position(g).unwrap();
    // piece 1 has to land at (377.7 - 60, 401.9)
    let shift = Point::new(377.7 - 60.0 - pos(&b, 1).x + 3.3, 401.9 - pos(&b, 1).y - 7.25);
    let out = release(&mut b, g, origin.x + shift.x, origin.y + shift.y);
    assert!(matches!(out, Outcome::Adopted { piece: PieceId(2), .. }), "{out:?}");
    assert_eq!(pos(&b, 1), Point::new(377.7 - 60.0, 401.9));
    let p0 = pos(&b, 0);
    assert!((p0.x - (377.7 - 120.0)).abs() < 1e-9);
    assert!((p0.y - 401.9).abs() < 1e-9);
}

#[test]
fn dropping_on_a_non_neighbour_changes_nothing_but_position() {
    let mut b = board(3, 3, 13);
    // (0,0) and (1,1) are diagonal
    b.move_to(Node::Piece(PieceId(4)), Point::new(200.0, 200.0));
    for id in [1, 2, 3, 5, 6, 7, 8] {
        b.move_to(Node::Piece(PieceId(id)), Point::new(440.0, 440.0));
    }
    let out = release(&mut b, Node::Piece(PieceId(0)), 140.0, 140.0);
    assert_eq!(out, Outcome::Dropped);
    assert!(group_ids(&b).is_empty());
}

#[test]
fn regenerating_replaces_everything() {
    let mut b = board(2, 2, 14);
    b.move_to(Node::Piece(PieceId(1)), Point::new(300.0, 20.0));
    release(&mut b, Node::Piece(PieceId(0)), 240.0, 20.0);
    assert_eq!(group_ids(&b).len(), 1);

    let b = Board::generate(b.config().clone(), &mut StdRng::seed_from_u64(15)).unwrap();
    assert!(group_ids(&b).is_empty());
    assert_eq!(b.root().len(), 4);
    assert!(!b.solved());
}

#[test]
fn single_tile_puzzle_is_never_solved() {
    let mut b = board(1, 1, 16);
    let out = release(&mut b, Node::Piece(PieceId(0)), 10.0, 10.0);
    assert_eq!(out, Outcome::Dropped);
    assert!(!b.solved());
}
