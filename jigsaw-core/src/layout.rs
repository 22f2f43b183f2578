//! Cutting the picture into pieces.

use rand::Rng;

use crate::board::{Piece, PieceId};
use crate::config::PuzzleConfig;
use crate::edge::{EdgeTable, Side};
use crate::geometry::Point;
use crate::template::Template;

/// Freshly cut pieces together with the edge shapes they refer to.
#[derive(Clone, Debug)]
pub struct Layout {
    pub edges: EdgeTable,
    pub pieces: Vec<Piece>,
}

/// Walk the grid row-major. Each cell generates its own bottom and right
/// edges and inherits top and left as the complements its upper and left
/// neighbours already generated, so shared edges fit by construction.
pub fn generate_layout<R: Rng + ?Sized>(cfg: &PuzzleConfig, rng: &mut R) -> Layout {
    let (rows, cols) = (cfg.rows, cfg.cols);
    let mut edges = EdgeTable::new(cfg.tile_width, cfg.tile_height);
    let mut templates: Vec<Template> = Vec::with_capacity(rows * cols);

    for row in 0..rows {
        for col in 0..cols {
            let top = if row == 0 {
                edges.make_straight(Side::Top)
            } else {
                edges.revert(templates[(row - 1) * cols + col].bottom)
            };
            let left = if col == 0 {
                edges.make_straight(Side::Left)
            } else {
                edges.revert(templates[row * cols + col - 1].right)
            };
            let bottom = if row + 1 == rows {
                edges.make_straight(Side::Bottom)
            } else {
                edges.make_curved(rng, Side::Bottom, cfg.curve_samples)
            };
            let right = if col + 1 == cols {
                edges.make_straight(Side::Right)
            } else {
                edges.make_curved(rng, Side::Right, cfg.curve_samples)
            };
            templates.push(Template {
                top,
                right,
                bottom,
                left,
            });
        }
    }

    let pieces = templates
        .into_iter()
        .enumerate()
        .map(|(i, template)| Piece {
            id: PieceId(i),
            row: i / cols,
            col: i % cols,
            template,
            group: None,
            position: scatter_position(cfg, rng),
        })
        .collect::<Vec<_>>();

    tracing::debug!(rows, cols, edges = edges.len(), "generated puzzle layout");
    Layout { edges, pieces }
}

/// Random integer position for a tile that keeps it out of the centre zone,
/// which is left free for assembling. Falls back to the origin when every
/// attempt lands inside the zone.
pub fn scatter_position<R: Rng + ?Sized>(cfg: &PuzzleConfig, rng: &mut R) -> Point {
    let (w, h) = (cfg.tile_width, cfg.tile_height);
    let (cw, ch) = (cfg.canvas_width, cfg.canvas_height);
    let span_x = (cw - w).max(0.0);
    let span_y = (ch - h).max(0.0);
    let zone = cfg.center_zone;
    let (zx, zy) = (cw * zone.x, ch * zone.y);
    let (zw, zh) = (cw * zone.w, ch * zone.h);

    for _ in 0..cfg.placement_attempts {
        let x = (rng.random::<f64>() * span_x).floor();
        let y = (rng.random::<f64>() * span_y).floor();
        let in_center = x >= zx && x <= zx + zw - w && y >= zy && y <= zy + zh - h;
        if !in_center {
            return Point::new(x, y);
        }
    }
    tracing::debug!(attempts = cfg.placement_attempts, "no free spot outside the centre zone");
    Point::ORIGIN
}
