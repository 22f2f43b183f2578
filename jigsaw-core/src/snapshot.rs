//! Read-only JSON view of a board for the host page.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::geometry::Point;

/// Read-only view of one piece for the host page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceState {
    pub id: usize,
    pub row: usize,
    pub col: usize,
    pub at: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub solved: bool,
    /// Number of live groups.
    pub groups: usize,
    pub pieces: Vec<PieceState>,
}

impl Board {
    pub fn snapshot(&self) -> Snapshot {
        let pieces = self
            .pieces()
            .iter()
            .map(|p| PieceState {
                id: p.id.0,
                row: p.row,
                col: p.col,
                at: p.position,
                group: p.group.map(|g| g.0),
            })
            .collect();
        Snapshot {
            rows: self.config().rows,
            cols: self.config().cols,
            solved: self.solved(),
            groups: self.groups().count(),
            pieces,
        }
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }
}
