//! Generation parameters for a puzzle.
//! Lengths are canvas pixels unless noted otherwise.

use serde::{Deserialize, Serialize};

use crate::curve::DEFAULT_SAMPLES;
use crate::error::ConfigError;

pub const DEFAULT_ROWS: usize = 5;
pub const DEFAULT_COLS: usize = 5;
pub const DEFAULT_TILE_SIZE: f64 = 60.0;
pub const DEFAULT_CANVAS_SIZE: f64 = 500.0;
/// Maximum per-axis distance (px) between a piece and its ideal neighbour
/// offset for the two to snap.
pub const SNAP_TOLERANCE: f64 = 10.0;
pub const PLACEMENT_ATTEMPTS: usize = 1000;

/// Canvas region kept free of scattered pieces, as fractions of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterZone {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Default for CenterZone {
    fn default() -> Self {
        CenterZone {
            x: 0.2,
            y: 0.2,
            w: 0.6,
            h: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub rows: usize,
    pub cols: usize,
    pub tile_width: f64,
    pub tile_height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub snap_tolerance: f64,
    pub curve_samples: usize,
    pub placement_attempts: usize,
    pub center_zone: CenterZone,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        PuzzleConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            snap_tolerance: SNAP_TOLERANCE,
            curve_samples: DEFAULT_SAMPLES,
            placement_attempts: PLACEMENT_ATTEMPTS,
            center_zone: CenterZone::default(),
        }
    }
}

impl PuzzleConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: PuzzleConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.tile_width) || !positive(self.tile_height) {
            return Err(ConfigError::TileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(ConfigError::CanvasSize {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.tile_width > self.canvas_width || self.tile_height > self.canvas_height {
            return Err(ConfigError::TileLargerThanCanvas);
        }
        if self.curve_samples < 2 {
            return Err(ConfigError::TooFewSamples(self.curve_samples));
        }
        if self.snap_tolerance.is_nan() || self.snap_tolerance < 0.0 {
            return Err(ConfigError::Tolerance(self.snap_tolerance));
        }
        Ok(())
    }

    /// Size of the fully assembled picture.
    pub fn picture_size(&self) -> (f64, f64) {
        (
            self.tile_width * self.cols as f64,
            self.tile_height * self.rows as f64,
        )
    }
}
