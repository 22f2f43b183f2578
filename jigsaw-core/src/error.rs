//! Errors raised while reading or validating a puzzle configuration.

use std::fmt;

/// Reasons a [`PuzzleConfig`](crate::PuzzleConfig) cannot be used to cut a puzzle.
#[derive(Debug)]
pub enum ConfigError {
    EmptyGrid { rows: usize, cols: usize },
    TileSize { width: f64, height: f64 },
    CanvasSize { width: f64, height: f64 },
    TileLargerThanCanvas,
    TooFewSamples(usize),
    Tolerance(f64),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGrid { rows, cols } => {
                write!(f, "grid must have at least one row and column (got {rows}x{cols})")
            }
            ConfigError::TileSize { width, height } => {
                write!(f, "tile size must be positive and finite (got {width}x{height})")
            }
            ConfigError::CanvasSize { width, height } => {
                write!(f, "canvas size must be positive and finite (got {width}x{height})")
            }
            ConfigError::TileLargerThanCanvas => write!(f, "a single tile does not fit on the canvas"),
            ConfigError::TooFewSamples(n) => {
                write!(f, "curves need at least 2 samples (got {n})")
            }
            ConfigError::Tolerance(t) => write!(f, "snap tolerance must be >= 0 (got {t})"),
            ConfigError::Parse(e) => write!(f, "invalid puzzle config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
