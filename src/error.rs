use thiserror::Error;

use crate::grid::Cell;

/// Errors reported by grid, registry and simulation operations.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown entity type {0:?} (expected pursuer/zombie or evader/human)")]
    InvalidEntityType(String),
    #[error("no {kind} at {cell}")]
    NotFound { kind: &'static str, cell: Cell },
    #[error("cell {cell} is outside the {rows}x{cols} grid")]
    OutOfBounds { cell: Cell, rows: i32, cols: i32 },
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },
    #[error("cell {0} is an obstacle and cannot hold an entity")]
    ObstacleOccupied(Cell),
    #[error("layout line {line}: {reason}")]
    Layout { line: usize, reason: String },
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
