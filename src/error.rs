use crate::entity::Position;
use crate::grid::CellState;
use thiserror::Error;

/// A rejected grid or trail mutation. The caller's state is left untouched.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidMutation {
    #[error("cell {0} is outside the playfield")]
    OutOfBounds(Position),
    #[error("border cell {0} cannot be reclassified")]
    BorderCell(Position),
    #[error("cell {at} cannot change from {from:?} to {to:?}")]
    IllegalTransition {
        at: Position,
        from: CellState,
        to: CellState,
    },
    #[error("{to} is not an orthogonal neighbour of {from}")]
    NotAdjacent { from: Position, to: Position },
    #[error("no trail is being drawn")]
    NotDrawing,
    #[error("a trail is already being drawn")]
    AlreadyDrawing,
    #[error("trail cannot be anchored at {0}")]
    InvalidAnchor(Position),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("playfield must be between 5x5 and 512x512 cells, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("win threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("unknown difficulty {0:?}, expected \"normal\" or \"hard\"")]
    UnknownDifficulty(String),
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = core::result::Result<T, InvalidMutation>;
