use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board parameters: {width}x{height} with {bombs} mines")]
    InvalidParameters {
        width: Coord,
        height: Coord,
        bombs: CellCount,
    },
    #[error("Invalid coordinates")]
    InvalidCoords,
}

pub type Result<T> = core::result::Result<T, GameError>;
