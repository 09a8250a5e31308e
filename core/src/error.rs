use alloc::string::String;
use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Rows must be between {min} and {max}, got {rows}")]
    RowsOutOfRange { rows: Coord, min: Coord, max: Coord },
    #[error("Columns must be between {min} and {max}, got {cols}")]
    ColsOutOfRange { cols: Coord, min: Coord, max: Coord },
    #[error("At least one mine is required")]
    TooFewMines,
    #[error("Too many mines: {mines} requested but at most {max} fit")]
    TooManyMines { mines: CellCount, max: CellCount },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Could not write to storage: {0}")]
    Backend(String),
    #[error("Stored scores are corrupt: {0}")]
    Corrupt(String),
}

pub type Result<T, E = ConfigError> = core::result::Result<T, E>;
