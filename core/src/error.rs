use thiserror::Error;

use crate::{CellCount, Coord, Coord2, Point};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board must be at least 1x1, got {width}x{height}")]
    InvalidSize { width: Coord, height: Coord },
    #[error("Too many mines, {mines} requested for {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("Board has more cells than can be counted")]
    BoardTooLarge,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Mine layout is {actual:?}, board is {expected:?}")]
    LayoutSizeMismatch { expected: Coord2, actual: Coord2 },
    #[error("Mine layout has {actual} mines, board needs {expected}")]
    MineCountMismatch {
        expected: CellCount,
        actual: CellCount,
    },
    #[error("Mine layout has a mine on the first revealed cell {0}")]
    MineOnStart(Point),
}

pub type Result<T> = core::result::Result<T, GameError>;
