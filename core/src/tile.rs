use serde::{Deserialize, Serialize};

/// What the player has done to a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellMark {
    #[default]
    Unmarked,
    Flagged,
    Revealed,
}

impl CellMark {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Unmarked | Self::Flagged)
    }
}

/// What a cell holds, fixed once mines are placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellInfo {
    #[default]
    Empty,
    /// Number of adjacent mines, always in `1..=8`.
    Count(u8),
    Mine,
}

impl CellInfo {
    pub(crate) const fn from_adjacent(adjacent_mines: u8) -> Self {
        if adjacent_mines == 0 {
            Self::Empty
        } else {
            Self::Count(adjacent_mines)
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// Externally observable state of one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridState {
    pub mark: CellMark,
    pub info: CellInfo,
}

impl GridState {
    pub const fn new(mark: CellMark, info: CellInfo) -> Self {
        Self { mark, info }
    }
}
