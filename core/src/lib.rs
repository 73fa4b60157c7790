#![no_std]

extern crate alloc;

use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use minefield::*;
pub use session::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod minefield;
mod session;
mod tile;
mod timer;
mod types;

/// Board shape and mine count, validated on construction so a session never holds a bad one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.width, raw.height, raw.mines)
    }
}

impl GameConfig {
    /// Fails when the board is empty or when the mines would leave no safe cell.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        if width < 1 || height < 1 {
            return Err(GameError::InvalidSize { width, height });
        }

        let cells = CellCount::try_from(i64::from(width) * i64::from(height))
            .map_err(|_| GameError::BoardTooLarge)?;
        if mines >= cells {
            return Err(GameError::TooManyMines { mines, cells });
        }

        Ok(Self {
            width,
            height,
            mines,
        })
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        // checked in `new`
        (self.width as CellCount) * (self.height as CellCount)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub const fn contains(&self, point: Point) -> bool {
        point.in_bounds(self.size())
    }
}

/// Where the mines are, before any cell has been computed or marked.
///
/// The board size is the shape of the mask and the mine count is always recounted from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMineLayout")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct RawMineLayout {
    mine_mask: Array2<bool>,
}

impl TryFrom<RawMineLayout> for MineLayout {
    type Error = GameError;

    fn try_from(raw: RawMineLayout) -> Result<Self> {
        let (width, height) = raw.mine_mask.dim();
        let width = Coord::try_from(width).map_err(|_| GameError::BoardTooLarge)?;
        let height = Coord::try_from(height).map_err(|_| GameError::BoardTooLarge)?;
        if width < 1 || height < 1 {
            return Err(GameError::InvalidSize { width, height });
        }
        CellCount::try_from(raw.mine_mask.len()).map_err(|_| GameError::BoardTooLarge)?;

        Ok(Self::from_mine_mask(raw.mine_mask))
    }
}

impl MineLayout {
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Self {
            mine_mask,
            mine_count: CellCount::try_from(mine_count).unwrap_or(CellCount::MAX),
        }
    }

    pub(crate) fn empty_mask(size: Coord2) -> Array2<bool> {
        Array2::default(nd_shape(size))
    }

    pub fn from_mine_points(size: Coord2, mine_points: &[Point]) -> Result<Self> {
        let (width, height) = size;
        if width < 1 || height < 1 {
            return Err(GameError::InvalidSize { width, height });
        }

        let mut mine_mask = Self::empty_mask(size);
        for &point in mine_points {
            let index = point.to_nd_index(size).ok_or(GameError::InvalidCoords)?;
            mine_mask[index] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.mine_mask.dim();
        (
            Coord::try_from(width).unwrap_or(Coord::MAX),
            Coord::try_from(height).unwrap_or(Coord::MAX),
        )
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, point: Point) -> bool {
        point
            .to_nd_index(self.size())
            .and_then(|index| self.mine_mask.get(index))
            .is_some_and(|&is_mine| is_mine)
    }

    pub fn adjacent_mine_count(&self, point: Point) -> u8 {
        let count = NeighborIter::new(point, self.size())
            .filter(|&pos| self.contains_mine(pos))
            .count();
        // at most 8 neighbors
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// Fails unless this layout fits `config` and keeps `start` clear.
    pub fn check(&self, config: &GameConfig, start: Option<Point>) -> Result<()> {
        if self.size() != config.size() {
            return Err(GameError::LayoutSizeMismatch {
                expected: config.size(),
                actual: self.size(),
            });
        }
        if self.mine_count != config.mines() {
            return Err(GameError::MineCountMismatch {
                expected: config.mines(),
                actual: self.mine_count,
            });
        }
        if let Some(start) = start.filter(|&start| self.contains_mine(start)) {
            return Err(GameError::MineOnStart(start));
        }
        Ok(())
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Point> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .filter_map(|((x, y), _)| Some(Point::new(x.try_into().ok()?, y.try_into().ok()?)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}

/// Used to merge outcomes when revealing several cells at once
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
