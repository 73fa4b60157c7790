use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

pub trait MinefieldGenerator {
    /// Lays out `config.mines()` mines, `start` is the point of the first reveal if the game began with one.
    ///
    /// [`Minefield::create`] rejects a layout that does not match `config` or has a mine on `start`.
    fn generate(&mut self, config: &GameConfig, start: Option<Point>) -> Result<MineLayout>;
}

/// How much room to leave around the first revealed point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StartTile {
    Random,
    #[default]
    SimpleSafe,
    AlwaysZero,
}
