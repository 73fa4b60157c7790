use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;
use smallvec::smallvec;

use super::*;

/// Generation strategy that can optionally try to make the starting tile zero or at least safe, but other than that is
/// purely random.
#[derive(Clone, Debug)]
pub struct RandomMinefieldGenerator {
    rng: SmallRng,
    start_tile: StartTile,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start_tile: StartTile) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            start_tile,
        }
    }

    pub fn start_tile(&self) -> StartTile {
        self.start_tile
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(&mut self, config: &GameConfig, start: Option<Point>) -> Result<MineLayout> {
        use StartTile::*;

        let size = config.size();
        let (width, height) = size;
        let mines = usize::try_from(config.mines()).map_err(|_| GameError::BoardTooLarge)?;
        let total_cells =
            usize::try_from(config.total_cells()).map_err(|_| GameError::BoardTooLarge)?;

        let excluded: Neighbors = match (start, self.start_tile) {
            (None, _) | (Some(_), Random) => Neighbors::new(),
            (Some(start), AlwaysZero) => {
                let mut block = neighbors(start, width, height);
                block.push(start);
                if mines + block.len() > total_cells {
                    log::warn!("Cannot make start tile zero, fallback to simple safe");
                    smallvec![start]
                } else {
                    block
                }
            }
            (Some(start), SimpleSafe) => smallvec![start],
        };

        let candidates: Vec<Point> = iter_points(size)
            .filter(|point| !excluded.contains(point))
            .collect();

        if mines > candidates.len() {
            return Err(GameError::TooManyMines {
                mines: config.mines(),
                cells: CellCount::try_from(candidates.len()).unwrap_or(CellCount::MAX),
            });
        }

        let mut mine_mask = MineLayout::empty_mask(size);
        for i in index::sample(&mut self.rng, candidates.len(), mines).into_iter() {
            if let Some(index) = candidates[i].to_nd_index(size) {
                mine_mask[index] = true;
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        log::debug!(
            "Generated {}x{} minefield with {} mines, start: {:?}",
            width,
            height,
            layout.mine_count(),
            start
        );
        Ok(layout)
    }
}
