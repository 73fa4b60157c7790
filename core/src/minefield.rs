use ndarray::Array2;

use crate::*;

/// Every cell of one game, with mines already placed.
///
/// Cell info is computed once on creation and never changes afterwards, only marks do. The aggregate counters are
/// kept exact on every mark change so status derivation never has to scan the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Minefield {
    size: Coord2,
    cells: Array2<GridState>,
    mine_count: CellCount,
    flagged_count: CellCount,
    revealed_count: CellCount,
    revealed_mines: CellCount,
    triggered_mine: Option<Point>,
}

impl Minefield {
    /// Lays out mines with `generator`, `initial` is kept safe when present.
    ///
    /// Whatever the generator returns has to match `config` exactly and leave `initial` clear of mines.
    pub fn create<G>(initial: Option<Point>, config: &GameConfig, generator: &mut G) -> Result<Self>
    where
        G: MinefieldGenerator + ?Sized,
    {
        let layout = generator.generate(config, initial)?;
        layout.check(config, initial)?;
        let minefield = Self::from_layout(&layout);
        log::debug!(
            "Created {}x{} minefield with {} mines, initial point: {:?}",
            config.width(),
            config.height(),
            minefield.mine_count,
            initial
        );
        Ok(minefield)
    }

    pub fn from_layout(layout: &MineLayout) -> Self {
        let size = layout.size();
        let mut cells: Array2<GridState> = Array2::default(nd_shape(size));

        for point in iter_points(size) {
            let Some(index) = point.to_nd_index(size) else {
                continue;
            };
            cells[index].info = if layout.contains_mine(point) {
                CellInfo::Mine
            } else {
                CellInfo::from_adjacent(layout.adjacent_mine_count(point))
            };
        }

        Self {
            size,
            cells,
            mine_count: layout.mine_count(),
            flagged_count: 0,
            revealed_count: 0,
            revealed_mines: 0,
            triggered_mine: None,
        }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn contains(&self, point: Point) -> bool {
        point.in_bounds(self.size)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        CellCount::try_from(self.cells.len()).unwrap_or(CellCount::MAX)
    }

    /// State of the cell at `point`, the default unmarked empty state for points outside the board.
    pub fn get(&self, point: Point) -> GridState {
        point
            .to_nd_index(self.size)
            .map(|index| self.cells[index])
            .unwrap_or_default()
    }

    /// Changes the mark at `point`, ignored for points outside the board.
    pub fn set_mark(&mut self, point: Point, mark: CellMark) {
        let Some(index) = point.to_nd_index(self.size) else {
            return;
        };

        let cell = &mut self.cells[index];
        let previous = cell.mark;
        if previous == mark {
            return;
        }
        cell.mark = mark;
        let is_mine = cell.info.is_mine();

        match previous {
            CellMark::Unmarked => {}
            CellMark::Flagged => self.flagged_count -= 1,
            CellMark::Revealed => {
                self.revealed_count -= 1;
                if is_mine {
                    self.revealed_mines -= 1;
                    if self.revealed_mines == 0 {
                        self.triggered_mine = None;
                    }
                }
            }
        }

        match mark {
            CellMark::Unmarked => {}
            CellMark::Flagged => self.flagged_count += 1,
            CellMark::Revealed => {
                self.revealed_count += 1;
                if is_mine {
                    self.revealed_mines += 1;
                    self.triggered_mine.get_or_insert(point);
                }
            }
        }
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn unrevealed_count(&self) -> CellCount {
        self.total_cells() - self.revealed_count
    }

    pub fn any_mine_revealed(&self) -> bool {
        self.revealed_mines > 0
    }

    /// First mine that got revealed, the one that lost the game.
    pub fn triggered_mine(&self) -> Option<Point> {
        self.triggered_mine
    }

    pub fn points_surrounding(&self, point: Point) -> Neighbors {
        let (width, height) = self.size;
        neighbors(point, width, height)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, GridState)> + '_ {
        iter_points(self.size).map(|point| (point, self.get(point)))
    }

    /// Loss takes priority: a revealed mine loses even if every safe cell is open too.
    pub fn status(&self, mines: CellCount) -> Status {
        if self.any_mine_revealed() {
            Status::Lost
        } else if self.unrevealed_count() == mines {
            Status::Won
        } else {
            Status::Active
        }
    }
}
