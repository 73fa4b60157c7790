use alloc::vec::Vec;

use super::*;

/// Always lays out the same mines, regardless of where the game starts.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetMinefieldGenerator {
    mines: Vec<Point>,
}

impl PresetMinefieldGenerator {
    pub fn new(mines: impl IntoIterator<Item = Point>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }

    pub fn mines(&self) -> &[Point] {
        &self.mines
    }
}

impl MinefieldGenerator for PresetMinefieldGenerator {
    fn generate(&mut self, config: &GameConfig, start: Option<Point>) -> Result<MineLayout> {
        let layout = MineLayout::from_mine_points(config.size(), &self.mines)?;
        layout.check(config, start)?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_the_given_points() {
        let config = GameConfig::new(3, 2, 2).unwrap();
        let mut generator = PresetMinefieldGenerator::new([Point::new(0, 0), Point::new(2, 1)]);

        let layout = generator.generate(&config, None).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert!(layout.contains_mine(Point::new(0, 0)));
        assert!(layout.contains_mine(Point::new(2, 1)));
        assert!(!layout.contains_mine(Point::new(1, 1)));
    }

    #[test]
    fn rejects_points_outside_the_board() {
        let config = GameConfig::new(2, 2, 1).unwrap();
        let mut generator = PresetMinefieldGenerator::new([Point::new(1, 1), Point::new(5, 0)]);

        assert_eq!(
            generator.generate(&config, Some(Point::new(0, 0))),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn rejects_wrong_mine_count() {
        let config = GameConfig::new(3, 3, 2).unwrap();
        let mut generator = PresetMinefieldGenerator::new([Point::new(0, 0)]);

        assert_eq!(
            generator.generate(&config, None),
            Err(GameError::MineCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn rejects_mine_on_start() {
        let config = GameConfig::new(3, 3, 1).unwrap();
        let mut generator = PresetMinefieldGenerator::new([Point::new(1, 1)]);

        assert_eq!(
            generator.generate(&config, Some(Point::new(1, 1))),
            Err(GameError::MineOnStart(Point::new(1, 1)))
        );
        // a flag first leaves nothing to keep safe
        assert!(generator.generate(&config, None).is_ok());
    }
}
