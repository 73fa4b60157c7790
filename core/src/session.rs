use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Unstarted -> Active
/// - Unstarted -> Won
/// - Active -> Won
/// - Active -> Lost
/// - any -> Unstarted, on reset or configuration change
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No minefield yet
    #[default]
    Unstarted,
    /// Game started
    Active,
    /// Every safe cell revealed
    Won,
    /// A mine got revealed
    Lost,
}

impl Status {
    /// Status of a game with `minefield` (if any) that is supposed to hold `mines` mines.
    pub fn derive(minefield: Option<&Minefield>, mines: CellCount) -> Self {
        minefield.map_or(Self::Unstarted, |minefield| minefield.status(mines))
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game at a time: configuration, the lazily created minefield, and the timer.
///
/// All player actions go through here. The minefield only exists once the first reveal or flag happens, and it is
/// discarded again by [`Session::reset`] or [`Session::set_config`]. After every action the status is derived again
/// and compared with the one before, which is what starts and stops the timer.
#[derive(Debug)]
pub struct Session<G = RandomMinefieldGenerator, T = ManualTicks> {
    config: GameConfig,
    elapsed: u32,
    minefield: Option<Minefield>,
    timer: Option<TimerHandle>,
    last_epoch: Option<Epoch>,
    generator: G,
    ticks: T,
}

impl Session {
    /// Random mines from `seed`, first revealed cell kept safe, ticks polled by the host.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_parts(
            config,
            RandomMinefieldGenerator::new(seed, StartTile::SimpleSafe),
            ManualTicks::new(),
        )
    }
}

impl<G: MinefieldGenerator, T: TickSource> Session<G, T> {
    pub fn with_parts(config: GameConfig, generator: G, ticks: T) -> Self {
        Self {
            config,
            elapsed: 0,
            minefield: None,
            timer: None,
            last_epoch: None,
            generator,
            ticks,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Swaps the configuration, which always starts over.
    pub fn set_config(&mut self, config: GameConfig) {
        log::debug!("Configuration changed to {:?}", config);
        self.config = config;
        self.reset();
    }

    pub fn status(&self) -> Status {
        Status::derive(self.minefield.as_ref(), self.config.mines())
    }

    /// Seconds counted by the timer since the game started.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn minefield(&self) -> Option<&Minefield> {
        self.minefield.as_ref()
    }

    pub fn cell(&self, point: Point) -> GridState {
        self.minefield
            .as_ref()
            .map(|minefield| minefield.get(point))
            .unwrap_or_default()
    }

    /// Flags placed, reads as all mines once the game is won.
    pub fn flagged_count(&self) -> CellCount {
        match self.status() {
            Status::Won => self.config.mines(),
            Status::Unstarted | Status::Active | Status::Lost => self
                .minefield
                .as_ref()
                .map_or(0, |minefield| minefield.flagged_count()),
        }
    }

    /// How many mines have not been flagged yet, negative when there are more flags than mines.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.config.mines()) - i64::from(self.flagged_count())
    }

    /// Epoch of the running timer, if any.
    pub fn timer_epoch(&self) -> Option<Epoch> {
        self.timer.map(|handle| handle.epoch)
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        &mut self.ticks
    }

    pub fn reveal(&mut self, point: Point) -> RevealOutcome {
        if !self.accepts(point) {
            return RevealOutcome::NoChange;
        }

        self.apply(|session| {
            session
                .get_or_create_minefield(Some(point))
                .map_or(RevealOutcome::NoChange, |minefield| {
                    engine::reveal(minefield, point)
                })
        })
    }

    pub fn toggle_flag(&mut self, point: Point) -> MarkOutcome {
        if !self.accepts(point) {
            return MarkOutcome::NoChange;
        }

        self.apply(|session| {
            // no reveal yet, so no cell needs to be kept safe
            session
                .get_or_create_minefield(None)
                .map_or(MarkOutcome::NoChange, |minefield| {
                    engine::toggle_flag(minefield, point)
                })
        })
    }

    pub fn probe(&mut self, point: Point) -> RevealOutcome {
        if self.minefield.is_none() || !self.accepts(point) {
            return RevealOutcome::NoChange;
        }

        self.apply(|session| match session.minefield.as_mut() {
            Some(minefield) => engine::probe(minefield, point),
            None => RevealOutcome::NoChange,
        })
    }

    /// Throws away the minefield and the elapsed time.
    pub fn reset(&mut self) {
        self.stop_timer();
        self.elapsed = 0;
        if self.minefield.take().is_some() {
            log::debug!("Game reset");
        }
    }

    /// Counts one second if `epoch` belongs to the running timer, returns whether it did.
    pub fn tick(&mut self, epoch: Epoch) -> bool {
        if self.timer_epoch() != Some(epoch) {
            log::trace!("Ignoring stale tick for {:?}", epoch);
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(1);
        true
    }

    fn accepts(&self, point: Point) -> bool {
        if self.status().is_finished() {
            log::trace!("Game already ended, ignoring action at {}", point);
            return false;
        }
        if !self.config.contains(point) {
            log::trace!("Ignoring action outside the board at {}", point);
            return false;
        }
        true
    }

    /// The only place a minefield gets created. A layout the generator got wrong leaves the game unstarted.
    fn get_or_create_minefield(&mut self, initial: Option<Point>) -> Option<&mut Minefield> {
        let Self {
            minefield,
            config,
            generator,
            ..
        } = self;
        if minefield.is_none() {
            match Minefield::create(initial, config, generator) {
                Ok(created) => *minefield = Some(created),
                Err(err) => {
                    log::error!("Failed to create minefield: {}", err);
                    return None;
                }
            }
        }
        minefield.as_mut()
    }

    fn apply<R>(&mut self, action: impl FnOnce(&mut Self) -> R) -> R {
        let before = self.status();
        let result = action(self);
        self.update_timer(before);
        result
    }

    fn update_timer(&mut self, before: Status) {
        let after = self.status();
        if before == after {
            return;
        }

        log::debug!("Status changed from {:?} to {:?}", before, after);
        match (before.is_active(), after.is_active()) {
            (false, true) => self.start_timer(),
            (true, false) => self.stop_timer(),
            _ => {}
        }
    }

    fn start_timer(&mut self) {
        let epoch = self.last_epoch.map_or(Epoch::FIRST, Epoch::next);
        self.last_epoch = Some(epoch);
        self.ticks.start(epoch);
        self.timer = Some(TimerHandle { epoch });
        log::debug!("Timer started, {:?}", epoch);
    }

    fn stop_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.ticks.stop(handle.epoch);
            log::debug!("Timer stopped at {} seconds", self.elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    /// Preset layout that also remembers every start point it was asked for.
    #[derive(Debug)]
    struct RecordingGenerator {
        preset: PresetMinefieldGenerator,
        starts: Vec<Option<Point>>,
    }

    impl MinefieldGenerator for RecordingGenerator {
        fn generate(&mut self, config: &GameConfig, start: Option<Point>) -> Result<MineLayout> {
            self.starts.push(start);
            self.preset.generate(config, start)
        }
    }

    fn session(
        width: Coord,
        height: Coord,
        mines: &[Point],
    ) -> Session<RecordingGenerator, ManualTicks> {
        let config = GameConfig::new(width, height, mines.len() as CellCount).unwrap();
        let generator = RecordingGenerator {
            preset: PresetMinefieldGenerator::new(mines.iter().copied()),
            starts: Vec::new(),
        };
        Session::with_parts(config, generator, ManualTicks::new())
    }

    #[test]
    fn new_session_is_unstarted() {
        let session = Session::new(GameConfig::new(9, 9, 10).unwrap(), 0);

        assert_eq!(session.status(), Status::Unstarted);
        assert_eq!(session.elapsed(), 0);
        assert_eq!(session.flagged_count(), 0);
        assert_eq!(session.mines_left(), 10);
        assert_eq!(session.cell(Point::new(4, 4)), GridState::default());
        assert_eq!(session.timer_epoch(), None);
        assert!(session.minefield().is_none());
    }

    #[test]
    fn first_reveal_starts_game_and_timer() {
        let mut session = session(3, 3, &[Point::new(0, 0), Point::new(2, 2)]);

        assert_eq!(session.reveal(Point::new(1, 1)), RevealOutcome::Revealed);

        assert_eq!(session.status(), Status::Active);
        assert_eq!(session.cell(Point::new(1, 1)).info, CellInfo::Count(2));
        assert_eq!(session.generator.starts, [Some(Point::new(1, 1))]);
        assert!(session.timer_epoch().is_some());
        assert_eq!(session.ticks().running(), session.timer_epoch());
        assert_eq!(session.ticks().starts(), 1);
    }

    #[test]
    fn first_flag_creates_minefield_without_anchor() {
        let mut session = session(3, 3, &[Point::new(0, 0)]);

        assert_eq!(session.toggle_flag(Point::new(0, 0)), MarkOutcome::Changed);

        assert_eq!(session.generator.starts, [None]);
        assert_eq!(session.status(), Status::Active);
        assert_eq!(session.flagged_count(), 1);
        assert!(session.timer_epoch().is_some());
    }

    #[test]
    fn minefield_is_created_once() {
        let mut session = session(3, 3, &[Point::new(0, 0)]);

        session.toggle_flag(Point::new(2, 2));
        session.reveal(Point::new(1, 1));
        session.reveal(Point::new(1, 0));

        assert_eq!(session.generator.starts.len(), 1);
    }

    #[test]
    fn zero_mine_row_is_won_on_first_reveal() {
        let mut session = session(3, 1, &[]);

        session.reveal(Point::new(0, 0));

        assert_eq!(session.status(), Status::Won);
        for x in 0..3 {
            assert_eq!(session.cell(Point::new(x, 0)).mark, CellMark::Revealed);
        }
        // never went through active
        assert_eq!(session.ticks().starts(), 0);
        assert_eq!(session.timer_epoch(), None);
    }

    #[test]
    fn first_reveal_is_never_a_mine() {
        let config = GameConfig::new(3, 3, 1).unwrap();

        for seed in 0..64 {
            let mut session = Session::new(config, seed);

            assert_eq!(session.reveal(Point::new(1, 1)), RevealOutcome::Revealed);
            assert_eq!(session.cell(Point::new(1, 1)).info, CellInfo::Count(1));
            assert_eq!(session.status(), Status::Active);
        }
    }

    #[test]
    fn preset_with_mine_on_first_reveal_never_starts() {
        let mut session = session(3, 3, &[Point::new(1, 1)]);

        assert_eq!(session.reveal(Point::new(1, 1)), RevealOutcome::NoChange);

        assert_eq!(session.status(), Status::Unstarted);
        assert!(session.minefield().is_none());
        assert_eq!(session.timer_epoch(), None);
        assert_eq!(session.ticks().starts(), 0);
        assert_eq!(session.cell(Point::new(1, 1)), GridState::default());
    }

    #[test]
    fn preset_with_wrong_mine_count_never_starts() {
        let config = GameConfig::new(3, 3, 2).unwrap();
        let generator = PresetMinefieldGenerator::new([Point::new(0, 0)]);
        let mut session = Session::with_parts(config, generator, ManualTicks::new());

        assert_eq!(session.toggle_flag(Point::new(0, 0)), MarkOutcome::NoChange);
        assert_eq!(session.reveal(Point::new(2, 2)), RevealOutcome::NoChange);

        assert_eq!(session.status(), Status::Unstarted);
        assert!(session.minefield().is_none());
        assert_eq!(session.mines_left(), 2);
    }

    #[test]
    fn mine_count_always_matches_config() {
        let config = GameConfig::new(3, 3, 2).unwrap();
        let generator = PresetMinefieldGenerator::new([Point::new(0, 0), Point::new(2, 0)]);
        let mut session = Session::with_parts(config, generator, ManualTicks::new());

        for point in iter_points((3, 3)).filter(|&p| p != Point::new(0, 0) && p != Point::new(2, 0)) {
            session.reveal(point);
        }

        assert_eq!(session.minefield().unwrap().mine_count(), config.mines());
        assert_eq!(session.status(), Status::Won);
    }

    #[test]
    fn revealing_a_mine_loses_and_freezes_the_board() {
        let mut session = session(3, 3, &[Point::new(0, 0), Point::new(2, 2)]);
        session.reveal(Point::new(1, 1));
        let epoch = session.timer_epoch().unwrap();
        assert!(session.tick(epoch));

        assert_eq!(session.reveal(Point::new(0, 0)), RevealOutcome::HitMine);

        assert_eq!(session.status(), Status::Lost);
        assert_eq!(session.minefield().unwrap().triggered_mine(), Some(Point::new(0, 0)));
        assert_eq!(session.timer_epoch(), None);
        assert_eq!(session.ticks().running(), None);
        assert!(!session.tick(epoch));
        assert_eq!(session.elapsed(), 1);

        let frozen = session.minefield().unwrap().clone();
        assert_eq!(session.reveal(Point::new(1, 0)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag(Point::new(2, 2)), MarkOutcome::NoChange);
        assert_eq!(session.probe(Point::new(1, 1)), RevealOutcome::NoChange);
        assert_eq!(session.minefield(), Some(&frozen));
    }

    #[test]
    fn winning_stops_timer_and_fills_flag_counter() {
        let mut session = session(2, 2, &[Point::new(0, 0)]);

        session.reveal(Point::new(1, 1));
        assert_eq!(session.status(), Status::Active);
        session.reveal(Point::new(1, 0));
        session.reveal(Point::new(0, 1));

        assert_eq!(session.status(), Status::Won);
        assert_eq!(session.timer_epoch(), None);
        assert_eq!(session.flagged_count(), 1);
        assert_eq!(session.mines_left(), 0);
        assert_eq!(session.toggle_flag(Point::new(0, 0)), MarkOutcome::NoChange);
    }

    #[test]
    fn probe_with_wrong_flags_loses() {
        let mut session = session(3, 3, &[Point::new(0, 0), Point::new(2, 0)]);
        session.reveal(Point::new(1, 1));
        session.toggle_flag(Point::new(0, 0));
        session.toggle_flag(Point::new(1, 0));

        assert_eq!(session.probe(Point::new(1, 1)), RevealOutcome::HitMine);
        assert_eq!(session.status(), Status::Lost);
        assert_eq!(session.timer_epoch(), None);
    }

    #[test]
    fn probe_without_minefield_does_nothing() {
        let mut session = session(3, 3, &[Point::new(0, 0)]);

        assert_eq!(session.probe(Point::new(1, 1)), RevealOutcome::NoChange);

        assert_eq!(session.status(), Status::Unstarted);
        assert!(session.generator.starts.is_empty());
    }

    #[test]
    fn actions_outside_the_board_are_ignored() {
        let mut session = session(3, 3, &[Point::new(0, 0)]);

        assert_eq!(session.reveal(Point::new(-1, 1)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag(Point::new(3, 0)), MarkOutcome::NoChange);

        assert_eq!(session.status(), Status::Unstarted);
        assert_eq!(session.cell(Point::new(-1, 1)), GridState::default());
    }

    #[test]
    fn over_flagging_goes_negative() {
        let mut session = session(3, 3, &[Point::new(0, 0)]);

        session.toggle_flag(Point::new(0, 0));
        session.toggle_flag(Point::new(1, 0));
        session.toggle_flag(Point::new(2, 0));

        assert_eq!(session.mines_left(), -2);
    }

    #[test]
    fn reset_discards_everything() {
        let mut session = session(3, 3, &[Point::new(0, 0)]);
        session.toggle_flag(Point::new(0, 0));
        let epoch = session.timer_epoch().unwrap();
        session.tick(epoch);
        session.tick(epoch);
        assert_eq!(session.elapsed(), 2);

        session.reset();

        assert_eq!(session.status(), Status::Unstarted);
        assert_eq!(session.elapsed(), 0);
        assert_eq!(session.flagged_count(), 0);
        assert!(session.minefield().is_none());
        assert_eq!(session.timer_epoch(), None);
        assert_eq!(session.ticks().running(), None);

        // a tick queued before the reset must not count
        assert!(!session.tick(epoch));
        assert_eq!(session.elapsed(), 0);
    }

    #[test]
    fn new_game_gets_a_new_epoch() {
        let mut session = session(3, 3, &[Point::new(0, 0), Point::new(2, 2)]);
        session.reveal(Point::new(1, 1));
        let first = session.timer_epoch().unwrap();

        session.reset();
        session.reveal(Point::new(1, 0));
        let second = session.timer_epoch().unwrap();

        assert_ne!(first, second);
        assert!(!session.tick(first));
        assert!(session.tick(second));
        assert_eq!(session.elapsed(), 1);
    }

    #[test]
    fn changing_config_resets() {
        let mut session = Session::new(GameConfig::new(3, 3, 1).unwrap(), 5);
        session.reveal(Point::new(0, 0));
        assert_ne!(session.status(), Status::Unstarted);

        session.set_config(GameConfig::new(5, 4, 3).unwrap());

        assert_eq!(session.status(), Status::Unstarted);
        assert_eq!(session.elapsed(), 0);
        assert_eq!(session.timer_epoch(), None);

        session.reveal(Point::new(4, 3));
        assert_eq!(session.minefield().unwrap().size(), (5, 4));
        assert_eq!(session.minefield().unwrap().mine_count(), 3);
    }
}
