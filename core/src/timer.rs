use core::time::Duration;

/// How often a running timer should tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies one run of the game timer.
///
/// Every start gets a fresh epoch, so a tick that was already queued when its timer stopped carries an epoch that no
/// longer matches and gets dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub(crate) const FIRST: Self = Self(0);

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Host side of the timer, e.g. an interval callback that queues a tick on the thread that handles input.
pub trait TickSource {
    /// Begin calling `Session::tick(epoch)` every [`TICK_INTERVAL`].
    fn start(&mut self, epoch: Epoch);

    /// Stop ticking for `epoch`. Must take effect before returning.
    fn stop(&mut self, epoch: Epoch);
}

/// Tick source that only remembers which epoch is running, for hosts that poll on their own schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualTicks {
    running: Option<Epoch>,
    starts: u32,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running(&self) -> Option<Epoch> {
        self.running
    }

    /// How many times a timer was started.
    pub fn starts(&self) -> u32 {
        self.starts
    }
}

impl TickSource for ManualTicks {
    fn start(&mut self, epoch: Epoch) {
        self.running = Some(epoch);
        self.starts += 1;
    }

    fn stop(&mut self, epoch: Epoch) {
        if self.running == Some(epoch) {
            self.running = None;
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TimerHandle {
    pub(crate) epoch: Epoch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticks_track_running_epoch() {
        let mut ticks = ManualTicks::new();
        let first = Epoch::FIRST;
        let second = first.next();

        ticks.start(first);
        assert_eq!(ticks.running(), Some(first));

        ticks.stop(first);
        ticks.start(second);
        ticks.stop(first);
        assert_eq!(ticks.running(), Some(second));
        assert_eq!(ticks.starts(), 2);

        ticks.stop(second);
        assert_eq!(ticks.running(), None);
    }
}
