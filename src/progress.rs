use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const TICK_PERIOD: Duration = Duration::from_millis(600);
pub const PROGRESS_CEILING: f32 = 95.0;
pub const MAX_STEP: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickerState {
    Stopped,
    Running { next_tick: Instant },
}

/// Repeating timer that grows a fake progress value while a conversion runs.
///
/// The value has nothing to do with the backend; it only gives the user
/// something to look at. It is polled from the UI loop rather than owning a
/// thread, so stopping it is just a state change.
pub struct ProgressTicker {
    state: TickerState,
    progress: f32,
    rng: StdRng,
}

impl Default for ProgressTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: TickerState::Stopped,
            progress: 0.0,
            rng,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.progress = 0.0;
        self.state = TickerState::Running {
            next_tick: now + TICK_PERIOD,
        };
    }

    /// Safe to call any number of times. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = TickerState::Stopped;
        was_running
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TickerState::Running { .. })
    }

    #[cfg(test)]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            TickerState::Running { next_tick } => Some(next_tick),
            TickerState::Stopped => None,
        }
    }

    /// Fires every tick that came due by `now`. Returns the new value when at
    /// least one tick fired.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        let TickerState::Running { mut next_tick } = self.state else {
            return None;
        };

        let mut fired = false;
        while next_tick <= now {
            self.progress = (self.progress + self.rng.gen_range(0.0..MAX_STEP)).min(PROGRESS_CEILING);
            next_tick += TICK_PERIOD;
            fired = true;
        }

        self.state = TickerState::Running { next_tick };
        fired.then_some(self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tick_before_period() {
        let start = Instant::now();
        let mut ticker = ProgressTicker::seeded(7);
        ticker.start(start);

        assert_eq!(ticker.poll(start + Duration::from_millis(599)), None);
        assert!(ticker.poll(start + TICK_PERIOD).is_some());
    }

    #[test]
    fn test_step_is_bounded() {
        let start = Instant::now();
        let mut ticker = ProgressTicker::seeded(42);
        ticker.start(start);

        let mut previous = 0.0;
        for i in 1..=10 {
            let value = ticker.poll(start + TICK_PERIOD * i).unwrap();
            assert!(value >= previous);
            assert!(value - previous < MAX_STEP);
            previous = value;
        }
    }

    #[test]
    fn test_clamps_at_ceiling() {
        let start = Instant::now();
        let mut ticker = ProgressTicker::seeded(1);
        ticker.start(start);

        let value = ticker.poll(start + TICK_PERIOD * 1000).unwrap();
        assert!(value <= PROGRESS_CEILING);
        assert_eq!(value, PROGRESS_CEILING);
    }

    #[test]
    fn test_double_stop_is_noop() {
        let start = Instant::now();
        let mut ticker = ProgressTicker::seeded(3);
        ticker.start(start);

        assert!(ticker.stop());
        assert!(!ticker.stop());
        assert!(!ticker.is_running());
        assert_eq!(ticker.next_deadline(), None);
    }

    #[test]
    fn test_stopped_ticker_never_fires() {
        let start = Instant::now();
        let mut ticker = ProgressTicker::seeded(5);
        ticker.start(start);
        ticker.poll(start + TICK_PERIOD * 3);
        let frozen = ticker.progress();
        ticker.stop();

        assert_eq!(ticker.poll(start + TICK_PERIOD * 50), None);
        assert_eq!(ticker.progress(), frozen);
    }

    #[test]
    fn test_restart_resets_progress() {
        let start = Instant::now();
        let mut ticker = ProgressTicker::seeded(9);
        ticker.start(start);
        ticker.poll(start + TICK_PERIOD * 20);
        ticker.stop();

        let later = start + Duration::from_secs(60);
        ticker.start(later);
        assert_eq!(ticker.progress(), 0.0);
        assert_eq!(ticker.next_deadline(), Some(later + TICK_PERIOD));
    }
}
