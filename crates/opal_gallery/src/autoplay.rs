//! Slideshow timing
//!
//! [`Autoplay`] is a passive timer. It never spawns threads and owns no
//! clock: the host polls [`due`](Autoplay::due) with its own monotonic
//! millisecond timestamps, usually through
//! [`GalleryState::update`](crate::GalleryState::update), matching the
//! event-driven model of the rest of the crate.

/// Default slideshow interval
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 4000;

/// Shortest allowed slideshow interval
pub const MIN_AUTOPLAY_INTERVAL_MS: u64 = 10;

/// Poll-driven slideshow timer
#[derive(Debug, Clone)]
pub struct Autoplay {
    interval_ms: u64,
    running: bool,
    next_due_ms: u64,
}

impl Autoplay {
    /// Timer with the given interval, stopped
    ///
    /// Intervals below [`MIN_AUTOPLAY_INTERVAL_MS`] are clamped up.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: checked_interval(interval_ms),
            running: false,
            next_due_ms: 0,
        }
    }

    /// Start ticking; the first tick is one interval after `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.running = true;
        self.next_due_ms = now_ms.saturating_add(self.interval_ms);
    }

    /// Stop ticking
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the timer is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current interval
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Change the interval; takes effect from the next rearm
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = checked_interval(interval_ms);
    }

    /// Whether a tick is due; rearms the timer when it is
    ///
    /// At most one tick fires per call. A late poll schedules the next tick
    /// one interval after `now_ms` rather than bursting to catch up.
    pub fn due(&mut self, now_ms: u64) -> bool {
        if !self.running || now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms.saturating_add(self.interval_ms);
        true
    }
}

fn checked_interval(interval_ms: u64) -> u64 {
    if interval_ms < MIN_AUTOPLAY_INTERVAL_MS {
        tracing::warn!(
            requested = interval_ms,
            min = MIN_AUTOPLAY_INTERVAL_MS,
            "slideshow interval below minimum, clamping"
        );
        MIN_AUTOPLAY_INTERVAL_MS
    } else {
        interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_respects_interval() {
        let mut autoplay = Autoplay::new(100);
        autoplay.start(0);

        assert!(!autoplay.due(50));
        assert!(autoplay.due(100));
        assert!(!autoplay.due(150));
        assert!(autoplay.due(200));
    }

    #[test]
    fn test_not_due_when_stopped() {
        let mut autoplay = Autoplay::new(100);
        assert!(!autoplay.due(1000));

        autoplay.start(0);
        autoplay.stop();
        assert!(!autoplay.due(1000));
    }

    #[test]
    fn test_late_poll_fires_single_tick() {
        let mut autoplay = Autoplay::new(100);
        autoplay.start(0);

        // Five intervals late still yields exactly one tick.
        assert!(autoplay.due(500));
        assert!(!autoplay.due(501));
        assert!(!autoplay.due(599));
        assert!(autoplay.due(600));
    }

    #[test]
    fn test_interval_clamped_to_minimum() {
        let autoplay = Autoplay::new(0);
        assert_eq!(autoplay.interval_ms(), MIN_AUTOPLAY_INTERVAL_MS);

        let mut autoplay = Autoplay::new(100);
        autoplay.set_interval(3);
        assert_eq!(autoplay.interval_ms(), MIN_AUTOPLAY_INTERVAL_MS);
    }

    #[test]
    fn test_restart_rearms_from_now() {
        let mut autoplay = Autoplay::new(100);
        autoplay.start(0);
        assert!(autoplay.due(100));

        autoplay.start(1000);
        assert!(!autoplay.due(1050));
        assert!(autoplay.due(1100));
    }
}
