//! Rate limiting for live drag updates.
//!
//! A drag or resize gesture produces far more pointer events than the
//! engine needs to see. Live (non-committing) updates go through a
//! [`LiveUpdateThrottle`]; the final commit of a gesture always bypasses it.

/// Nanosecond timestamp supplied by the event source.
pub type TimestampNs = u64;

/// Throttle controller for live preview updates.
#[derive(Debug, Clone)]
pub struct LiveUpdateThrottle {
    target_interval_ns: u64,
    last_tick_ns: Option<TimestampNs>,
}

impl LiveUpdateThrottle {
    /// Create a throttle targeting the given Hz rate. Zero disables throttling.
    pub fn new(target_hz: u32) -> Self {
        let target_interval_ns = if target_hz == 0 {
            0
        } else {
            1_000_000_000 / target_hz as u64
        };
        Self {
            target_interval_ns,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next live update.
    /// Returns true and updates internal state if ready.
    /// The first call after a reset always returns true.
    pub fn should_tick(&mut self, current_ns: TimestampNs) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last.saturating_add(self.target_interval_ns) => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    /// Forget the last tick, e.g. when a new gesture begins.
    pub fn reset(&mut self) {
        self.last_tick_ns = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_interval() {
        let mut ctrl = LiveUpdateThrottle::new(60);
        assert!(ctrl.should_tick(0)); // first tick always fires
        assert!(!ctrl.should_tick(1_000_000)); // 1ms later, too soon
        assert!(ctrl.should_tick(17_000_000)); // ~17ms later (60Hz ~ 16.67ms)
    }

    #[test]
    fn test_zero_rate_never_throttles() {
        let mut ctrl = LiveUpdateThrottle::new(0);
        assert!(ctrl.should_tick(5));
        assert!(ctrl.should_tick(5));
        assert!(ctrl.should_tick(6));
    }

    #[test]
    fn test_reset_allows_immediate_tick() {
        let mut ctrl = LiveUpdateThrottle::new(10);
        assert!(ctrl.should_tick(1_000));
        assert!(!ctrl.should_tick(2_000));
        ctrl.reset();
        assert!(ctrl.should_tick(2_000));
    }
}
