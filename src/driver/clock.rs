// clock.rs - Frame timing
//
// Timestamps come from requestAnimationFrame (ms, monotonic in practice).
// Elapsed time is clamped at zero in case the host hands back an older one.

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Anchor the next `tick` at `now`, e.g. when the loop (re)starts.
    pub fn reset(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Milliseconds since the previous tick. The first tick after
    /// construction reports zero.
    pub fn tick(&mut self, now: f64) -> f64 {
        let elapsed = match self.last {
            Some(last) if now.is_finite() => (now - last).max(0.0),
            _ => 0.0,
        };
        if now.is_finite() {
            self.last = Some(now);
        }
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1234.0), 0.0);
        assert_eq!(clock.tick(1250.5), 16.5);
    }

    #[test]
    fn reset_anchors_next_tick() {
        let mut clock = FrameClock::new();
        clock.reset(100.0);
        assert_eq!(clock.tick(133.0), 33.0);
    }

    #[test]
    fn backwards_time_is_clamped() {
        let mut clock = FrameClock::new();
        clock.reset(500.0);
        assert_eq!(clock.tick(480.0), 0.0);
        assert_eq!(clock.tick(490.0), 10.0);
    }

    #[test]
    fn non_finite_timestamps_are_ignored() {
        let mut clock = FrameClock::new();
        clock.reset(10.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.tick(20.0), 10.0);
    }
}
