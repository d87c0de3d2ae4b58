// debounce.rs - Trailing-edge debounce keyed on timestamps
//
// Each trigger replaces the pending value and pushes the deadline out.
// The owner polls with the current time; the value fires once.

#[derive(Debug)]
pub struct Debounce<T> {
    delay_ms: f64,
    pending: Option<(f64, T)>,
}

impl<T> Debounce<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self { delay_ms, pending: None }
    }

    /// Schedule `value` for `now + delay`, cancelling anything pending.
    pub fn trigger(&mut self, now: f64, value: T) {
        self.pending = Some((now + self.delay_ms, value));
    }

    /// Take the value if its quiet period has elapsed.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if now >= deadline => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    /// Take the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
