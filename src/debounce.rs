//! Last-write-wins delay used for automatic fit-to-view and edit re-rendering.

/// Holds at most one pending value until its delay has elapsed.
///
/// Times are seconds on any monotonic clock; the UI passes egui's input time.
/// Scheduling again before the delay elapses replaces the pending value and
/// restarts the delay.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: f64,
    pending: Option<(f64, T)>,
}

impl<T> Debouncer<T> {
    /// Creates an idle debouncer with the given delay in seconds.
    pub fn new(delay: f64) -> Self {
        Self { delay, pending: None }
    }

    /// Schedules `value` to fire `delay` seconds after `now`.
    pub fn schedule(&mut self, now: f64, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    /// Returns the pending value once its deadline has passed.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    /// Seconds until the pending value fires, if any.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.pending
            .as_ref()
            .map(|(deadline, _)| (deadline - now).max(0.0))
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay_once() {
        let mut debouncer = Debouncer::new(0.3);
        debouncer.schedule(1.0, "a");
        assert_eq!(debouncer.poll(1.2), None);
        assert_eq!(debouncer.poll(1.4), Some("a"));
        assert_eq!(debouncer.poll(5.0), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn last_write_wins() {
        let mut debouncer = Debouncer::new(0.1);
        debouncer.schedule(0.0, 1);
        debouncer.schedule(0.05, 2);
        debouncer.schedule(0.08, 3);
        // the first deadline has passed but was superseded
        assert_eq!(debouncer.poll(0.12), None);
        assert_eq!(debouncer.poll(0.2), Some(3));
        assert_eq!(debouncer.poll(1.0), None);
    }

    #[test]
    fn cancel_and_remaining() {
        let mut debouncer = Debouncer::new(0.5);
        assert_eq!(debouncer.remaining(0.0), None);
        debouncer.schedule(1.0, ());
        assert_eq!(debouncer.remaining(1.25), Some(0.25));
        assert_eq!(debouncer.remaining(9.0), Some(0.0));
        debouncer.cancel();
        assert_eq!(debouncer.poll(9.0), None);
    }
}
