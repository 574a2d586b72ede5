use std::time::{Duration, Instant};

/// Input debounce as explicit state: the timestamp of the last accepted
/// input, compared against the tick time. Replaces hidden function-local
/// timers so the window is visible and testable.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    window: Duration,
    last: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Accepts an input at `now` unless it falls inside the window opened by
    /// the previously accepted one. Accepting re-opens the window.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
