// UI models module
// Click handling for the open event-details panel

use std::time::{Duration, Instant};

/// Window within which a second click counts as a double click.
pub const DOUBLE_CLICK_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickState {
    #[default]
    Idle,
    /// A details panel is showing
    Open,
    /// A click landed while the panel was open; waiting to see if a second follows
    AwaitingSecondClick { since: Instant },
}

/// What a click (or its expiry) resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing to do yet
    Pending,
    /// Nothing was open
    Ignored,
    /// The panel closes and the month is laid out again in natural order
    SingleClick,
    /// The panel closes without a relayout
    DoubleClick,
}

/// Tells single from double clicks while an event's details are open.
///
/// Time is passed in by the caller so the tracker has no clock of its own.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    state: ClickState,
    delay: Duration,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_DELAY)
    }
}

impl ClickTracker {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: ClickState::Idle,
            delay,
        }
    }

    pub fn state(&self) -> ClickState {
        self.state
    }

    /// A details panel was opened.
    pub fn open(&mut self) {
        self.state = ClickState::Open;
    }

    /// Register a click. A waiting click whose delay already ran out is
    /// reported as a single click; the panel is closed by then so the new
    /// click has nothing to act on.
    pub fn click(&mut self, now: Instant) -> ClickOutcome {
        if let Some(expired) = self.poll(now) {
            return expired;
        }

        match self.state {
            ClickState::Idle => ClickOutcome::Ignored,
            ClickState::Open => {
                self.state = ClickState::AwaitingSecondClick { since: now };
                ClickOutcome::Pending
            }
            ClickState::AwaitingSecondClick { .. } => {
                self.state = ClickState::Idle;
                ClickOutcome::DoubleClick
            }
        }
    }

    /// Resolve a waiting click once the delay has passed.
    pub fn poll(&mut self, now: Instant) -> Option<ClickOutcome> {
        match self.state {
            ClickState::AwaitingSecondClick { since }
                if now.saturating_duration_since(since) >= self.delay =>
            {
                self.state = ClickState::Idle;
                Some(ClickOutcome::SingleClick)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_without_open_panel_is_ignored() {
        let mut tracker = ClickTracker::default();
        assert_eq!(tracker.click(Instant::now()), ClickOutcome::Ignored);
        assert_eq!(tracker.state(), ClickState::Idle);
    }

    #[test]
    fn test_single_click_resolves_after_delay() {
        let mut tracker = ClickTracker::default();
        let start = Instant::now();
        tracker.open();

        assert_eq!(tracker.click(start), ClickOutcome::Pending);
        assert_eq!(tracker.poll(start + Duration::from_millis(50)), None);
        assert_eq!(
            tracker.poll(start + DOUBLE_CLICK_DELAY),
            Some(ClickOutcome::SingleClick)
        );
        assert_eq!(tracker.state(), ClickState::Idle);
    }

    #[test]
    fn test_second_click_within_delay_is_double() {
        let mut tracker = ClickTracker::default();
        let start = Instant::now();
        tracker.open();

        tracker.click(start);
        assert_eq!(
            tracker.click(start + Duration::from_millis(120)),
            ClickOutcome::DoubleClick
        );
        assert_eq!(tracker.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_late_second_click_is_not_double() {
        let mut tracker = ClickTracker::default();
        let start = Instant::now();
        tracker.open();

        tracker.click(start);
        assert_eq!(
            tracker.click(start + Duration::from_millis(500)),
            ClickOutcome::SingleClick
        );
        assert_eq!(tracker.state(), ClickState::Idle);
    }
}
