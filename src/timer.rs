/// Timer module driving the countdown display
use std::time::Duration;

use crate::clock::Clock;
use crate::duration::format_duration;
use crate::error::{CountdownError, Result};
use crate::screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    /// The clock was already past the end when it was read.
    Expired,
    /// The clock landed exactly on the end.
    Done,
}

/// One countdown run: how long, how often to redraw, and what to show.
#[derive(Debug, Clone)]
pub struct Countdown {
    pub duration: Duration,
    pub refresh: Duration,
    pub text: String,
}

impl Countdown {
    /// Counts down until the end time passes, then prints the completion
    /// message. Returns the state the loop finished in.
    pub fn run(&self, clock: &mut impl Clock, screen: &mut impl Screen) -> Result<TimerState> {
        let start = clock.now();
        let end = start.checked_add(self.duration).ok_or_else(|| {
            CountdownError::InvalidArgument(format!(
                "duration of {} seconds is too large",
                self.duration.as_secs()
            ))
        })?;
        let total = format_duration(self.duration);

        let mut state = TimerState::Running;
        while state == TimerState::Running {
            let current = clock.now();
            state = match end.checked_duration_since(current) {
                None => TimerState::Expired,
                Some(remaining) if remaining.is_zero() => TimerState::Done,
                Some(remaining) => {
                    screen.clear()?;
                    screen.print(&format!(
                        "{} remaining of {}",
                        format_duration(remaining),
                        total
                    ))?;
                    if !self.text.is_empty() {
                        screen.print(&format!("\n{}", self.text))?;
                    }
                    clock.sleep(next_sleep(self.refresh, remaining));
                    TimerState::Running
                }
            };
        }

        log::debug!("countdown finished in state {:?}", state);
        screen.clear()?;
        screen.print(&format!(
            "completed timer for {} seconds",
            self.duration.as_secs()
        ))?;
        Ok(state)
    }
}

/// Sleep a full refresh interval, or just long enough to reach the end
/// (never less than a second) when that comes first.
fn next_sleep(refresh: Duration, remaining: Duration) -> Duration {
    refresh.min(remaining.max(Duration::from_secs(1)))
}
