/// Duration parsing and display for the countdown timer
use std::time::Duration;

use clap::ValueEnum;

use crate::error::{CountdownError, DurationError, Result};

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Unit accepted by `--unit` for a plain integer `TIME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BareUnit {
    #[value(name = "h")]
    Hours,
    #[value(name = "m")]
    Minutes,
    #[value(name = "s")]
    Seconds,
}

impl BareUnit {
    pub fn multiplier(self) -> u64 {
        match self {
            BareUnit::Hours => SECONDS_PER_HOUR,
            BareUnit::Minutes => SECONDS_PER_MINUTE,
            BareUnit::Seconds => 1,
        }
    }
}

/// Multiplier for a unit letter in a compound expression.
fn unit_multiplier(unit: char) -> Option<u64> {
    match unit {
        'd' => Some(SECONDS_PER_DAY),
        'h' => Some(SECONDS_PER_HOUR),
        'm' => Some(SECONDS_PER_MINUTE),
        's' => Some(1),
        _ => None,
    }
}

/// Converts a plain integer in the given unit to seconds.
pub fn to_seconds(value: u64, unit: BareUnit) -> std::result::Result<u64, DurationError> {
    value
        .checked_mul(unit.multiplier())
        .ok_or(DurationError::Overflow)
}

enum ScanState {
    /// Waiting for the first digit of a segment.
    Idle,
    /// Digits seen, waiting for the unit that commits them.
    Number(u64),
}

/// Parses a compound expression such as `1d2h30m15s` into whole seconds.
///
/// Unit letters are case-insensitive and may repeat or appear in any order;
/// `1m1m` is two minutes. Surrounding whitespace is ignored.
pub fn parse_time_string(s: &str) -> std::result::Result<u64, DurationError> {
    let mut total: u64 = 0;
    let mut state = ScanState::Idle;

    for ch in s.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        state = match (state, ch.to_digit(10)) {
            (ScanState::Idle, Some(digit)) => ScanState::Number(u64::from(digit)),
            (ScanState::Number(n), Some(digit)) => ScanState::Number(
                n.checked_mul(10)
                    .and_then(|n| n.checked_add(u64::from(digit)))
                    .ok_or(DurationError::Overflow)?,
            ),
            (state, None) => {
                let multiplier = unit_multiplier(ch).ok_or(DurationError::InvalidCharacter(ch))?;
                let ScanState::Number(n) = state else {
                    return Err(DurationError::MissingNumber(ch));
                };
                let segment = n.checked_mul(multiplier).ok_or(DurationError::Overflow)?;
                total = total.checked_add(segment).ok_or(DurationError::Overflow)?;
                ScanState::Idle
            }
        };
    }

    if let ScanState::Number(_) = state {
        return Err(DurationError::MissingUnit);
    }
    if total == 0 {
        return Err(DurationError::Zero);
    }
    Ok(total)
}

/// Resolves the `TIME` argument and optional `--unit` into total seconds.
///
/// An all-digit `TIME` is a plain integer in `unit` (seconds when absent).
/// Anything else is a compound expression, which must not carry a unit.
pub fn resolve(input: &str, unit: Option<BareUnit>) -> Result<Duration> {
    let seconds = if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        let value: u64 = input.parse().map_err(|_| {
            CountdownError::InvalidArgument(format!("duration '{}' is too large", input))
        })?;
        if value == 0 {
            return Err(CountdownError::InvalidArgument(
                "duration must be greater than zero".to_string(),
            ));
        }
        let unit = unit.unwrap_or(BareUnit::Seconds);
        to_seconds(value, unit).map_err(|e| CountdownError::malformed(input, e))?
    } else {
        if unit.is_some() {
            return Err(CountdownError::ConflictingUnitSpecification {
                input: input.to_string(),
            });
        }
        parse_time_string(input).map_err(|e| CountdownError::malformed(input, e))?
    };
    Ok(Duration::from_secs(seconds))
}

/// Renders whole seconds as `[<days>d]HHhMMmSSs`; sub-second parts are dropped.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let days = secs / SECONDS_PER_DAY;
    let hours = (secs % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = secs % SECONDS_PER_MINUTE;

    let short = format!("{:02}h{:02}m{:02}s", hours, minutes, seconds);
    if days > 0 {
        format!("{}d{}", days, short)
    } else {
        short
    }
}
