// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Arrival time validation against lesson bounds.
//!
//! A late arrival must lie strictly inside the lesson window: arriving exactly
//! at the start is not late, arriving at the end is not an arrival.

use crate::error::{Bound, DomainError};
use crate::types::{ClockTime, LessonWindow};

/// Returns whether `time` lies strictly inside the lesson window.
#[must_use]
pub fn is_within_bounds(time: ClockTime, window: &LessonWindow) -> bool {
    window.start() < time && time < window.end()
}

/// Computes how many minutes after the lesson start `time` is.
///
/// The result is always in `[1, duration - 1]`. For a one-minute lesson, where
/// no valid arrival exists, the result is `1`.
#[must_use]
pub fn minutes_late(time: ClockTime, window: &LessonWindow) -> u16 {
    let raw: u16 = time
        .minutes_since_midnight()
        .saturating_sub(window.start().minutes_since_midnight());
    let ceiling: u16 = window.duration_minutes().saturating_sub(1);

    raw.min(ceiling).max(1)
}

/// Validates an arrival time and returns its lateness in minutes.
///
/// # Errors
///
/// Returns `DomainError::OutOfBounds` if the time is at or before the lesson
/// start, or at or after the lesson end.
pub fn validate_arrival(time: ClockTime, window: &LessonWindow) -> Result<u16, DomainError> {
    if time <= window.start() {
        return Err(DomainError::OutOfBounds {
            bound: Bound::TooEarly,
            time,
            window: *window,
        });
    }
    if time >= window.end() {
        return Err(DomainError::OutOfBounds {
            bound: Bound::TooLate,
            time,
            window: *window,
        });
    }

    Ok(minutes_late(time, window))
}

/// Parses a raw `HH:MM` arrival and validates it against the lesson window.
///
/// # Errors
///
/// Returns `DomainError::MalformedTime` if the input cannot be parsed, or
/// `DomainError::OutOfBounds` if the parsed time falls outside the window.
pub fn parse_arrival(raw: &str, window: &LessonWindow) -> Result<(ClockTime, u16), DomainError> {
    let time: ClockTime = raw.parse()?;
    let late_by: u16 = validate_arrival(time, window)?;
    Ok((time, late_by))
}
