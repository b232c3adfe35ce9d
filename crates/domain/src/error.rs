// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{ClockTime, LessonWindow};

/// Which side of the lesson window an arrival time fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The time is at or before the lesson start.
    TooEarly,
    /// The time is at or after the lesson end.
    TooLate,
}

impl Bound {
    /// Returns the string representation of the bound.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TooEarly => "too_early",
            Self::TooLate => "too_late",
        }
    }
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An arrival time lies outside the open lesson window.
    OutOfBounds {
        /// Which bound was violated.
        bound: Bound,
        /// The rejected time.
        time: ClockTime,
        /// The lesson window the time was checked against.
        window: LessonWindow,
    },
    /// A lifecycle operation was invoked on an entry in the wrong state.
    InvalidTransition {
        /// The operation that was attempted.
        operation: &'static str,
        /// The status of the entry the operation was applied to.
        from: &'static str,
    },
    /// A clock string could not be parsed.
    MalformedTime(String),
    /// A timestamp string could not be parsed.
    MalformedTimestamp(String),
    /// More entries are recorded than the roster holds.
    RosterInconsistency {
        /// The roster size the caller supplied.
        roster_size: usize,
        /// The number of recorded entries.
        recorded: usize,
    },
    /// A lesson window does not satisfy `start < end`.
    InvalidLessonWindow {
        /// The requested start.
        start: ClockTime,
        /// The requested end.
        end: ClockTime,
    },
    /// Excuse text is empty after trimming.
    EmptyExcuseText,
    /// The configured timezone is unknown.
    InvalidTimezone(String),
    /// An abbreviation cannot be written into an annotation header.
    InvalidAbbreviation(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds {
                bound: Bound::TooEarly,
                time,
                window,
            } => {
                write!(
                    f,
                    "Arrival time {time} must be after the lesson start ({})",
                    window.start()
                )
            }
            Self::OutOfBounds {
                bound: Bound::TooLate,
                time,
                window,
            } => {
                write!(
                    f,
                    "Arrival time {time} must be before the lesson end ({})",
                    window.end()
                )
            }
            Self::InvalidTransition { operation, from } => {
                write!(f, "Cannot {operation} an entry with status '{from}'")
            }
            Self::MalformedTime(raw) => write!(f, "Malformed time '{raw}': expected HH:MM"),
            Self::MalformedTimestamp(raw) => {
                write!(f, "Malformed timestamp '{raw}'")
            }
            Self::RosterInconsistency {
                roster_size,
                recorded,
            } => {
                write!(
                    f,
                    "Roster inconsistency: {recorded} entries recorded for a roster of {roster_size}"
                )
            }
            Self::InvalidLessonWindow { start, end } => {
                write!(
                    f,
                    "Invalid lesson window {start}-{end}: start must be before end"
                )
            }
            Self::EmptyExcuseText => write!(f, "Excuse text cannot be empty"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::InvalidAbbreviation(raw) => write!(
                f,
                "Invalid abbreviation '{raw}': must be non-empty, without ';' or line breaks"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
