// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A school-local wall-clock timestamp.
///
/// Timestamps carry no offset. The binary resolves the school's timezone once
/// at the boundary (see `SystemClock`).
pub type Timestamp = time::PrimitiveDateTime;

/// Defines a string identifier newtype with the shared accessor surface.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifies a student within a lesson roster.
    StudentId
);

string_id!(
    /// Identifies a single lesson instance.
    LessonId
);

string_id!(
    /// Identifies the person (or process) performing an action.
    ActorId
);

/// A time of day with minute resolution.
///
/// Hours are in `[0, 23]`, minutes in `[0, 59]`. Ordering follows the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// The last representable minute of the day.
    pub const LAST_MINUTE: Self = Self {
        hour: 23,
        minute: 59,
    };

    /// Creates a new `ClockTime`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedTime` if the hour or minute is out of range.
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::MalformedTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// Builds a `ClockTime` from minutes since midnight.
    ///
    /// Returns `None` past `23:59`.
    // Both casts are bounded by the range check.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes >= 24 * 60 {
            return None;
        }
        Some(Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        })
    }

    /// Returns the hour.
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute.
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the number of minutes since midnight.
    #[must_use]
    pub const fn minutes_since_midnight(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Adds minutes, saturating at `23:59`.
    #[must_use]
    pub const fn add_minutes(&self, minutes: u16) -> Self {
        match Self::from_minutes(self.minutes_since_midnight().saturating_add(minutes)) {
            Some(time) => time,
            None => Self::LAST_MINUTE,
        }
    }
}

impl From<time::Time> for ClockTime {
    /// Truncates seconds and below.
    fn from(value: time::Time) -> Self {
        Self {
            hour: value.hour(),
            minute: value.minute(),
        }
    }
}

impl FromStr for ClockTime {
    type Err = DomainError;

    /// Parses `HH:MM`, `H:MM` or `HH:MM:SS`. Seconds are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::MalformedTime(s.to_string());
        let trimmed: &str = s.trim();
        let mut parts = trimmed.split(':');

        let hour_part: &str = parts.next().ok_or_else(malformed)?;
        let minute_part: &str = parts.next().ok_or_else(malformed)?;
        let second_part: Option<&str> = parts.next();
        if parts.next().is_some() {
            return Err(malformed());
        }

        let is_digits = |part: &str, min: usize, max: usize| {
            (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
        };

        if !is_digits(hour_part, 1, 2) || !is_digits(minute_part, 2, 2) {
            return Err(malformed());
        }
        if let Some(seconds) = second_part
            && (!is_digits(seconds, 2, 2) || seconds > "59")
        {
            return Err(malformed());
        }

        let hour: u8 = hour_part.parse().map_err(|_| malformed())?;
        let minute: u8 = minute_part.parse().map_err(|_| malformed())?;
        Self::new(hour, minute).map_err(|_| malformed())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Deserialize)]
struct RawLessonWindow {
    start: ClockTime,
    end: ClockTime,
}

/// The time bounds of a single lesson.
///
/// Invariant: `start < end`. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLessonWindow")]
pub struct LessonWindow {
    start: ClockTime,
    end: ClockTime,
}

impl LessonWindow {
    /// Creates a new lesson window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLessonWindow` unless `start < end`.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidLessonWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the lesson start.
    #[must_use]
    pub const fn start(&self) -> ClockTime {
        self.start
    }

    /// Returns the lesson end.
    #[must_use]
    pub const fn end(&self) -> ClockTime {
        self.end
    }

    /// Returns the lesson length in minutes. Always at least 1.
    #[must_use]
    pub const fn duration_minutes(&self) -> u16 {
        self.end.minutes_since_midnight() - self.start.minutes_since_midnight()
    }
}

impl TryFrom<RawLessonWindow> for LessonWindow {
    type Error = DomainError;

    fn try_from(raw: RawLessonWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

/// Where a lesson stands relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonTiming {
    /// The lesson has not started yet.
    Upcoming,
    /// The lesson is in progress.
    Running,
    /// The lesson has ended.
    Over,
}

/// A lesson instance placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSlot {
    /// The lesson identifier.
    pub lesson_id: LessonId,
    /// The calendar date the lesson takes place on.
    pub date: time::Date,
    /// The lesson's time bounds on that date.
    pub window: LessonWindow,
}

impl LessonSlot {
    /// Creates a new `LessonSlot`.
    #[must_use]
    pub const fn new(lesson_id: LessonId, date: time::Date, window: LessonWindow) -> Self {
        Self {
            lesson_id,
            date,
            window,
        }
    }

    /// Places the lesson relative to `now`.
    ///
    /// The lesson is running from its start minute (inclusive) to its end
    /// minute (exclusive).
    #[must_use]
    pub fn timing(&self, now: Timestamp) -> LessonTiming {
        if now.date() < self.date {
            return LessonTiming::Upcoming;
        }
        if now.date() > self.date {
            return LessonTiming::Over;
        }

        let clock: ClockTime = ClockTime::from(now.time());
        if clock < self.window.start() {
            LessonTiming::Upcoming
        } else if clock < self.window.end() {
            LessonTiming::Running
        } else {
            LessonTiming::Over
        }
    }

    /// Returns whether attendance can be taken for this lesson yet.
    #[must_use]
    pub fn is_reachable(&self, now: Timestamp) -> bool {
        self.timing(now) != LessonTiming::Upcoming
    }
}
