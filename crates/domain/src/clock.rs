// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Clock abstraction.
//!
//! Every lifecycle operation receives the current time explicitly. Library
//! code never reads ambient time; callers pick a `Clock` at the boundary.

use crate::error::DomainError;
use crate::types::Timestamp;
use chrono::{Datelike, Timelike, Utc};
use chrono_tz::Tz;

/// A source of school-local wall-clock time.
pub trait Clock {
    /// Returns the current school-local time.
    fn now(&self) -> Timestamp;
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// The system clock, converted into the school's declared timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a system clock for the named IANA timezone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not a known timezone.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { tz })
    }

    /// Returns the timezone this clock reports in.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        to_timestamp(Utc::now().with_timezone(&self.tz).naive_local())
    }
}

/// Converts a chrono wall-clock value into a `Timestamp`.
///
/// chrono's calendar is wider than `time`'s; values outside the supported
/// range clamp to the nearest representable instant.
#[must_use]
pub fn to_timestamp(local: chrono::NaiveDateTime) -> Timestamp {
    let month: time::Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .unwrap_or(time::Month::January);
    let day: u8 = u8::try_from(local.day()).unwrap_or(1);

    let date: time::Date = time::Date::from_calendar_date(local.year(), month, day)
        .unwrap_or(if local.year() < 0 {
            time::Date::MIN
        } else {
            time::Date::MAX
        });

    let clock: time::Time = time::Time::from_hms(
        u8::try_from(local.hour()).unwrap_or(0),
        u8::try_from(local.minute()).unwrap_or(0),
        // Leap seconds surface as second 59.
        u8::try_from(local.second().min(59)).unwrap_or(0),
    )
    .unwrap_or(time::Time::MIDNIGHT);

    Timestamp::new(date, clock)
}
