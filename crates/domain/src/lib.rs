// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod clock;
mod entry;
mod error;
mod late_arrival;
mod status;
mod time_bounds;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock, to_timestamp};
pub use entry::{
    AttendanceEntry, AttendanceRecord, ExcuseEdit, ExcuseInfo, Roster, non_empty_excuse,
};
pub use error::{Bound, DomainError};
pub use late_arrival::{apply_all_late, default_late_time, reconcile_arrival, reconcile_roster};
pub use status::{
    LessonAttendanceStatus, RosterInconsistency, SummaryCounts, classify, classify_roster,
    classify_timed, summary_counts,
};
pub use time_bounds::{is_within_bounds, minutes_late, parse_arrival, validate_arrival};

// Re-export public types
pub use types::{
    ActorId, ClockTime, LessonId, LessonSlot, LessonTiming, LessonWindow, StudentId, Timestamp,
};
