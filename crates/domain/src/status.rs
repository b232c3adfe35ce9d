// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lesson-level attendance status.
//!
//! Status is **computed**, not stored. It is a pure function of the number of
//! recorded entries, the roster size and where the lesson stands in time, so
//! every view that uses these functions agrees with the underlying data.

use crate::entry::{AttendanceEntry, Roster};
use crate::error::DomainError;
use crate::types::LessonTiming;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aggregate attendance status of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonAttendanceStatus {
    /// Reachable, but nothing has been recorded.
    None,
    /// The lesson is over and nothing was recorded.
    Missing,
    /// Some, but not all, students have an entry.
    Incomplete,
    /// Every student on the roster has an entry.
    Complete,
    /// The lesson cannot be tracked yet.
    Future,
}

impl LessonAttendanceStatus {
    /// Returns the badge string for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Missing => "missing",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Future => "future",
        }
    }
}

impl std::fmt::Display for LessonAttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonAttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "missing" => Ok(Self::Missing),
            "incomplete" => Ok(Self::Incomplete),
            "complete" => Ok(Self::Complete),
            "future" => Ok(Self::Future),
            _ => Err(format!("Unknown lesson attendance status: {s}")),
        }
    }
}

/// Classifies a lesson from its recorded entry count.
///
/// - Not reachable: `Future`, regardless of entries.
/// - No entries: `None`.
/// - At least as many entries as students: `Complete`.
/// - Otherwise: `Incomplete`.
#[must_use]
pub const fn classify(
    recorded_count: usize,
    roster_size: usize,
    reachable: bool,
) -> LessonAttendanceStatus {
    if !reachable {
        LessonAttendanceStatus::Future
    } else if recorded_count == 0 {
        LessonAttendanceStatus::None
    } else if recorded_count >= roster_size {
        LessonAttendanceStatus::Complete
    } else {
        LessonAttendanceStatus::Incomplete
    }
}

/// Classifies a lesson using its timing instead of a plain reachability flag.
///
/// Identical to [`classify`], except that a lesson which is over with no
/// entries at all is `Missing`.
#[must_use]
pub const fn classify_timed(
    recorded_count: usize,
    roster_size: usize,
    timing: LessonTiming,
) -> LessonAttendanceStatus {
    match (timing, recorded_count) {
        (LessonTiming::Over, 0) => LessonAttendanceStatus::Missing,
        (LessonTiming::Upcoming, _) => classify(recorded_count, roster_size, false),
        (LessonTiming::Running | LessonTiming::Over, _) => {
            classify(recorded_count, roster_size, true)
        }
    }
}

/// Classifies a lesson from its roster.
#[must_use]
pub fn classify_roster(
    roster: &Roster,
    roster_size: usize,
    reachable: bool,
) -> LessonAttendanceStatus {
    classify(roster.len(), roster_size, reachable)
}

/// Recorded entries exceed the roster size.
///
/// This points at stale roster-size data rather than a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterInconsistency {
    /// The roster size the caller supplied.
    pub roster_size: usize,
    /// The number of recorded entries.
    pub recorded: usize,
}

/// Per-status counts for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryCounts {
    /// Students marked present.
    pub present: usize,
    /// Students marked late, excused or not.
    pub late: usize,
    /// Students absent with an excuse.
    pub excused: usize,
    /// Students absent without an excuse.
    pub unexcused: usize,
    /// Students without an entry. Never negative.
    pub missing: usize,
    /// Set when more entries exist than the roster holds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inconsistency: Option<RosterInconsistency>,
}

impl SummaryCounts {
    /// Returns the number of recorded entries.
    #[must_use]
    pub const fn recorded(&self) -> usize {
        self.present + self.late + self.excused + self.unexcused
    }

    /// Surfaces a roster inconsistency as an error value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RosterInconsistency` if the counts were clamped.
    pub const fn check(&self) -> Result<(), DomainError> {
        match self.inconsistency {
            Some(RosterInconsistency {
                roster_size,
                recorded,
            }) => Err(DomainError::RosterInconsistency {
                roster_size,
                recorded,
            }),
            None => Ok(()),
        }
    }
}

/// Counts entries per status.
///
/// `missing` is clamped to zero when more entries are recorded than the roster
/// holds; the overflow is reported in `inconsistency`.
#[must_use]
pub fn summary_counts(roster: &Roster, roster_size: usize) -> SummaryCounts {
    let mut counts: SummaryCounts = roster
        .values()
        .fold(SummaryCounts::default(), |mut acc, entry| {
            match entry {
                AttendanceEntry::Present => acc.present += 1,
                AttendanceEntry::Late { .. } => acc.late += 1,
                AttendanceEntry::Excused { .. } => acc.excused += 1,
                AttendanceEntry::Unexcused { .. } => acc.unexcused += 1,
            }
            acc
        });

    let recorded: usize = counts.recorded();
    counts.missing = roster_size.saturating_sub(recorded);
    if recorded > roster_size {
        counts.inconsistency = Some(RosterInconsistency {
            roster_size,
            recorded,
        });
    }

    counts
}
