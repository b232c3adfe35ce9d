// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Default and fallback arrival times for late students.
//!
//! All functions here are pure given the lesson window and the current time.

use crate::entry::{AttendanceEntry, Roster};
use crate::time_bounds::{is_within_bounds, minutes_late};
use crate::types::{ClockTime, LessonWindow, StudentId};

/// Minutes after the lesson start used when the lesson is already over.
const ELAPSED_LESSON_OFFSET: u16 = 5;

/// Computes the arrival time suggested when a student is marked late.
///
/// - During the lesson, the current time.
/// - Before or exactly at the start, one minute after the start.
/// - At or after the end, five minutes after the start.
///
/// The result is forced into the open window; if the window is too short for
/// the chosen offset, one minute after the start is used.
#[must_use]
pub fn default_late_time(window: &LessonWindow, now: ClockTime) -> ClockTime {
    let candidate: ClockTime = if is_within_bounds(now, window) {
        now
    } else if now <= window.start() {
        window.start().add_minutes(1)
    } else {
        window.start().add_minutes(ELAPSED_LESSON_OFFSET)
    };

    if is_within_bounds(candidate, window) {
        candidate
    } else {
        window.start().add_minutes(1)
    }
}

/// Keeps an existing arrival time if it is still valid for the window,
/// otherwise falls back to [`default_late_time`].
#[must_use]
pub fn reconcile_arrival(
    existing: Option<ClockTime>,
    window: &LessonWindow,
    now: ClockTime,
) -> ClockTime {
    match existing {
        Some(arrival) if is_within_bounds(arrival, window) => arrival,
        _ => default_late_time(window, now),
    }
}

/// Marks every student late with the same resolved default arrival time.
#[must_use]
pub fn apply_all_late(students: &[StudentId], window: &LessonWindow, now: ClockTime) -> Roster {
    let arrival_time: ClockTime = default_late_time(window, now);
    let late_by: u16 = minutes_late(arrival_time, window);

    students
        .iter()
        .map(|student| {
            (
                student.clone(),
                AttendanceEntry::Late {
                    minutes_late: late_by,
                    arrival_time,
                    excuse: None,
                },
            )
        })
        .collect()
}

/// Re-validates late arrivals after the lesson bounds changed.
///
/// Arrival times that no longer fit are replaced with the default, and
/// lateness is recomputed for every late entry. Excuses are carried over.
#[must_use]
pub fn reconcile_roster(roster: &Roster, window: &LessonWindow, now: ClockTime) -> Roster {
    roster
        .iter()
        .map(|(student, entry)| {
            let reconciled: AttendanceEntry = match entry {
                AttendanceEntry::Late {
                    arrival_time,
                    excuse,
                    ..
                } => {
                    let arrival: ClockTime = reconcile_arrival(Some(*arrival_time), window, now);
                    AttendanceEntry::Late {
                        minutes_late: minutes_late(arrival, window),
                        arrival_time: arrival,
                        excuse: excuse.clone(),
                    }
                }
                other => other.clone(),
            };
            (student.clone(), reconciled)
        })
        .collect()
}
