// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tallies::AbsenceTallies;
use klassenbuch_audit::{Annotation, AuditEvent, StateSnapshot};
use klassenbuch_domain::{
    AttendanceEntry, LessonAttendanceStatus, LessonSlot, Roster, StudentId, SummaryCounts,
    Timestamp, classify_timed, summary_counts,
};
use std::collections::BTreeMap;
use tracing::warn;

/// The attendance record of a single lesson.
///
/// Values of this type are snapshots: transitions produce a new
/// `LessonAttendance` and never modify an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonAttendance {
    /// The lesson and its time bounds.
    pub slot: LessonSlot,
    /// Every student expected in the lesson.
    pub students: Vec<StudentId>,
    /// Recorded entries, keyed by student.
    pub roster: Roster,
    /// Aggregate absence counters per student, as loaded by the caller.
    pub tallies: BTreeMap<StudentId, AbsenceTallies>,
    /// The stored annotation text, in any supported encoding.
    pub annotation: Option<String>,
}

impl LessonAttendance {
    /// Creates an empty attendance record for a lesson.
    ///
    /// # Arguments
    ///
    /// * `slot` - The lesson this record is scoped to
    /// * `students` - The students expected in the lesson
    #[must_use]
    pub const fn new(slot: LessonSlot, students: Vec<StudentId>) -> Self {
        Self {
            slot,
            students,
            roster: BTreeMap::new(),
            tallies: BTreeMap::new(),
            annotation: None,
        }
    }

    /// Returns the number of students expected in the lesson.
    #[must_use]
    pub fn roster_size(&self) -> usize {
        self.students.len()
    }

    /// Returns whether the student is expected in this lesson.
    #[must_use]
    pub fn has_student(&self, student: &StudentId) -> bool {
        self.students.contains(student)
    }

    /// Returns the student's entry, if one has been recorded.
    #[must_use]
    pub fn entry(&self, student: &StudentId) -> Option<&AttendanceEntry> {
        self.roster.get(student)
    }

    /// Returns the student's tallies, defaulting to zero.
    #[must_use]
    pub fn tallies_for(&self, student: &StudentId) -> AbsenceTallies {
        self.tallies.get(student).copied().unwrap_or_default()
    }

    /// Computes the lesson's status badge at `now`.
    #[must_use]
    pub fn status(&self, now: Timestamp) -> LessonAttendanceStatus {
        classify_timed(self.roster.len(), self.roster_size(), self.slot.timing(now))
    }

    /// Computes per-status counts.
    ///
    /// A roster inconsistency is logged and reported in the result; it does
    /// not fail the call.
    #[must_use]
    pub fn summary(&self) -> SummaryCounts {
        let counts: SummaryCounts = summary_counts(&self.roster, self.roster_size());
        if let Some(inconsistency) = counts.inconsistency {
            warn!(
                lesson = %self.slot.lesson_id,
                roster_size = inconsistency.roster_size,
                recorded = inconsistency.recorded,
                "More attendance entries than students; roster size is stale"
            );
        }
        counts
    }

    /// Decodes the stored annotation.
    #[must_use]
    pub fn decoded_annotation(&self) -> Annotation {
        self.annotation
            .as_deref()
            .map(Annotation::decode)
            .unwrap_or_default()
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let counts: SummaryCounts = summary_counts(&self.roster, self.roster_size());
        StateSnapshot::new(format!(
            "lesson={},window={}-{},students={},present={},late={},excused={},unexcused={},missing={}",
            self.slot.lesson_id,
            self.slot.window.start(),
            self.slot.window.end(),
            self.roster_size(),
            counts.present,
            counts.late,
            counts.excused,
            counts.unexcused,
            counts.missing
        ))
    }
}

/// The result of a successful lesson transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: LessonAttendance,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Set when an excuse conversion found the aggregate counters out of step
    /// with the entries.
    pub tally_drift: bool,
}
