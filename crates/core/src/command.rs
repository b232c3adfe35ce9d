// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tallies::AbsenceUnit;
use klassenbuch_domain::{AttendanceRecord, LessonWindow, StudentId};
use std::collections::BTreeMap;

/// A command represents user intent for one lesson as data only.
///
/// Commands are the only way to request lesson state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record or replace one student's entry.
    RecordEntry {
        /// The student.
        student: StudentId,
        /// The entry in its external shape.
        entry: AttendanceRecord,
    },
    /// Replace the whole roster. Either every record is valid or nothing changes.
    RecordAll {
        /// One record per student.
        entries: BTreeMap<StudentId, AttendanceRecord>,
    },
    /// Mark every student on the roster present.
    MarkAllPresent,
    /// Mark every student on the roster late with the default arrival time.
    MarkAllLate,
    /// Excuse a student's absence or late arrival.
    GrantExcuse {
        /// The student.
        student: StudentId,
        /// The excuse text.
        text: String,
    },
    /// Change the text of an existing excuse.
    EditExcuse {
        /// The student.
        student: StudentId,
        /// The new excuse text.
        text: String,
    },
    /// Undo or delete an excuse.
    RevokeExcuse {
        /// The student.
        student: StudentId,
    },
    /// Excuse a late arrival while keeping it late.
    GrantLateExcuse {
        /// The student.
        student: StudentId,
        /// The excuse text.
        text: String,
    },
    /// Remove the excuse from a late arrival.
    RevokeLateExcuse {
        /// The student.
        student: StudentId,
    },
    /// Excuse an unexcused absence and move the aggregate count with it.
    ConvertToExcused {
        /// The student.
        student: StudentId,
        /// The excuse text.
        text: String,
        /// Whether the absence counts as a lesson or a whole day.
        unit: AbsenceUnit,
    },
    /// Replace the free-text body of the lesson annotation.
    SaveNote {
        /// The new body.
        body: String,
    },
    /// Move the lesson to new time bounds and reconcile late arrivals.
    RescheduleLesson {
        /// The new lesson window.
        window: LessonWindow,
    },
}

impl Command {
    /// Returns the action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RecordEntry { .. } => "RecordEntry",
            Self::RecordAll { .. } => "RecordAll",
            Self::MarkAllPresent => "MarkAllPresent",
            Self::MarkAllLate => "MarkAllLate",
            Self::GrantExcuse { .. } => "GrantExcuse",
            Self::EditExcuse { .. } => "EditExcuse",
            Self::RevokeExcuse { .. } => "RevokeExcuse",
            Self::GrantLateExcuse { .. } => "GrantLateExcuse",
            Self::RevokeLateExcuse { .. } => "RevokeLateExcuse",
            Self::ConvertToExcused { .. } => "ConvertToExcused",
            Self::SaveNote { .. } => "SaveNote",
            Self::RescheduleLesson { .. } => "RescheduleLesson",
        }
    }

    /// Returns whether applying this command re-stamps the annotation header.
    ///
    /// Every save of attendance or of the note does; moving the lesson does not.
    #[must_use]
    pub const fn stamps_annotation(&self) -> bool {
        !matches!(self, Self::RescheduleLesson { .. })
    }
}
