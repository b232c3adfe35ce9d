// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lesson files: a JSON description of one lesson and its recorded entries.

use klassenbuch::LessonAttendance;
use klassenbuch_domain::{
    ActorId, AttendanceEntry, AttendanceRecord, ClockTime, DomainError, LessonId, LessonSlot,
    LessonWindow, StudentId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};
use tracing::debug;

/// Attribution for excuses that arrive through a lesson file.
const IMPORT_ACTOR: &str = "klassenbuch-import";

/// Errors raised while loading command-line input.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not a valid lesson file.
    #[error("Failed to parse lesson file: {0}")]
    Json(#[from] serde_json::Error),

    /// The lesson date is not `YYYY-MM-DD`.
    #[error("Invalid lesson date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A timestamp argument is not `YYYY-MM-DDTHH:MM`.
    #[error("Invalid timestamp '{0}': expected YYYY-MM-DDTHH:MM")]
    InvalidTimestamp(String),

    /// An entry names a student who is not in the lesson.
    #[error("Entry for '{0}' does not match any student of the lesson")]
    UnknownStudent(StudentId),

    /// The lesson or one of its entries breaks a domain rule.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// The on-disk shape of a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonFile {
    /// The lesson identifier.
    pub lesson_id: LessonId,
    /// The lesson date, `YYYY-MM-DD`.
    pub date: String,
    /// Lesson start.
    pub start: ClockTime,
    /// Lesson end.
    pub end: ClockTime,
    /// Every student expected in the lesson.
    pub students: Vec<StudentId>,
    /// Recorded entries, keyed by student.
    #[serde(default)]
    pub entries: BTreeMap<StudentId, AttendanceRecord>,
    /// The stored annotation text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl LessonFile {
    /// Reads and parses a lesson file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let raw: String = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "Read lesson file");
        Ok(serde_json::from_str(&raw)?)
    }

    /// Builds the lesson's attendance state.
    ///
    /// Late entries are re-validated against the lesson window and their
    /// lateness is recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The date or lesson window is invalid
    /// - An entry names a student who is not in the lesson
    /// - An entry breaks a domain rule
    pub fn into_attendance(self, loaded_at: Timestamp) -> Result<LessonAttendance, LoadError> {
        let window: LessonWindow = LessonWindow::new(self.start, self.end)?;
        let slot: LessonSlot = LessonSlot::new(self.lesson_id, parse_date(&self.date)?, window);
        let importer: ActorId = ActorId::new(IMPORT_ACTOR);

        let mut state: LessonAttendance = LessonAttendance::new(slot, self.students);
        for (student, record) in self.entries {
            if !state.has_student(&student) {
                return Err(LoadError::UnknownStudent(student));
            }
            let entry: AttendanceEntry = record.into_entry(&window, &importer, loaded_at)?;
            state.roster.insert(student, entry);
        }
        state.annotation = self.annotation;
        Ok(state)
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `LoadError::InvalidDate` on malformed input.
pub fn parse_date(raw: &str) -> Result<Date, LoadError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| LoadError::InvalidDate(raw.to_string()))
}

/// Parses a `YYYY-MM-DDTHH:MM` timestamp.
///
/// # Errors
///
/// Returns `LoadError::InvalidTimestamp` on malformed input.
pub fn parse_now(raw: &str) -> Result<Timestamp, LoadError> {
    PrimitiveDateTime::parse(
        raw.trim(),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    )
    .map_err(|_| LoadError::InvalidTimestamp(raw.to_string()))
}
