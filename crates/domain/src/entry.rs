// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-student attendance entries and excuse records.

use crate::error::DomainError;
use crate::time_bounds::validate_arrival;
use crate::types::{ActorId, ClockTime, LessonWindow, StudentId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A lesson's attendance roster: one entry per recorded student.
///
/// Rosters are replaced, never edited in place.
pub type Roster = BTreeMap<StudentId, AttendanceEntry>;

/// A single change to an excuse's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcuseEdit {
    /// Who made the edit.
    pub editor_id: ActorId,
    /// Display name of the editor at the time of the edit.
    pub editor_name: String,
    /// When the edit was made.
    pub timestamp: Timestamp,
    /// The excuse text immediately before this edit.
    pub previous_text: String,
}

/// An excuse attached to an absence or late arrival.
///
/// `edit_history` is append-only. Each edit's `previous_text` is the text that
/// was current right before it, so the full history can always be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcuseInfo {
    /// The current excuse text.
    pub text: String,
    /// Who first recorded the excuse.
    pub created_by: ActorId,
    /// When the excuse was first recorded.
    pub created_at: Timestamp,
    /// Prior edits, oldest first.
    pub edit_history: Vec<ExcuseEdit>,
}

impl ExcuseInfo {
    /// Creates a new excuse with an empty edit history.
    #[must_use]
    pub const fn new(text: String, created_by: ActorId, created_at: Timestamp) -> Self {
        Self {
            text,
            created_by,
            created_at,
            edit_history: Vec::new(),
        }
    }

    /// Returns every text this excuse has had, oldest first, ending with the
    /// current text.
    #[must_use]
    pub fn text_history(&self) -> Vec<&str> {
        self.edit_history
            .iter()
            .map(|edit| edit.previous_text.as_str())
            .chain(std::iter::once(self.text.as_str()))
            .collect()
    }

    /// Returns the most recent edit, if any.
    #[must_use]
    pub fn last_edit(&self) -> Option<&ExcuseEdit> {
        self.edit_history.last()
    }
}

/// The recorded attendance of one student in one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum AttendanceEntry {
    /// The student attended the whole lesson.
    Present,
    /// The student arrived after the lesson started.
    Late {
        /// Minutes after the lesson start, at least 1.
        minutes_late: u16,
        /// When the student arrived.
        arrival_time: ClockTime,
        /// Present when the late arrival has been excused.
        excuse: Option<ExcuseInfo>,
    },
    /// The student was absent with an excuse.
    Excused {
        /// The excuse record.
        excuse_info: ExcuseInfo,
    },
    /// The student was absent without an excuse.
    Unexcused {
        /// Optional note on the absence.
        reason: Option<String>,
    },
}

impl AttendanceEntry {
    /// Returns the status tag of this entry.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Late { .. } => "late",
            Self::Excused { .. } => "excused",
            Self::Unexcused { .. } => "unexcused",
        }
    }

    /// Returns whether a late arrival has been excused.
    ///
    /// Always false for non-late entries.
    #[must_use]
    pub const fn late_excused(&self) -> bool {
        matches!(self, Self::Late { excuse: Some(_), .. })
    }

    /// Returns the excuse attached to this entry, if any.
    #[must_use]
    pub const fn excuse(&self) -> Option<&ExcuseInfo> {
        match self {
            Self::Late { excuse, .. } => excuse.as_ref(),
            Self::Excused { excuse_info } => Some(excuse_info),
            Self::Present | Self::Unexcused { .. } => None,
        }
    }
}

/// The external shape of an attendance entry.
///
/// This is what callers send and receive. Provenance of excuses is not part of
/// the wire shape; it is attached when the record is turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum AttendanceRecord {
    /// `{ "status": "present" }`
    Present,
    /// `{ "status": "late", "minutesLate": n, "arrivalTime": "HH:MM", "lateExcused": b }`
    Late {
        /// Ignored on input; lateness is recomputed from `arrival_time`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minutes_late: Option<u16>,
        /// The arrival time.
        arrival_time: ClockTime,
        /// Whether the late arrival is excused.
        #[serde(default)]
        late_excused: bool,
        /// Excuse text for an excused late arrival.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        excuse_reason: Option<String>,
    },
    /// `{ "status": "excused", "excuseReason": "…" }`
    Excused {
        /// The excuse text.
        excuse_reason: String,
    },
    /// `{ "status": "unexcused" }`
    Unexcused,
}

impl AttendanceRecord {
    /// Turns an external record into a validated entry.
    ///
    /// Lateness is derived from the arrival time. Excuses are attributed to
    /// `actor` at `recorded_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A late arrival lies outside the lesson window
    /// - An excuse is required but its text is empty
    pub fn into_entry(
        self,
        window: &LessonWindow,
        actor: &ActorId,
        recorded_at: Timestamp,
    ) -> Result<AttendanceEntry, DomainError> {
        match self {
            Self::Present => Ok(AttendanceEntry::Present),
            Self::Late {
                arrival_time,
                late_excused,
                excuse_reason,
                ..
            } => {
                let minutes_late: u16 = validate_arrival(arrival_time, window)?;
                let excuse: Option<ExcuseInfo> = if late_excused {
                    let text: String = non_empty_excuse(excuse_reason.as_deref().unwrap_or(""))?;
                    Some(ExcuseInfo::new(text, actor.clone(), recorded_at))
                } else {
                    None
                };
                Ok(AttendanceEntry::Late {
                    minutes_late,
                    arrival_time,
                    excuse,
                })
            }
            Self::Excused { excuse_reason } => {
                let text: String = non_empty_excuse(&excuse_reason)?;
                Ok(AttendanceEntry::Excused {
                    excuse_info: ExcuseInfo::new(text, actor.clone(), recorded_at),
                })
            }
            Self::Unexcused => Ok(AttendanceEntry::Unexcused { reason: None }),
        }
    }
}

impl From<&AttendanceEntry> for AttendanceRecord {
    fn from(entry: &AttendanceEntry) -> Self {
        match entry {
            AttendanceEntry::Present => Self::Present,
            AttendanceEntry::Late {
                minutes_late,
                arrival_time,
                excuse,
            } => Self::Late {
                minutes_late: Some(*minutes_late),
                arrival_time: *arrival_time,
                late_excused: excuse.is_some(),
                excuse_reason: excuse.as_ref().map(|info| info.text.clone()),
            },
            AttendanceEntry::Excused { excuse_info } => Self::Excused {
                excuse_reason: excuse_info.text.clone(),
            },
            AttendanceEntry::Unexcused { .. } => Self::Unexcused,
        }
    }
}

/// Trims excuse text and rejects it when nothing is left.
///
/// # Errors
///
/// Returns `DomainError::EmptyExcuseText` for blank input.
pub fn non_empty_excuse(text: &str) -> Result<String, DomainError> {
    let trimmed: &str = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyExcuseText);
    }
    Ok(trimmed.to_string())
}
