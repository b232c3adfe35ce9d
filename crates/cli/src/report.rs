// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON shapes printed by the command-line tool.

use klassenbuch::LessonAttendance;
use klassenbuch_audit::{
    AnnotationFormat, DecodedAnnotation, LastEdit, ProvenanceHeader, decode, format_timestamp,
};
use klassenbuch_domain::{
    LessonAttendanceStatus, LessonId, LessonTiming, SummaryCounts, Timestamp,
};
use serde::Serialize;

/// The status of one lesson at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// The lesson identifier.
    pub lesson_id: LessonId,
    /// The lesson's attendance badge.
    pub status: LessonAttendanceStatus,
    /// Whether the lesson is upcoming, running or over.
    pub timing: LessonTiming,
    /// Number of students expected in the lesson.
    pub roster_size: usize,
    /// Counts per attendance status.
    pub summary: SummaryCounts,
    /// The decoded annotation, if one is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<AnnotationReport>,
}

impl StatusReport {
    /// Evaluates a lesson at `now`.
    #[must_use]
    pub fn new(state: &LessonAttendance, now: Timestamp) -> Self {
        Self {
            lesson_id: state.slot.lesson_id.clone(),
            status: state.status(now),
            timing: state.slot.timing(now),
            roster_size: state.roster_size(),
            summary: state.summary(),
            annotation: state
                .annotation
                .as_deref()
                .map(|raw| AnnotationReport::from(decode(raw))),
        }
    }
}

/// A decoded annotation with its timestamps in register notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationReport {
    /// The grammar the annotation was decoded from.
    pub format: AnnotationFormat,
    /// Abbreviation of the creator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Creation time, `DD.MM.YY, HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Abbreviation of the last editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<String>,
    /// Time of the last edit, `DD.MM.YY, HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<String>,
    /// The free-text body.
    pub body: String,
}

impl From<DecodedAnnotation> for AnnotationReport {
    fn from(decoded: DecodedAnnotation) -> Self {
        let header: Option<ProvenanceHeader> = decoded.header;
        let last_edit: Option<LastEdit> = header.as_ref().and_then(|header| header.last_edit.clone());
        Self {
            format: decoded.format,
            created_by: header.as_ref().map(|header| header.created_by.clone()),
            created_at: header.as_ref().map(|header| format_timestamp(header.created_at)),
            last_edited_by: last_edit.as_ref().map(|edit| edit.by.clone()),
            last_edited_at: last_edit.map(|edit| format_timestamp(edit.at)),
            body: decoded.body,
        }
    }
}
