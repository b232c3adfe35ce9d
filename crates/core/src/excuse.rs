// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Excuse lifecycle.
//!
//! Every operation takes the acting person and the current time explicitly,
//! never mutates its input and returns a replacement value. Operations invoked
//! on an entry in the wrong state fail with `DomainError::InvalidTransition`;
//! nothing is coerced.

use crate::error::CoreError;
use crate::tallies::{AbsenceTallies, AbsenceUnit};
use klassenbuch_audit::Actor;
use klassenbuch_domain::{
    AttendanceEntry, DomainError, ExcuseEdit, ExcuseInfo, Timestamp, non_empty_excuse,
};
use tracing::warn;

const fn invalid(operation: &'static str, entry: &AttendanceEntry) -> CoreError {
    CoreError::DomainViolation(DomainError::InvalidTransition {
        operation,
        from: entry.status_str(),
    })
}

/// Excuses an absence or late arrival, replacing the entry with `Excused`.
///
/// # Errors
///
/// Returns an error if:
/// - The entry is already excused (edit the excuse instead)
/// - The excuse text is empty
pub fn grant_excuse(
    entry: &AttendanceEntry,
    reason_text: &str,
    actor: &Actor,
    now: Timestamp,
) -> Result<AttendanceEntry, CoreError> {
    if matches!(entry, AttendanceEntry::Excused { .. }) {
        return Err(invalid("grant an excuse for", entry));
    }

    let text: String = non_empty_excuse(reason_text)?;
    Ok(AttendanceEntry::Excused {
        excuse_info: ExcuseInfo::new(text, actor.id.clone(), now),
    })
}

/// Changes the text of an excuse, recording the previous text.
///
/// Saving the same text again (ignoring surrounding whitespace) returns the
/// excuse unchanged without a history entry.
///
/// # Errors
///
/// Returns `DomainError::EmptyExcuseText` if the new text is blank.
pub fn edit_excuse_text(
    excuse_info: &ExcuseInfo,
    new_text: &str,
    actor: &Actor,
    now: Timestamp,
) -> Result<ExcuseInfo, CoreError> {
    let text: String = non_empty_excuse(new_text)?;
    if text == excuse_info.text.trim() {
        return Ok(excuse_info.clone());
    }

    let mut edit_history: Vec<ExcuseEdit> = excuse_info.edit_history.clone();
    edit_history.push(ExcuseEdit {
        editor_id: actor.id.clone(),
        editor_name: actor.name.clone(),
        timestamp: now,
        previous_text: excuse_info.text.clone(),
    });

    Ok(ExcuseInfo {
        text,
        created_by: excuse_info.created_by.clone(),
        created_at: excuse_info.created_at,
        edit_history,
    })
}

/// Edits the excuse attached to an excused absence or excused late arrival.
///
/// # Errors
///
/// Returns an error if the entry carries no excuse, or the new text is blank.
pub fn edit_entry_excuse(
    entry: &AttendanceEntry,
    new_text: &str,
    actor: &Actor,
    now: Timestamp,
) -> Result<AttendanceEntry, CoreError> {
    match entry {
        AttendanceEntry::Excused { excuse_info } => Ok(AttendanceEntry::Excused {
            excuse_info: edit_excuse_text(excuse_info, new_text, actor, now)?,
        }),
        AttendanceEntry::Late {
            minutes_late,
            arrival_time,
            excuse: Some(excuse),
        } => Ok(AttendanceEntry::Late {
            minutes_late: *minutes_late,
            arrival_time: *arrival_time,
            excuse: Some(edit_excuse_text(excuse, new_text, actor, now)?),
        }),
        _ => Err(invalid("edit the excuse of", entry)),
    }
}

/// Withdraws an excuse, turning the absence back into an unexcused one.
///
/// Used both to undo and to delete an excuse.
///
/// # Errors
///
/// Returns an error if the entry is not `Excused`.
pub fn revoke_excuse(entry: &AttendanceEntry) -> Result<AttendanceEntry, CoreError> {
    match entry {
        AttendanceEntry::Excused { .. } => Ok(AttendanceEntry::Unexcused { reason: None }),
        _ => Err(invalid("revoke the excuse of", entry)),
    }
}

/// Excuses a late arrival, keeping the arrival time.
///
/// # Errors
///
/// Returns an error if the entry is not an unexcused late arrival, or the text
/// is blank.
pub fn grant_late_excuse(
    entry: &AttendanceEntry,
    reason_text: &str,
    actor: &Actor,
    now: Timestamp,
) -> Result<AttendanceEntry, CoreError> {
    match entry {
        AttendanceEntry::Late {
            minutes_late,
            arrival_time,
            excuse: None,
        } => Ok(AttendanceEntry::Late {
            minutes_late: *minutes_late,
            arrival_time: *arrival_time,
            excuse: Some(ExcuseInfo::new(
                non_empty_excuse(reason_text)?,
                actor.id.clone(),
                now,
            )),
        }),
        _ => Err(invalid("excuse the late arrival of", entry)),
    }
}

/// Removes the excuse from a late arrival.
///
/// # Errors
///
/// Returns an error if the entry is not an excused late arrival.
pub fn revoke_late_excuse(entry: &AttendanceEntry) -> Result<AttendanceEntry, CoreError> {
    match entry {
        AttendanceEntry::Late {
            minutes_late,
            arrival_time,
            excuse: Some(_),
        } => Ok(AttendanceEntry::Late {
            minutes_late: *minutes_late,
            arrival_time: *arrival_time,
            excuse: None,
        }),
        _ => Err(invalid("revoke the late excuse of", entry)),
    }
}

/// The paired result of excusing an unexcused absence.
///
/// The entry and the aggregate tallies must be stored together; there is no
/// valid state in which only one of them has been updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcuseConversion {
    /// The new, excused entry.
    pub entry: AttendanceEntry,
    /// The adjusted absence tallies.
    pub tallies: AbsenceTallies,
    /// The unexcused tally was already zero before the conversion.
    pub tally_drift: bool,
}

/// Converts an unexcused absence into an excused one and moves the matching
/// aggregate count from unexcused to excused.
///
/// # Errors
///
/// Returns an error if the entry is not `Unexcused`, or the text is blank.
pub fn convert_unexcused_to_excused(
    entry: &AttendanceEntry,
    excuse_text: &str,
    actor: &Actor,
    now: Timestamp,
    tallies: &AbsenceTallies,
    unit: AbsenceUnit,
) -> Result<ExcuseConversion, CoreError> {
    if !matches!(entry, AttendanceEntry::Unexcused { .. }) {
        return Err(invalid("convert to excused", entry));
    }

    let excused: AttendanceEntry = grant_excuse(entry, excuse_text, actor, now)?;
    let (tallies, tally_drift) = tallies.excuse_one(unit);
    if tally_drift {
        warn!(
            actor = %actor.id,
            ?unit,
            "Unexcused tally was already zero; absence counters have drifted from the entries"
        );
    }

    Ok(ExcuseConversion {
        entry: excused,
        tallies,
        tally_drift,
    })
}
