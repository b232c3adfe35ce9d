// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::excuse::{
    ExcuseConversion, convert_unexcused_to_excused, edit_entry_excuse, edit_excuse_text,
    grant_excuse, grant_late_excuse, revoke_excuse, revoke_late_excuse,
};
use crate::state::{LessonAttendance, TransitionResult};
use klassenbuch_audit::{Action, Actor, Annotation, AuditEvent, StateSnapshot};
use klassenbuch_domain::{
    AttendanceEntry, AttendanceRecord, Clock, ClockTime, ExcuseInfo, LessonId, LessonSlot,
    LessonWindow, Roster, StudentId, Timestamp, apply_all_late, default_late_time,
    reconcile_roster,
};
use tracing::{debug, info};

/// Applies a command to a lesson, producing a new lesson state and one audit event.
///
/// This function is pure with respect to its inputs: `state` is never
/// modified, and on error nothing is produced.
///
/// # Arguments
///
/// * `state` - The current lesson state (immutable)
/// * `command` - The command to apply
/// * `actor` - The person performing this action
/// * `clock` - The source of the current school-local time
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - A student is not on the lesson roster
/// - An excuse operation targets a student without an entry
/// - A late arrival lies outside the lesson window
/// - An excuse operation is invoked on an entry in the wrong state
/// - Excuse text is blank
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &LessonAttendance,
    command: Command,
    actor: Actor,
    clock: &impl Clock,
) -> Result<TransitionResult, CoreError> {
    let now: Timestamp = clock.now();
    let action_name: &'static str = command.name();
    let stamps_annotation: bool = command.stamps_annotation();

    let mut new_state: LessonAttendance = state.clone();
    let mut note_body: Option<String> = None;
    let mut tally_drift: bool = false;

    let details: String = match command {
        Command::RecordEntry { student, entry } => {
            ensure_on_roster(state, &student)?;
            let resolved: AttendanceEntry = resolve_record(
                state.entry(&student),
                entry,
                &state.slot.window,
                &actor,
                now,
            )?;
            let details: String = format!("Recorded {} for {student}", resolved.status_str());
            new_state.roster.insert(student, resolved);
            details
        }
        Command::RecordAll { entries } => {
            let count: usize = entries.len();
            let mut roster: Roster = Roster::new();
            for (student, record) in entries {
                ensure_on_roster(state, &student)?;
                let resolved: AttendanceEntry = resolve_record(
                    state.entry(&student),
                    record,
                    &state.slot.window,
                    &actor,
                    now,
                )?;
                roster.insert(student, resolved);
            }
            new_state.roster = roster;
            format!("Recorded {count} entries")
        }
        Command::MarkAllPresent => {
            new_state.roster = state
                .students
                .iter()
                .map(|student| (student.clone(), AttendanceEntry::Present))
                .collect();
            format!("Marked {} students present", state.roster_size())
        }
        Command::MarkAllLate => {
            let lesson_now: ClockTime = lesson_clock(&state.slot, now);
            new_state.roster = apply_all_late(&state.students, &state.slot.window, lesson_now);
            format!(
                "Marked {} students late at {}",
                state.roster_size(),
                default_late_time(&state.slot.window, lesson_now)
            )
        }
        Command::GrantExcuse { student, text } => {
            let entry: &AttendanceEntry = existing_entry(state, &student)?;
            let excused: AttendanceEntry = grant_excuse(entry, &text, &actor, now)?;
            new_state.roster.insert(student.clone(), excused);
            format!("Excused {student} (was {})", entry.status_str())
        }
        Command::EditExcuse { student, text } => {
            let entry: &AttendanceEntry = existing_entry(state, &student)?;
            let edited: AttendanceEntry = edit_entry_excuse(entry, &text, &actor, now)?;
            new_state.roster.insert(student.clone(), edited);
            format!("Edited excuse of {student}")
        }
        Command::RevokeExcuse { student } => {
            let entry: &AttendanceEntry = existing_entry(state, &student)?;
            new_state
                .roster
                .insert(student.clone(), revoke_excuse(entry)?);
            format!("Revoked excuse of {student}")
        }
        Command::GrantLateExcuse { student, text } => {
            let entry: &AttendanceEntry = existing_entry(state, &student)?;
            let excused: AttendanceEntry = grant_late_excuse(entry, &text, &actor, now)?;
            new_state.roster.insert(student.clone(), excused);
            format!("Excused late arrival of {student}")
        }
        Command::RevokeLateExcuse { student } => {
            let entry: &AttendanceEntry = existing_entry(state, &student)?;
            new_state
                .roster
                .insert(student.clone(), revoke_late_excuse(entry)?);
            format!("Revoked late excuse of {student}")
        }
        Command::ConvertToExcused {
            student,
            text,
            unit,
        } => {
            let entry: &AttendanceEntry = existing_entry(state, &student)?;
            let conversion: ExcuseConversion = convert_unexcused_to_excused(
                entry,
                &text,
                &actor,
                now,
                &state.tallies_for(&student),
                unit,
            )?;
            tally_drift = conversion.tally_drift;
            new_state.roster.insert(student.clone(), conversion.entry);
            new_state.tallies.insert(student.clone(), conversion.tallies);
            format!("Converted absence of {student} to excused ({unit:?})")
        }
        Command::SaveNote { body } => {
            let details: String = format!("Saved note ({} characters)", body.chars().count());
            note_body = Some(body);
            details
        }
        Command::RescheduleLesson { window } => {
            new_state.slot.window = window;
            new_state.roster =
                reconcile_roster(&state.roster, &window, lesson_clock(&new_state.slot, now));
            format!(
                "Rescheduled lesson from {}-{} to {}-{}",
                state.slot.window.start(),
                state.slot.window.end(),
                window.start(),
                window.end()
            )
        }
    };

    if stamps_annotation {
        let mut annotation: Annotation = state.decoded_annotation();
        if let Some(body) = note_body {
            annotation = annotation.with_body(body);
        }
        new_state.annotation = Some(annotation.touch(&actor, now).encode()?);
    }

    debug!(
        lesson = %state.slot.lesson_id,
        action = action_name,
        details = %details,
        "Resolved lesson command"
    );

    let before: StateSnapshot = state.to_snapshot();
    let after: StateSnapshot = new_state.to_snapshot();
    let lesson_id: LessonId = state.slot.lesson_id.clone();

    info!(
        lesson = %lesson_id,
        actor = %actor.id,
        action = action_name,
        "Applied lesson command"
    );

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        Action::new(String::from(action_name), Some(details)),
        before,
        after,
        lesson_id,
        now,
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
        tally_drift,
    })
}

/// Maps the current instant onto the lesson's day.
///
/// Past lessons resolve to their end and future lessons to their start, so
/// the late-arrival defaults treat them as elapsed or not yet begun.
#[must_use]
pub fn lesson_clock(slot: &LessonSlot, now: Timestamp) -> ClockTime {
    if now.date() > slot.date {
        slot.window.end()
    } else if now.date() < slot.date {
        slot.window.start()
    } else {
        ClockTime::from(now.time())
    }
}

fn ensure_on_roster(state: &LessonAttendance, student: &StudentId) -> Result<(), CoreError> {
    if state.has_student(student) {
        Ok(())
    } else {
        Err(CoreError::UnknownStudent(student.clone()))
    }
}

fn existing_entry<'a>(
    state: &'a LessonAttendance,
    student: &StudentId,
) -> Result<&'a AttendanceEntry, CoreError> {
    ensure_on_roster(state, student)?;
    state
        .entry(student)
        .ok_or_else(|| CoreError::NoEntry(student.clone()))
}

/// Turns an external record into an entry.
///
/// When an excused entry is saved again as excused, the original excuse is
/// kept and a text change lands in its edit history.
fn resolve_record(
    existing: Option<&AttendanceEntry>,
    record: AttendanceRecord,
    window: &LessonWindow,
    actor: &Actor,
    now: Timestamp,
) -> Result<AttendanceEntry, CoreError> {
    let fresh: AttendanceEntry = record.into_entry(window, &actor.id, now)?;
    let Some(previous) = existing.and_then(AttendanceEntry::excuse) else {
        return Ok(fresh);
    };

    let carried = |info: &ExcuseInfo| edit_excuse_text(previous, &info.text, actor, now);
    match (existing, fresh) {
        (Some(AttendanceEntry::Excused { .. }), AttendanceEntry::Excused { excuse_info }) => {
            Ok(AttendanceEntry::Excused {
                excuse_info: carried(&excuse_info)?,
            })
        }
        (
            Some(AttendanceEntry::Late { .. }),
            AttendanceEntry::Late {
                minutes_late,
                arrival_time,
                excuse: Some(info),
            },
        ) => Ok(AttendanceEntry::Late {
            minutes_late,
            arrival_time,
            excuse: Some(carried(&info)?),
        }),
        (_, other) => Ok(other),
    }
}
