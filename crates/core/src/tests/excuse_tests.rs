// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    at, clock, create_other_actor, create_test_actor, create_test_lesson, student, with_entry,
};
use crate::{
    AbsenceTallies, AbsenceUnit, Command, CoreError, ExcuseConversion, LessonAttendance,
    TransitionResult, apply, convert_unexcused_to_excused, edit_entry_excuse, edit_excuse_text,
    grant_excuse, grant_late_excuse, revoke_excuse, revoke_late_excuse,
};
use klassenbuch_domain::{
    ActorId, AttendanceEntry, AttendanceRecord, DomainError, ExcuseInfo, Timestamp,
};

fn now() -> Timestamp {
    at(8, 10).0
}

fn later() -> Timestamp {
    at(9, 15).0
}

fn excused(text: &str) -> AttendanceEntry {
    AttendanceEntry::Excused {
        excuse_info: ExcuseInfo::new(text.to_string(), ActorId::new("t-schmidt"), now()),
    }
}

fn late(excuse: Option<ExcuseInfo>) -> AttendanceEntry {
    AttendanceEntry::Late {
        minutes_late: 12,
        arrival_time: clock(8, 12),
        excuse,
    }
}

fn unexcused() -> AttendanceEntry {
    AttendanceEntry::Unexcused { reason: None }
}

#[test]
fn test_grant_excuse_records_creator() {
    let entry: AttendanceEntry =
        grant_excuse(&unexcused(), "  Arzttermin ", &create_test_actor(), now()).unwrap();

    let AttendanceEntry::Excused { excuse_info } = entry else {
        panic!("expected an excused entry");
    };
    assert_eq!(excuse_info.text, "Arzttermin");
    assert_eq!(excuse_info.created_by.as_str(), "t-schmidt");
    assert_eq!(excuse_info.created_at, now());
    assert!(excuse_info.edit_history.is_empty());
}

#[test]
fn test_grant_excuse_is_allowed_from_present_and_late() {
    assert!(grant_excuse(&AttendanceEntry::Present, "Krank", &create_test_actor(), now()).is_ok());
    assert!(grant_excuse(&late(None), "Bus", &create_test_actor(), now()).is_ok());
}

#[test]
fn test_grant_excuse_twice_is_an_invalid_transition() {
    let result: Result<AttendanceEntry, CoreError> =
        grant_excuse(&excused("Krank"), "Arzt", &create_test_actor(), now());

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition {
            operation: "grant an excuse for",
            from: "excused",
        }))
    );
}

#[test]
fn test_blank_excuse_text_is_rejected() {
    let result: Result<AttendanceEntry, CoreError> =
        grant_excuse(&unexcused(), "   ", &create_test_actor(), now());

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::EmptyExcuseText))
    );
}

#[test]
fn test_edit_history_rebuilds_every_text() {
    let original: ExcuseInfo =
        ExcuseInfo::new(String::from("Krank"), ActorId::new("t-schmidt"), now());

    let first: ExcuseInfo =
        edit_excuse_text(&original, "Krank (Attest)", &create_other_actor(), later()).unwrap();
    let second: ExcuseInfo =
        edit_excuse_text(&first, "Krank (Attest liegt vor)", &create_test_actor(), later())
            .unwrap();

    assert_eq!(
        second.text_history(),
        vec!["Krank", "Krank (Attest)", "Krank (Attest liegt vor)"]
    );
    assert_eq!(second.created_by.as_str(), "t-schmidt");
    assert_eq!(second.created_at, now());
    assert_eq!(second.edit_history[0].editor_id.as_str(), "t-mueller");
    assert_eq!(second.edit_history[0].editor_name, "Müller");
    assert_eq!(second.edit_history[0].timestamp, later());
    assert_eq!(original.edit_history.len(), 0);
}

#[test]
fn test_edit_with_unchanged_text_adds_no_history() {
    let original: ExcuseInfo =
        ExcuseInfo::new(String::from("Krank"), ActorId::new("t-schmidt"), now());

    let edited: ExcuseInfo =
        edit_excuse_text(&original, " Krank ", &create_other_actor(), later()).unwrap();

    assert_eq!(edited, original);
}

#[test]
fn test_edit_entry_excuse_keeps_late_arrival() {
    let excuse: ExcuseInfo = ExcuseInfo::new(String::from("Bus"), ActorId::new("t-schmidt"), now());

    let edited: AttendanceEntry =
        edit_entry_excuse(&late(Some(excuse)), "Bus ausgefallen", &create_test_actor(), later())
            .unwrap();

    assert!(edited.late_excused());
    assert_eq!(edited.status_str(), "late");
    assert_eq!(edited.excuse().map(|info| info.text.as_str()), Some("Bus ausgefallen"));
}

#[test]
fn test_edit_entry_excuse_without_excuse_fails() {
    let result: Result<AttendanceEntry, CoreError> =
        edit_entry_excuse(&late(None), "Bus", &create_test_actor(), later());

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition {
            from: "late",
            ..
        }))
    ));
}

#[test]
fn test_revoke_excuse_returns_to_unexcused() {
    assert_eq!(revoke_excuse(&excused("Krank")), Ok(unexcused()));
    assert!(revoke_excuse(&AttendanceEntry::Present).is_err());
}

#[test]
fn test_late_excuse_round_trip() {
    let excused_late: AttendanceEntry =
        grant_late_excuse(&late(None), "Bus", &create_test_actor(), now()).unwrap();
    assert!(excused_late.late_excused());

    assert!(grant_late_excuse(&excused_late, "Bus", &create_test_actor(), now()).is_err());
    assert_eq!(revoke_late_excuse(&excused_late), Ok(late(None)));
    assert!(revoke_late_excuse(&late(None)).is_err());
    assert!(grant_late_excuse(&unexcused(), "Bus", &create_test_actor(), now()).is_err());
}

#[test]
fn test_convert_moves_one_lesson_to_excused() {
    let tallies: AbsenceTallies = AbsenceTallies::default().with_unexcused(AbsenceUnit::Fehlstunde);

    let conversion: ExcuseConversion = convert_unexcused_to_excused(
        &unexcused(),
        "Attest nachgereicht",
        &create_test_actor(),
        later(),
        &tallies,
        AbsenceUnit::Fehlstunde,
    )
    .unwrap();

    assert_eq!(conversion.entry.status_str(), "excused");
    assert_eq!(conversion.tallies.unexcused_lessons, 0);
    assert_eq!(conversion.tallies.excused_lessons, 1);
    assert!(!conversion.tally_drift);
    assert_eq!(tallies.unexcused_lessons, 1);
}

#[test]
fn test_convert_requires_unexcused_entry() {
    let result: Result<ExcuseConversion, CoreError> = convert_unexcused_to_excused(
        &AttendanceEntry::Present,
        "Attest",
        &create_test_actor(),
        later(),
        &AbsenceTallies::default(),
        AbsenceUnit::Fehltag,
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition {
            operation: "convert to excused",
            from: "present",
        }))
    );
}

#[test]
fn test_apply_excuse_lifecycle() {
    let state: LessonAttendance = with_entry(create_test_lesson(), "anna", unexcused());

    let granted: TransitionResult = apply(
        &state,
        Command::GrantExcuse {
            student: student("anna"),
            text: String::from("Krank"),
        },
        create_test_actor(),
        &at(8, 20),
    )
    .unwrap();
    assert_eq!(granted.audit_event.action.name, "GrantExcuse");

    let edited: TransitionResult = apply(
        &granted.new_state,
        Command::EditExcuse {
            student: student("anna"),
            text: String::from("Krank (Attest)"),
        },
        create_other_actor(),
        &at(9, 15),
    )
    .unwrap();
    let info: &ExcuseInfo = edited
        .new_state
        .entry(&student("anna"))
        .and_then(AttendanceEntry::excuse)
        .unwrap();
    assert_eq!(info.text_history(), vec!["Krank", "Krank (Attest)"]);

    let revoked: TransitionResult = apply(
        &edited.new_state,
        Command::RevokeExcuse {
            student: student("anna"),
        },
        create_test_actor(),
        &at(9, 20),
    )
    .unwrap();
    assert_eq!(revoked.new_state.entry(&student("anna")), Some(&unexcused()));
    assert_eq!(
        state.entry(&student("anna")),
        Some(&unexcused()),
        "input state must be left untouched"
    );
}

#[test]
fn test_apply_excuse_without_entry_fails() {
    let result: Result<TransitionResult, CoreError> = apply(
        &create_test_lesson(),
        Command::GrantExcuse {
            student: student("ben"),
            text: String::from("Krank"),
        },
        create_test_actor(),
        &at(8, 20),
    );

    assert_eq!(result, Err(CoreError::NoEntry(student("ben"))));
}

#[test]
fn test_apply_late_excuse_commands() {
    let state: LessonAttendance = with_entry(create_test_lesson(), "ben", late(None));

    let granted: TransitionResult = apply(
        &state,
        Command::GrantLateExcuse {
            student: student("ben"),
            text: String::from("Bus"),
        },
        create_test_actor(),
        &at(8, 20),
    )
    .unwrap();
    assert!(granted.new_state.entry(&student("ben")).unwrap().late_excused());

    let revoked: TransitionResult = apply(
        &granted.new_state,
        Command::RevokeLateExcuse {
            student: student("ben"),
        },
        create_test_actor(),
        &at(8, 25),
    )
    .unwrap();
    assert_eq!(revoked.new_state.entry(&student("ben")), Some(&late(None)));
}

#[test]
fn test_apply_convert_updates_entry_and_tallies_together() {
    let mut state: LessonAttendance = with_entry(create_test_lesson(), "cem", unexcused());
    state.tallies.insert(
        student("cem"),
        AbsenceTallies::default()
            .with_unexcused(AbsenceUnit::Fehltag)
            .with_unexcused(AbsenceUnit::Fehlstunde),
    );

    let result: TransitionResult = apply(
        &state,
        Command::ConvertToExcused {
            student: student("cem"),
            text: String::from("Attest"),
            unit: AbsenceUnit::Fehltag,
        },
        create_test_actor(),
        &at(10, 0),
    )
    .unwrap();

    assert_eq!(
        result.new_state.entry(&student("cem")).map(AttendanceEntry::status_str),
        Some("excused")
    );
    let tallies: AbsenceTallies = result.new_state.tallies_for(&student("cem"));
    assert_eq!(tallies.unexcused_days, 0);
    assert_eq!(tallies.excused_days, 1);
    assert_eq!(tallies.unexcused_lessons, 1);
    assert!(!result.tally_drift);
    assert_eq!(state.tallies_for(&student("cem")).unexcused_days, 1);
}

#[test]
fn test_apply_convert_flags_drifted_tallies() {
    let state: LessonAttendance = with_entry(create_test_lesson(), "cem", unexcused());

    let result: TransitionResult = apply(
        &state,
        Command::ConvertToExcused {
            student: student("cem"),
            text: String::from("Attest"),
            unit: AbsenceUnit::Fehlstunde,
        },
        create_test_actor(),
        &at(10, 0),
    )
    .unwrap();

    assert!(result.tally_drift);
    assert_eq!(result.new_state.tallies_for(&student("cem")).excused_lessons, 1);
    assert_eq!(result.new_state.tallies_for(&student("cem")).unexcused_lessons, 0);
}

#[test]
fn test_resaving_excused_record_keeps_original_excuse() {
    let state: LessonAttendance = create_test_lesson();
    let first: TransitionResult = apply(
        &state,
        Command::RecordEntry {
            student: student("anna"),
            entry: AttendanceRecord::Excused {
                excuse_reason: String::from("Arzttermin"),
            },
        },
        create_test_actor(),
        &at(8, 10),
    )
    .unwrap();

    let second: TransitionResult = apply(
        &first.new_state,
        Command::RecordEntry {
            student: student("anna"),
            entry: AttendanceRecord::Excused {
                excuse_reason: String::from("Arzttermin mit Attest"),
            },
        },
        create_other_actor(),
        &at(9, 0),
    )
    .unwrap();

    let info: &ExcuseInfo = second
        .new_state
        .entry(&student("anna"))
        .and_then(AttendanceEntry::excuse)
        .unwrap();
    assert_eq!(info.created_by.as_str(), "t-schmidt");
    assert_eq!(info.created_at, at(8, 10).0);
    assert_eq!(info.text_history(), vec!["Arzttermin", "Arzttermin mit Attest"]);
}
