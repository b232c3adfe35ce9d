// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{clock, first_period};
use crate::{
    ActorId, AttendanceEntry, AttendanceRecord, Bound, DomainError, ExcuseEdit, ExcuseInfo,
    non_empty_excuse,
};
use time::macros::datetime;

fn recorder() -> ActorId {
    ActorId::new("t-schmidt")
}

#[test]
fn test_wire_records_match_external_shape() {
    let present: AttendanceRecord = serde_json::from_str(r#"{"status":"present"}"#).unwrap();
    assert_eq!(present, AttendanceRecord::Present);

    let late: AttendanceRecord = serde_json::from_str(
        r#"{"status":"late","minutesLate":12,"arrivalTime":"08:12","lateExcused":false}"#,
    )
    .unwrap();
    assert_eq!(
        late,
        AttendanceRecord::Late {
            minutes_late: Some(12),
            arrival_time: clock(8, 12),
            late_excused: false,
            excuse_reason: None,
        }
    );

    let excused: AttendanceRecord =
        serde_json::from_str(r#"{"status":"excused","excuseReason":"Arzttermin"}"#).unwrap();
    assert_eq!(
        excused,
        AttendanceRecord::Excused {
            excuse_reason: String::from("Arzttermin"),
        }
    );

    let unexcused: AttendanceRecord = serde_json::from_str(r#"{"status":"unexcused"}"#).unwrap();
    assert_eq!(unexcused, AttendanceRecord::Unexcused);
}

#[test]
fn test_wire_record_serializes_late_entry() {
    let entry: AttendanceEntry = AttendanceEntry::Late {
        minutes_late: 12,
        arrival_time: clock(8, 12),
        excuse: None,
    };

    let json: String = serde_json::to_string(&AttendanceRecord::from(&entry)).unwrap();

    assert_eq!(
        json,
        r#"{"status":"late","minutesLate":12,"arrivalTime":"08:12","lateExcused":false}"#
    );
}

#[test]
fn test_wire_record_rejects_unknown_status() {
    assert!(serde_json::from_str::<AttendanceRecord>(r#"{"status":"sick"}"#).is_err());
}

#[test]
fn test_into_entry_recomputes_lateness() {
    let record: AttendanceRecord = AttendanceRecord::Late {
        minutes_late: Some(3),
        arrival_time: clock(8, 12),
        late_excused: false,
        excuse_reason: None,
    };

    let entry: AttendanceEntry = record
        .into_entry(&first_period(), &recorder(), datetime!(2024-08-21 08:15))
        .unwrap();

    assert_eq!(
        entry,
        AttendanceEntry::Late {
            minutes_late: 12,
            arrival_time: clock(8, 12),
            excuse: None,
        }
    );
}

#[test]
fn test_into_entry_rejects_arrival_outside_window() {
    let record: AttendanceRecord = AttendanceRecord::Late {
        minutes_late: None,
        arrival_time: clock(8, 50),
        late_excused: false,
        excuse_reason: None,
    };

    let result = record.into_entry(&first_period(), &recorder(), datetime!(2024-08-21 09:00));

    assert!(matches!(
        result,
        Err(DomainError::OutOfBounds {
            bound: Bound::TooLate,
            ..
        })
    ));
}

#[test]
fn test_into_entry_attributes_excuses() {
    let record: AttendanceRecord = AttendanceRecord::Excused {
        excuse_reason: String::from("  Arzttermin "),
    };

    let entry: AttendanceEntry = record
        .into_entry(&first_period(), &recorder(), datetime!(2024-08-21 08:15))
        .unwrap();

    assert_eq!(
        entry,
        AttendanceEntry::Excused {
            excuse_info: ExcuseInfo::new(
                String::from("Arzttermin"),
                recorder(),
                datetime!(2024-08-21 08:15),
            ),
        }
    );
}

#[test]
fn test_into_entry_requires_text_for_excused_late_arrival() {
    let record: AttendanceRecord = AttendanceRecord::Late {
        minutes_late: None,
        arrival_time: clock(8, 12),
        late_excused: true,
        excuse_reason: None,
    };

    let result = record.into_entry(&first_period(), &recorder(), datetime!(2024-08-21 08:15));

    assert_eq!(result, Err(DomainError::EmptyExcuseText));
}

#[test]
fn test_into_entry_excused_late_arrival() {
    let record: AttendanceRecord = AttendanceRecord::Late {
        minutes_late: None,
        arrival_time: clock(8, 12),
        late_excused: true,
        excuse_reason: Some(String::from("Bus")),
    };

    let entry: AttendanceEntry = record
        .into_entry(&first_period(), &recorder(), datetime!(2024-08-21 08:15))
        .unwrap();

    assert!(entry.late_excused());
    assert_eq!(entry.excuse().map(|e| e.text.as_str()), Some("Bus"));
}

#[test]
fn test_entry_status_strings() {
    assert_eq!(AttendanceEntry::Present.status_str(), "present");
    assert_eq!(
        AttendanceEntry::Unexcused { reason: None }.status_str(),
        "unexcused"
    );
}

#[test]
fn test_text_history_rebuilds_linear_history() {
    let mut info: ExcuseInfo = ExcuseInfo::new(
        String::from("third"),
        recorder(),
        datetime!(2024-08-21 08:00),
    );
    info.edit_history = vec![
        ExcuseEdit {
            editor_id: recorder(),
            editor_name: String::from("Schmidt"),
            timestamp: datetime!(2024-08-21 09:00),
            previous_text: String::from("first"),
        },
        ExcuseEdit {
            editor_id: recorder(),
            editor_name: String::from("Schmidt"),
            timestamp: datetime!(2024-08-21 10:00),
            previous_text: String::from("second"),
        },
    ];

    assert_eq!(info.text_history(), vec!["first", "second", "third"]);
    assert_eq!(
        info.last_edit().map(|e| e.previous_text.as_str()),
        Some("second")
    );
}

#[test]
fn test_non_empty_excuse() {
    assert_eq!(non_empty_excuse(" Krank "), Ok(String::from("Krank")));
    assert_eq!(non_empty_excuse(" \n "), Err(DomainError::EmptyExcuseText));
}

#[test]
fn test_entry_serde_shape() {
    let json: String =
        serde_json::to_string(&AttendanceEntry::Unexcused { reason: None }).unwrap();
    assert_eq!(json, r#"{"status":"unexcused","reason":null}"#);
}
