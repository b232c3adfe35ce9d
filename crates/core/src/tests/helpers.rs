// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::LessonAttendance;
use klassenbuch_audit::Actor;
use klassenbuch_domain::{
    ActorId, AttendanceEntry, ClockTime, FixedClock, LessonId, LessonSlot, LessonWindow,
    StudentId, Timestamp,
};
use time::Date;
use time::macros::date;

pub fn create_test_actor() -> Actor {
    Actor::new(
        ActorId::new("t-schmidt"),
        String::from("Schmidt"),
        String::from("SCH"),
    )
}

pub fn create_other_actor() -> Actor {
    Actor::new(
        ActorId::new("t-mueller"),
        String::from("Müller"),
        String::from("MÜL"),
    )
}

pub fn clock(hour: u8, minute: u8) -> ClockTime {
    ClockTime::new(hour, minute).unwrap()
}

/// The standard first period, 08:00-08:45.
pub fn first_period() -> LessonWindow {
    LessonWindow::new(clock(8, 0), clock(8, 45)).unwrap()
}

pub fn lesson_date() -> Date {
    date!(2024 - 08 - 21)
}

pub fn timestamp_on(day: Date, hour: u8, minute: u8) -> Timestamp {
    day.with_hms(hour, minute, 0).unwrap()
}

/// A clock on the lesson's day.
pub fn at(hour: u8, minute: u8) -> FixedClock {
    FixedClock(timestamp_on(lesson_date(), hour, minute))
}

/// A clock on the day after the lesson.
pub fn next_day_at(hour: u8, minute: u8) -> FixedClock {
    FixedClock(timestamp_on(date!(2024 - 08 - 22), hour, minute))
}

pub fn student(id: &str) -> StudentId {
    StudentId::new(id)
}

/// A first-period lesson for anna, ben and cem with nothing recorded.
pub fn create_test_lesson() -> LessonAttendance {
    LessonAttendance::new(
        LessonSlot::new(LessonId::new("7b-2024-08-21-1"), lesson_date(), first_period()),
        vec![student("anna"), student("ben"), student("cem")],
    )
}

pub fn with_entry(
    mut state: LessonAttendance,
    id: &str,
    entry: AttendanceEntry,
) -> LessonAttendance {
    state.roster.insert(student(id), entry);
    state
}
