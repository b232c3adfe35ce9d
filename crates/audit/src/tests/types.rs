// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{create_other_actor, create_test_actor};
use crate::{Action, Actor, AuditEvent, StateSnapshot};
use klassenbuch_domain::{ActorId, LessonId};
use time::macros::datetime;

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = create_test_actor();

    assert_eq!(actor.id, ActorId::new("t-schmidt"));
    assert_eq!(actor.name, "Schmidt");
    assert_eq!(actor.abbreviation, "SCH");
}

#[test]
fn test_action_creation_requires_name() {
    let action: Action = Action::new(String::from("GrantExcuse"), None);

    assert_eq!(action.name, "GrantExcuse");
    assert_eq!(action.details, None);
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("GrantExcuse"),
        Some(String::from("Excused anna")),
    );

    assert_eq!(action.name, "GrantExcuse");
    assert_eq!(action.details, Some(String::from("Excused anna")));
}

#[test]
fn test_audit_event_creation_requires_all_fields() {
    let actor: Actor = create_test_actor();
    let action: Action = Action::new(String::from("RecordEntry"), None);
    let before: StateSnapshot = StateSnapshot::new(String::from("recorded=0"));
    let after: StateSnapshot = StateSnapshot::new(String::from("recorded=1"));

    let event: AuditEvent = AuditEvent::new(
        actor.clone(),
        action.clone(),
        before.clone(),
        after.clone(),
        LessonId::new("7b-math-3"),
        datetime!(2024-08-21 08:10),
    );

    assert_eq!(event.actor, actor);
    assert_eq!(event.action, action);
    assert_eq!(event.before, before);
    assert_eq!(event.after, after);
    assert_eq!(event.lesson_id.as_str(), "7b-math-3");
    assert_eq!(event.recorded_at, datetime!(2024-08-21 08:10));
}

#[test]
fn test_actor_equality() {
    assert_eq!(create_test_actor(), create_test_actor());
    assert_ne!(create_test_actor(), create_other_actor());
}
