// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod annotation;

#[cfg(test)]
mod tests;

pub use annotation::{
    Annotation, AnnotationFormat, DecodedAnnotation, ENTRY_LABEL, LastEdit, ProvenanceHeader,
    decode, encode, format_timestamp, parse_timestamp, validate_abbreviation,
};

use klassenbuch_domain::{ActorId, LessonId, Timestamp};
use serde::{Deserialize, Serialize};

/// Represents the person performing an action.
///
/// Identity is resolved once at the boundary and passed explicitly to every
/// operation that records provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: ActorId,
    /// The actor's display name (e.g., "Schmidt").
    pub name: String,
    /// The short form used in annotation headers (e.g., "SCH").
    pub abbreviation: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `name` - The display name
    /// * `abbreviation` - The short form shown in annotation headers
    #[must_use]
    pub const fn new(id: ActorId, name: String, abbreviation: String) -> Self {
        Self {
            id,
            name,
            abbreviation,
        }
    }
}

/// Represents the specific action performed.
///
/// An action describes what state change occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`GrantExcuse`", "`RecordEntry`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A summary of lesson state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful lesson transition produces exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - What action was performed (action)
/// - The state before the transition (before)
/// - The state after the transition (after)
/// - Which lesson it applies to, and when it happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The lesson this event is scoped to.
    pub lesson_id: LessonId,
    /// When the transition was applied.
    pub recorded_at: Timestamp,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `lesson_id` - The lesson this event applies to
    /// * `recorded_at` - When the change was applied
    #[must_use]
    pub const fn new(
        actor: Actor,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        lesson_id: LessonId,
        recorded_at: Timestamp,
    ) -> Self {
        Self {
            actor,
            action,
            before,
            after,
            lesson_id,
            recorded_at,
        }
    }
}
