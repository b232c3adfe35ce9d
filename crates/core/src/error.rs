// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use klassenbuch_domain::{DomainError, StudentId};

/// Errors that can occur during lesson transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The student is not on the lesson's roster.
    UnknownStudent(StudentId),
    /// The student has no attendance entry yet.
    NoEntry(StudentId),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::UnknownStudent(student) => {
                write!(f, "Student '{student}' is not on the lesson roster")
            }
            Self::NoEntry(student) => {
                write!(f, "Student '{student}' has no attendance entry")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
