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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod excuse;
mod state;
mod tallies;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, lesson_clock};
pub use command::Command;
pub use error::CoreError;
pub use excuse::{
    ExcuseConversion, convert_unexcused_to_excused, edit_entry_excuse, edit_excuse_text,
    grant_excuse, grant_late_excuse, revoke_excuse, revoke_late_excuse,
};
pub use state::{LessonAttendance, TransitionResult};
pub use tallies::{AbsenceTallies, AbsenceUnit, LESSONS_PER_SCHOOL_DAY};
