// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate absence counters kept alongside the per-lesson entries.

use serde::{Deserialize, Serialize};

/// Lesson-equivalents counted for one whole-day absence.
pub const LESSONS_PER_SCHOOL_DAY: u32 = 8;

/// The unit an absence is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceUnit {
    /// A single missed lesson.
    Fehlstunde,
    /// A whole missed school day.
    Fehltag,
}

impl AbsenceUnit {
    /// Returns how many lessons one absence in this unit stands for.
    #[must_use]
    pub const fn lesson_equivalents(self) -> u32 {
        match self {
            Self::Fehlstunde => 1,
            Self::Fehltag => LESSONS_PER_SCHOOL_DAY,
        }
    }
}

/// A student's running absence totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbsenceTallies {
    /// Excused single-lesson absences.
    pub excused_lessons: u32,
    /// Unexcused single-lesson absences.
    pub unexcused_lessons: u32,
    /// Excused whole-day absences.
    pub excused_days: u32,
    /// Unexcused whole-day absences.
    pub unexcused_days: u32,
}

impl AbsenceTallies {
    /// Returns a copy with one more unexcused absence in `unit`.
    #[must_use]
    pub const fn with_unexcused(self, unit: AbsenceUnit) -> Self {
        let mut next: Self = self;
        match unit {
            AbsenceUnit::Fehlstunde => {
                next.unexcused_lessons = next.unexcused_lessons.saturating_add(1);
            }
            AbsenceUnit::Fehltag => next.unexcused_days = next.unexcused_days.saturating_add(1),
        }
        next
    }

    /// Moves one absence in `unit` from unexcused to excused.
    ///
    /// Returns the new tallies and whether the unexcused counter was already
    /// zero. In that case the counters have drifted from the detail records;
    /// the decrement saturates and the drift is reported, not repaired.
    #[must_use]
    pub const fn excuse_one(self, unit: AbsenceUnit) -> (Self, bool) {
        let mut next: Self = self;
        let drift: bool = match unit {
            AbsenceUnit::Fehlstunde => {
                next.excused_lessons = next.excused_lessons.saturating_add(1);
                let drift: bool = next.unexcused_lessons == 0;
                next.unexcused_lessons = next.unexcused_lessons.saturating_sub(1);
                drift
            }
            AbsenceUnit::Fehltag => {
                next.excused_days = next.excused_days.saturating_add(1);
                let drift: bool = next.unexcused_days == 0;
                next.unexcused_days = next.unexcused_days.saturating_sub(1);
                drift
            }
        };
        (next, drift)
    }

    /// Total excused absences in lesson-equivalents.
    #[must_use]
    pub const fn excused_lesson_equivalents(&self) -> u32 {
        self.excused_lessons + self.excused_days * LESSONS_PER_SCHOOL_DAY
    }

    /// Total unexcused absences in lesson-equivalents.
    #[must_use]
    pub const fn unexcused_lesson_equivalents(&self) -> u32 {
        self.unexcused_lessons + self.unexcused_days * LESSONS_PER_SCHOOL_DAY
    }
}
