// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod entry;

use crate::{ClockTime, LessonWindow};

pub fn clock(hour: u8, minute: u8) -> ClockTime {
    ClockTime::new(hour, minute).unwrap()
}

/// The standard first period, 08:00-08:45.
pub fn first_period() -> LessonWindow {
    LessonWindow::new(clock(8, 0), clock(8, 45)).unwrap()
}
