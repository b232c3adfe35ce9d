// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod types;

use crate::Actor;
use klassenbuch_domain::ActorId;

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
