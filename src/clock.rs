//! Wall-clock source.
//!
//! History timestamps, registration dates and follow-up due dates are all
//! taken in UTC. The store holds a [`Clock`] so tests can pin "now".

use chrono::{NaiveDateTime, Utc};

pub type Clock = fn() -> NaiveDateTime;

pub fn system_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
