//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock whose reading is set and advanced explicitly.
///
/// # Examples
/// ```
/// use attendance::test_support::{MutableClock, utc};
/// use mockable::Clock;
///
/// let clock = MutableClock::new(utc(2025, 11, 27, 10, 0, 0));
/// clock.advance_seconds(30);
/// assert_eq!(clock.utc(), utc(2025, 11, 27, 10, 0, 30));
/// ```
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    /// Move forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Build a UTC instant for fixtures.
///
/// # Panics
/// Panics when the components do not name a valid instant.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(year, month, day, hour, min, sec).single() {
        Some(instant) => instant,
        None => panic!("invalid fixture instant {year}-{month}-{day}T{hour}:{min}:{sec}Z"),
    }
}
