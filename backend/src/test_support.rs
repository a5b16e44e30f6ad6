//! Test utilities shared by unit tests in `src/` and suites in `tests/`.
//!
//! Nothing here is wired into the server; it exists so scenarios can pin
//! "now" and avoid production-strength hashing costs.

use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{Actor, Clearance, UserId, Username};
use crate::outbound::security::Argon2PasswordHasher;

/// Clock whose current instant is set explicitly.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock fixed at noon UTC on `day`.
    pub fn at_noon(day: NaiveDate) -> Self {
        let noon = day
            .and_hms_opt(12, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or_else(|| panic!("noon exists on {day}"));
        Self::new(noon)
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex poisoned"),
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

/// Argon2 hasher with minimal cost parameters.
pub fn fast_password_hasher() -> Argon2PasswordHasher {
    match argon2::Params::new(argon2::Params::MIN_M_COST, 1, 1, None) {
        Ok(params) => Argon2PasswordHasher::with_params(params),
        Err(error) => panic!("minimal argon2 parameters rejected: {error}"),
    }
}

/// Actor with a fresh id, as a resolved credential would produce.
pub fn actor(username: &str, clearance: Clearance) -> Actor {
    match Username::new(username) {
        Ok(username) => Actor {
            id: UserId::random(),
            username,
            clearance,
        },
        Err(error) => panic!("test username {username:?} rejected: {error}"),
    }
}
