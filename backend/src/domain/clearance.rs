//! Clearance hierarchy gating every operation.
//!
//! Levels are totally ordered; an actor may perform an operation when its
//! clearance is at least the level the operation requires.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{UserId, Username};
use super::Error;

/// Ordered permission tier.
///
/// # Examples
/// ```
/// use meal_backend::domain::Clearance;
///
/// assert!(Clearance::Caterer.at_least(Clearance::Customer));
/// assert!(!Clearance::Customer.at_least(Clearance::Caterer));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Clearance {
    Guest,
    #[default]
    Customer,
    Caterer,
    SuperUser,
}

/// Raised when a stored or submitted level has no matching tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown clearance level {0}")]
pub struct UnknownClearance(pub i16);

impl Clearance {
    /// Numeric level persisted alongside the user.
    pub const fn level(self) -> i16 {
        match self {
            Self::Guest => 0,
            Self::Customer => 1,
            Self::Caterer => 2,
            Self::SuperUser => 3,
        }
    }

    /// Inverse of [`Clearance::level`].
    pub fn from_level(level: i16) -> Result<Self, UnknownClearance> {
        match level {
            0 => Ok(Self::Guest),
            1 => Ok(Self::Customer),
            2 => Ok(Self::Caterer),
            3 => Ok(Self::SuperUser),
            other => Err(UnknownClearance(other)),
        }
    }

    /// Whether this tier satisfies `required`.
    pub fn at_least(self, required: Clearance) -> bool {
        self.level() >= required.level()
    }
}

/// Identity resolved from a bearer credential for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub username: Username,
    pub clearance: Clearance,
}

impl Actor {
    /// Whether the actor owns the resource identified by `owner`.
    pub fn is(&self, owner: &UserId) -> bool {
        &self.id == owner
    }
}

/// Fail with `unauthorized` unless `actor` holds at least `required`.
pub fn require_clearance(actor: &Actor, required: Clearance) -> Result<(), Error> {
    if actor.clearance.at_least(required) {
        Ok(())
    } else {
        Err(Error::unauthorized("insufficient clearance for this operation"))
    }
}
