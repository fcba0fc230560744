use chrono::Duration;
use thiserror::Error;

use super::models::ActionKind;
use crate::cooldown::format_remaining;
use crate::user::StorageError;

/// A normal refusal to perform an action. Nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("You are not registered. Register first.")]
    NotRegistered,

    #[error("You are already registered!")]
    AlreadyRegistered,

    #[error("{action} is on cooldown. Try again in {}.", format_remaining(*remaining))]
    OnCooldown {
        action: ActionKind,
        remaining: Duration,
    },

    #[error("You already checked in today!")]
    AlreadyCheckedIn { remaining: Duration },

    #[error("That would push a counter past its limit. Nothing was changed.")]
    CounterOverflow,
}

impl Rejection {
    /// Stable machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::NotRegistered => "not_registered",
            Rejection::AlreadyRegistered => "already_registered",
            Rejection::OnCooldown { .. } => "on_cooldown",
            Rejection::AlreadyCheckedIn { .. } => "already_checked_in",
            Rejection::CounterOverflow => "counter_overflow",
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Rejection::OnCooldown { remaining, .. } | Rejection::AlreadyCheckedIn { remaining } => {
                Some(*remaining)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The action was not applied
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ActionError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ActionError::Rejected(rejection) => Some(rejection),
            ActionError::Storage(_) => None,
        }
    }
}
