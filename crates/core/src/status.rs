//! Character moderation lifecycle.
//!
//! `pending` is the only initial state. `approved` and `rejected` are
//! terminal: once a decision is recorded no further transition is allowed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status name for characters awaiting review.
pub const STATUS_PENDING: &str = "pending";

/// Status name for characters visible in the public gallery.
pub const STATUS_APPROVED: &str = "approved";

/// Status name for characters refused by an administrator.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid status values, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

/// Moderation status of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterStatus {
    Pending,
    Approved,
    Rejected,
}

impl CharacterStatus {
    /// Database / wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Approved => STATUS_APPROVED,
            Self::Rejected => STATUS_REJECTED,
        }
    }

    /// Parse from the database `status` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_APPROVED => Ok(Self::Approved),
            STATUS_REJECTED => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: CharacterStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl std::fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An administrator's moderation decision.
///
/// Kept distinct from [`CharacterStatus`] so `pending` can never be
/// submitted as a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// The status a character lands in after this decision.
    pub fn target_status(self) -> CharacterStatus {
        match self {
            Self::Approved => CharacterStatus::Approved,
            Self::Rejected => CharacterStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.target_status().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_move_to_either_decision() {
        assert!(CharacterStatus::Pending.can_transition_to(CharacterStatus::Approved));
        assert!(CharacterStatus::Pending.can_transition_to(CharacterStatus::Rejected));
    }

    #[test]
    fn terminal_states_do_not_transition() {
        for from in [CharacterStatus::Approved, CharacterStatus::Rejected] {
            assert!(from.is_terminal());
            for to in [
                CharacterStatus::Pending,
                CharacterStatus::Approved,
                CharacterStatus::Rejected,
            ] {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be refused");
            }
        }
    }

    #[test]
    fn pending_does_not_transition_to_itself() {
        assert!(!CharacterStatus::Pending.can_transition_to(CharacterStatus::Pending));
    }

    #[test]
    fn from_name_round_trips_valid_values() {
        for name in VALID_STATUSES {
            assert_eq!(CharacterStatus::from_name(name).unwrap().as_str(), *name);
        }
    }

    #[test]
    fn from_name_rejects_unknown_value() {
        let err = CharacterStatus::from_name("archived").unwrap_err();
        assert!(err.to_string().contains("Invalid status"));
    }

    #[test]
    fn decision_maps_to_terminal_status() {
        assert_eq!(Decision::Approved.target_status(), CharacterStatus::Approved);
        assert_eq!(Decision::Rejected.target_status(), CharacterStatus::Rejected);
        assert_eq!(Decision::Rejected.as_str(), "rejected");
    }
}
