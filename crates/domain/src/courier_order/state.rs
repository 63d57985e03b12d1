//! Courier order lifecycle.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// The state of a courier order.
///
/// State transitions only move forward:
/// ```text
/// Created ──► Assigned ──► Delivered
///    │                        ▲
///    └────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourierOrderState {
    /// Order was handed to the courier service, no courier yet.
    #[default]
    Created,

    /// A courier accepted the order.
    Assigned,

    /// The order reached the customer (terminal state).
    Delivered,
}

impl CourierOrderState {
    fn rank(self) -> u8 {
        match self {
            CourierOrderState::Created => 0,
            CourierOrderState::Assigned => 1,
            CourierOrderState::Delivered => 2,
        }
    }

    /// Returns true if the order may move from this state to `next`.
    ///
    /// Staying in the same state is allowed so that re-applying an event
    /// leaves the order where it is.
    pub fn can_transition_to(&self, next: CourierOrderState) -> bool {
        next.rank() >= self.rank()
    }

    /// Returns `next` if the transition is allowed.
    pub fn transition_to(&self, next: CourierOrderState) -> Result<Self, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidStateTransition {
                from: *self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CourierOrderState::Delivered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CourierOrderState::Created => "CREATED",
            CourierOrderState::Assigned => "ASSIGNED",
            CourierOrderState::Delivered => "DELIVERED",
        }
    }
}

impl std::fmt::Display for CourierOrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
