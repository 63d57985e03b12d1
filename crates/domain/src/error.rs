//! Domain error types.

use thiserror::Error;

use crate::CourierOrderState;

/// Errors raised by domain rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A courier order cannot move backwards in its lifecycle.
    #[error("Invalid courier order transition from {from} to {to}")]
    InvalidStateTransition {
        from: CourierOrderState,
        to: CourierOrderState,
    },
}
