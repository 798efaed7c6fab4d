//! Error types for countdown operations

use crate::core::models::RunState;
use thiserror::Error;

/// Reasons a countdown operation was refused.
///
/// None of these are fatal: a refused operation leaves the countdown exactly
/// as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CountdownError {
    #[error("duration must be greater than zero")]
    InvalidDuration,

    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: RunState,
    },
}
