//! Error types for FSM graph operations

use crate::model::{StateId, TransitionId};
use thiserror::Error;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while mutating or loading an FSM graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A state id that does not exist in this machine
    #[error("Unknown state: {0}")]
    UnknownState(StateId),

    /// A transition id that does not exist in this machine
    #[error("Unknown transition: {0}")]
    UnknownTransition(TransitionId),

    /// Display names must be unique among states
    #[error("State name '{0}' is already in use")]
    DuplicateStateName(String),

    /// Exact (from, to, input) duplicate of an existing transition
    #[error("Transition '{from}' --{input}--> '{to}' already exists")]
    DuplicateTransition {
        from: String,
        to: String,
        input: String,
    },

    /// A second transition leaving the same state on the same input
    #[error(
        "State '{from}' already moves to '{existing}' on input '{input}'; \
         a transition to '{requested}' would make the machine non-deterministic"
    )]
    ConflictingTransition {
        from: String,
        input: String,
        existing: String,
        requested: String,
    },

    /// Snapshot transition names a state id the snapshot never declared
    #[error("Snapshot transition references unknown state id '{0}'")]
    UnknownStateRef(String),

    /// Snapshot declares the same state id twice
    #[error("Snapshot declares state id '{0}' more than once")]
    DuplicateStateRef(String),

    /// Malformed snapshot document
    #[error("Failed to parse snapshot: {0}")]
    Parse(String),

    /// I/O error reading or writing a snapshot
    #[error("I/O error: {0}")]
    Io(String),
}
