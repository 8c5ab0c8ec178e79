//! FSMC graph model
//!
//! This crate handles:
//! - The in-memory Moore machine (states, transitions, per-machine ids)
//! - Editor-side mutations that keep the machine deterministic
//! - JSON snapshot interchange with the editor
//! - Structural validation ahead of synthesis

pub mod error;
pub mod model;
pub mod snapshot;
pub mod validation;

pub use error::{GraphError, Result};
pub use model::{Fsm, MachineType, State, StateId, Transition, TransitionId};
pub use snapshot::{FsmSnapshot, StateSnapshot, TransitionSnapshot};
pub use validation::{validate, IssueKind, Severity, ValidationIssue, ValidationReport};
