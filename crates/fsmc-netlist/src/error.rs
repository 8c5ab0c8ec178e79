//! Error types for netlist assembly and simulation

use thiserror::Error;

/// Result type for netlist operations
pub type Result<T> = std::result::Result<T, NetlistError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetlistError {
    /// Pin or register naming would produce clashing or illegal names
    #[error("Invalid naming: {0}")]
    InvalidNaming(String),

    /// Two nets would share a name
    #[error("Net '{0}' already exists")]
    DuplicateNet(String),

    /// Wrong number of logic functions for the register or output count
    #[error("Expected {expected} {kind} functions, found {found}")]
    FunctionCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// A literal references a variable past the state and input bits
    #[error("Literal references variable {var}, but only {available} variables exist")]
    UnknownVariable { var: usize, available: usize },

    /// Power-on state code does not match the register count
    #[error("Initial state has {found} bits, expected {expected}")]
    InitialStateWidth { expected: usize, found: usize },

    /// Simulation called with the wrong number of input values
    #[error("Expected {expected} input values, found {found}")]
    InputCount { expected: usize, found: usize },

    /// A net id points past the end of the net table
    #[error("Net id {0} does not exist in the netlist")]
    DanglingNet(u32),

    /// A net was read before anything drove it
    #[error("Net '{0}' has no value; it is undriven or used before its driver")]
    UnresolvedNet(String),
}
