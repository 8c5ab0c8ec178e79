//! Error types for the synthesis pipeline

use crate::config::ConfigError;
use crate::minimize::MinimizeError;
use fsmc_graph::ValidationReport;
use fsmc_netlist::NetlistError;
use thiserror::Error;

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Error)]
pub enum SynthError {
    /// The machine has blocking validation errors
    #[error("FSM failed validation:\n{0}")]
    Validation(ValidationReport),

    #[error("Minimization failed: {0}")]
    Minimize(#[from] MinimizeError),

    #[error("Netlist assembly failed: {0}")]
    Netlist(#[from] NetlistError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Current-state plus input bits exceed what an assignment index holds
    #[error("{0} logic variables exceed the supported maximum of {max}", max = crate::minimize::MAX_VARIABLES)]
    TooManyVariables(usize),

    /// Pipeline stages disagree with each other
    #[error("Internal error: {0}")]
    Internal(String),
}
