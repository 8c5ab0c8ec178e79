//! FSMC synthesis - Moore machine to gate-level netlist
//!
//! This crate handles:
//! - Binary encoding of states and input symbols
//! - Truth-table construction with hold transitions
//! - Per-bit minimization problems and the `Minimizer` seam
//! - The end-to-end synthesis pipeline and its report
//! - `fsmc.toml` configuration

pub mod config;
pub mod encoding;
pub mod error;
pub mod minimize;
pub mod pipeline;
pub mod report;
pub mod truth_table;

pub use config::{ConfigError, SynthConfig, SynthesisOptions, CONFIG_FILE};
pub use encoding::{code_width, encode_inputs, encode_states, Bits, InputEncoding, StateEncoding};
pub use error::{Result, SynthError};
pub use minimize::{
    minimize_all, problems, MinimizationProblem, MinimizeError, Minimizer, MintermCover,
    ProblemRow, MAX_VARIABLES,
};
pub use pipeline::{synthesize, Synthesis, Synthesizer};
pub use report::{Equation, InputCode, ReportRow, StateCode, SynthesisReport};
pub use truth_table::{build_table, BitTarget, TruthTable, TruthTableRow};

pub use fsmc_graph::validate;
