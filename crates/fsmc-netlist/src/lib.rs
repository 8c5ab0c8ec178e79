//! FSMC netlist - gate-level realization of minimized logic
//!
//! This crate handles:
//! - Sum-of-products logic functions
//! - Register/gate netlist representation
//! - Netlist assembly from minimized next-state and output logic
//! - Cycle-based netlist simulation
//! - Structural Verilog output

pub mod assembler;
pub mod error;
pub mod logic;
pub mod netlist;
pub mod simulate;
pub mod verilog;

pub use assembler::{NetNames, NetlistAssembler};
pub use error::{NetlistError, Result};
pub use logic::{assignment_bits, assignment_index, Literal, MinimizedLogic, Product, SumOfProducts};
pub use netlist::{
    Gate, GateId, GateKind, Net, NetDriver, NetId, NetSink, Netlist, NetlistStats, PrimaryInput,
    PrimaryOutput, Register, RegisterId,
};
pub use simulate::Simulator;
pub use verilog::write_verilog;
