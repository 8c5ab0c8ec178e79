//! Synthesis report
//!
//! Summarizes a run for people (`Display`) and tools (serde JSON): code
//! tables, the truth table by state name, minimized equations, validation
//! findings and netlist statistics.

use crate::encoding::{Bits, InputEncoding, StateEncoding};
use crate::truth_table::TruthTable;
use fsmc_graph::{Fsm, StateId, ValidationReport};
use fsmc_netlist::{MinimizedLogic, NetlistStats};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCode {
    pub name: String,
    pub code: Bits,
    pub output: String,
    pub initial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCode {
    pub symbol: String,
    pub code: Bits,
}

/// Truth-table row with state names resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub state: String,
    pub input: String,
    pub current: Bits,
    pub input_code: Bits,
    pub next: Bits,
    pub output: Bits,
    pub hold: bool,
}

/// A minimized function in readable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    /// `next_state[b]` or `output[b]`
    pub target: String,
    pub expression: String,
    pub products: usize,
    pub literals: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub module_name: String,
    /// Minimizer used, `None` for a skeleton
    pub minimizer: Option<String>,
    pub state_bits: usize,
    pub input_bits: usize,
    pub output_bits: usize,
    pub states: Vec<StateCode>,
    pub inputs: Vec<InputCode>,
    pub table: Vec<ReportRow>,
    pub equations: Vec<Equation>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: NetlistStats,
}

/// Everything a report is built from
pub(crate) struct ReportInputs<'a> {
    pub module_name: &'a str,
    pub minimizer: Option<&'a str>,
    pub fsm: &'a Fsm,
    pub validation: &'a ValidationReport,
    pub states: &'a StateEncoding,
    pub inputs: &'a InputEncoding,
    pub table: &'a TruthTable,
    pub logic: Option<&'a MinimizedLogic>,
    pub stats: NetlistStats,
}

impl SynthesisReport {
    pub(crate) fn build(src: ReportInputs<'_>) -> Self {
        let name_of = |id: StateId| {
            src.fsm
                .state(id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        let states = src
            .states
            .iter()
            .filter_map(|(id, code)| {
                src.fsm.state(id).map(|s| StateCode {
                    name: s.name.clone(),
                    code: code.clone(),
                    output: s.output.clone(),
                    initial: s.is_initial,
                })
            })
            .collect();

        let inputs = src
            .inputs
            .iter()
            .map(|(symbol, code)| InputCode {
                symbol: symbol.to_string(),
                code: code.clone(),
            })
            .collect();

        let table = src
            .table
            .rows
            .iter()
            .map(|r| ReportRow {
                state: name_of(r.state),
                input: r.symbol.clone(),
                current: r.current.clone(),
                input_code: r.input.clone(),
                next: r.next.clone(),
                output: r.output.clone(),
                hold: r.hold,
            })
            .collect();

        let variables = src.table.variable_names();
        let equations = src
            .logic
            .map(|logic| {
                src.table
                    .targets()
                    .into_iter()
                    .zip(logic.next_state.iter().chain(&logic.outputs))
                    .map(|(target, function)| Equation {
                        target: target.to_string(),
                        expression: function.display_with(&variables),
                        products: function.products.len(),
                        literals: function.literal_count(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            module_name: src.module_name.to_string(),
            minimizer: src.minimizer.map(str::to_string),
            state_bits: src.table.state_bits,
            input_bits: src.table.input_bits,
            output_bits: src.table.output_bits,
            states,
            inputs,
            table,
            equations,
            errors: src.validation.error_messages(),
            warnings: src.validation.warning_messages(),
            stats: src.stats,
        }
    }

    pub fn is_skeleton(&self) -> bool {
        self.minimizer.is_none()
    }
}

impl fmt::Display for SynthesisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Module: {}", self.module_name)?;
        writeln!(
            f,
            "Widths: {} state bits, {} input bits, {} output bits",
            self.state_bits, self.input_bits, self.output_bits
        )?;

        writeln!(f, "\nState encoding:")?;
        let name_w = self.states.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for state in &self.states {
            writeln!(
                f,
                "  {:<name_w$}  {}  out={}{}",
                state.name,
                state.code,
                state.output,
                if state.initial { "  (initial)" } else { "" }
            )?;
        }

        writeln!(f, "\nInput encoding:")?;
        let symbol_w = self.inputs.iter().map(|i| i.symbol.len()).max().unwrap_or(0);
        for input in &self.inputs {
            writeln!(f, "  {:<symbol_w$}  {}", input.symbol, input.code)?;
        }

        writeln!(f, "\nTruth table ({} rows):", self.table.len())?;
        for row in &self.table {
            writeln!(
                f,
                "  {} {} -> {} / {}{}",
                row.current,
                row.input_code,
                row.next,
                row.output,
                if row.hold { "  (hold)" } else { "" }
            )?;
        }

        if self.is_skeleton() {
            writeln!(f, "\nEquations: none (skeleton)")?;
        } else {
            writeln!(f, "\nEquations:")?;
            for eq in &self.equations {
                writeln!(f, "  {} = {}", eq.target, eq.expression)?;
            }
        }

        writeln!(
            f,
            "\nNetlist: {} registers, {} gates ({} AND, {} OR, {} NOT), {} nets",
            self.stats.registers,
            self.stats.gates,
            self.stats.and_gates,
            self.stats.or_gates,
            self.stats.not_gates,
            self.stats.nets
        )?;

        if !self.errors.is_empty() || !self.warnings.is_empty() {
            writeln!(f)?;
            for error in &self.errors {
                writeln!(f, "error: {}", error)?;
            }
            for warning in &self.warnings {
                writeln!(f, "warning: {}", warning)?;
            }
        }
        Ok(())
    }
}
