//! Next-state and output truth table
//!
//! One row per (state, input symbol) pair, in encoding order. A pair with no
//! explicit transition holds the current state. Output bits come from the
//! current state alone.

use crate::encoding::{Bits, InputEncoding, StateEncoding};
use crate::error::{Result, SynthError};
use fsmc_graph::{Fsm, StateId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A single bit of the table's right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitTarget {
    /// Bit of the next-state code, 0 being the most significant
    NextState(usize),
    /// Bit of the output pattern, 0 being the most significant
    Output(usize),
}

impl fmt::Display for BitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitTarget::NextState(bit) => write!(f, "next_state[{}]", bit),
            BitTarget::Output(bit) => write!(f, "output[{}]", bit),
        }
    }
}

/// `(current state, input) -> (next state, output)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthTableRow {
    /// Current state
    pub state: StateId,
    /// Input symbol
    pub symbol: String,
    pub current: Bits,
    pub input: Bits,
    pub next: Bits,
    pub output: Bits,
    /// True if no explicit transition exists and the row holds state
    pub hold: bool,
}

impl TruthTableRow {
    /// Variable values: current-state bits followed by input bits
    pub fn assignment(&self) -> Vec<bool> {
        let mut values = self.current.as_slice().to_vec();
        values.extend_from_slice(self.input.as_slice());
        values
    }

    /// Value of one right-hand-side bit
    pub fn target(&self, target: BitTarget) -> bool {
        match target {
            BitTarget::NextState(bit) => self.next.get(bit),
            BitTarget::Output(bit) => self.output.get(bit),
        }
    }
}

/// Complete table for a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthTable {
    pub state_bits: usize,
    pub input_bits: usize,
    pub output_bits: usize,
    pub rows: Vec<TruthTableRow>,
}

impl TruthTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_variables(&self) -> usize {
        self.state_bits + self.input_bits
    }

    /// Variable names: `s0..` for state bits, then `i0..` for input bits
    pub fn variable_names(&self) -> Vec<String> {
        (0..self.state_bits)
            .map(|b| format!("s{}", b))
            .chain((0..self.input_bits).map(|b| format!("i{}", b)))
            .collect()
    }

    /// Every right-hand-side bit: next-state bits, then output bits
    pub fn targets(&self) -> Vec<BitTarget> {
        (0..self.state_bits)
            .map(BitTarget::NextState)
            .chain((0..self.output_bits).map(BitTarget::Output))
            .collect()
    }

    /// Values of one right-hand-side bit, row by row
    pub fn column(&self, target: BitTarget) -> Vec<bool> {
        self.rows.iter().map(|r| r.target(target)).collect()
    }

    pub fn hold_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.hold).count()
    }

    /// Human-readable table with state names from `fsm`
    pub fn render(&self, fsm: &Fsm) -> String {
        let name = |id: StateId| {
            fsm.state(id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        let state_w = self
            .rows
            .iter()
            .map(|r| name(r.state).len())
            .chain(std::iter::once("State".len()))
            .max()
            .unwrap_or(5);
        let symbol_w = self
            .rows
            .iter()
            .map(|r| r.symbol.len())
            .chain(std::iter::once("Input".len()))
            .max()
            .unwrap_or(5);
        let cur_w = self.state_bits.max("Cur".len());
        let in_w = self.input_bits.max("In".len());
        let next_w = self.state_bits.max("Next".len());

        let mut out = format!(
            "{:<state_w$}  {:<symbol_w$} | {:<cur_w$} {:<in_w$} | {:<next_w$} {}\n",
            "State", "Input", "Cur", "In", "Next", "Out"
        );
        for row in &self.rows {
            out.push_str(&format!(
                "{:<state_w$}  {:<symbol_w$} | {:<cur_w$} {:<in_w$} | {:<next_w$} {}{}\n",
                name(row.state),
                row.symbol,
                row.current.to_string(),
                row.input.to_string(),
                row.next.to_string(),
                row.output,
                if row.hold { "  (hold)" } else { "" }
            ));
        }
        out
    }
}

/// Enumerate every (state, input) pair of a validated machine
///
/// Callers must validate first; a machine with validation errors produces an
/// unspecified table.
pub fn build_table(
    fsm: &Fsm,
    state_enc: &StateEncoding,
    input_enc: &InputEncoding,
) -> Result<TruthTable> {
    let output_bits = fsm
        .states()
        .iter()
        .map(|s| s.output_bits().len())
        .max()
        .unwrap_or(1)
        .max(1);

    let mut rows = Vec::with_capacity(state_enc.len() * input_enc.len());
    for (state_id, current) in state_enc.iter() {
        let state = fsm
            .state(state_id)
            .ok_or_else(|| SynthError::Internal(format!("encoded state {} not in machine", state_id)))?;
        let output = Bits::zero_padded(state.output_bits(), output_bits).ok_or_else(|| {
            SynthError::Internal(format!(
                "state '{}' has non-binary output '{}'",
                state.name, state.output
            ))
        })?;

        for (symbol, input) in input_enc.iter() {
            let (next, hold) = match fsm.outgoing(state_id, symbol) {
                Some(transition) => {
                    let next = state_enc.code(transition.to).ok_or_else(|| {
                        SynthError::Internal(format!(
                            "transition {} targets unencoded state {}",
                            transition.id, transition.to
                        ))
                    })?;
                    (next.clone(), false)
                }
                None => (current.clone(), true),
            };
            rows.push(TruthTableRow {
                state: state_id,
                symbol: symbol.to_string(),
                current: current.clone(),
                input: input.clone(),
                next,
                output: output.clone(),
                hold,
            });
        }
    }

    let table = TruthTable {
        state_bits: state_enc.width(),
        input_bits: input_enc.width(),
        output_bits,
        rows,
    };
    debug!(
        "Built truth table: {} rows ({} hold), {} variables, {} output bits",
        table.len(),
        table.hold_rows(),
        table.num_variables(),
        table.output_bits
    );
    Ok(table)
}
