//! Netlist assembly from minimized logic
//!
//! ```text
//! state bits ─┐
//! input bits ─┼─> NetlistAssembler ─> Netlist (registers + AND/OR/NOT network)
//! SOP logic ──┘
//! ```
//!
//! Each sum-of-products function is realized as a two-level network:
//! inverters for complemented variables, one AND per multi-literal product
//! and one OR per multi-product sum. Inverters and identical products are
//! shared across all functions. Without logic, the assembler produces the
//! register and pin skeleton with every register input and primary output
//! tied low.

use crate::error::{NetlistError, Result};
use crate::logic::{Literal, MinimizedLogic, Product, SumOfProducts};
use crate::netlist::{GateKind, NetId, Netlist, RegisterId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Naming scheme for pins and registers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetNames {
    /// Clock input pin
    pub clock: String,
    /// Input pins are named `<input_prefix>_<bit>`
    pub input_prefix: String,
    /// Output pins are named `<output_prefix>_<bit>`
    pub output_prefix: String,
    /// Registers are named `<state_prefix>_<bit>`
    pub state_prefix: String,
}

impl Default for NetNames {
    fn default() -> Self {
        Self {
            clock: "clk".to_string(),
            input_prefix: "in".to_string(),
            output_prefix: "out".to_string(),
            state_prefix: "state".to_string(),
        }
    }
}

/// Prefixes the assembler itself uses for gate output nets
const GATE_PREFIXES: [&str; 3] = ["and", "or", "not"];

/// Tie net names
const TIE_NETS: [&str; 2] = ["tie_lo", "tie_hi"];

/// Verilog keywords that could be mistaken for a clock name
const KEYWORDS: &[&str] = &[
    "always", "and", "assign", "begin", "buf", "case", "default", "else", "end", "endcase",
    "endmodule", "for", "function", "if", "initial", "inout", "input", "integer", "module",
    "nand", "negedge", "nor", "not", "or", "output", "parameter", "posedge", "reg", "wire",
    "xnor", "xor",
];

impl NetNames {
    /// Reject names that are not Verilog identifiers or that would collide
    ///
    /// Pins and registers are `<prefix>_<bit>`, gates are `and_N`, `or_N`
    /// and `not_N`, and constants are `tie_lo`/`tie_hi`, so prefixes must
    /// differ from each other and from the gate prefixes, and the clock
    /// must not look like any generated name.
    pub fn check(&self) -> Result<()> {
        let prefixes = [
            ("input_prefix", &self.input_prefix),
            ("output_prefix", &self.output_prefix),
            ("state_prefix", &self.state_prefix),
        ];

        for (field, value) in [("clock", &self.clock)].into_iter().chain(prefixes) {
            if !is_identifier(value) {
                return Err(NetlistError::InvalidNaming(format!(
                    "{} \"{}\" is not a Verilog identifier",
                    field, value
                )));
            }
        }

        for (i, (field, value)) in prefixes.iter().enumerate() {
            if GATE_PREFIXES.contains(&value.as_str()) {
                return Err(NetlistError::InvalidNaming(format!(
                    "{} \"{}\" is reserved for gate outputs",
                    field, value
                )));
            }
            if let Some((other, _)) = prefixes[i + 1..].iter().find(|(_, v)| v == value) {
                return Err(NetlistError::InvalidNaming(format!(
                    "{} and {} are both \"{}\"",
                    field, other, value
                )));
            }
        }

        let clock = self.clock.as_str();
        let generated = prefixes
            .iter()
            .map(|(_, p)| p.as_str())
            .chain(GATE_PREFIXES)
            .any(|prefix| is_indexed(clock, prefix));
        if generated || TIE_NETS.contains(&clock) || KEYWORDS.contains(&clock) {
            return Err(NetlistError::InvalidNaming(format!(
                "clock \"{}\" clashes with a generated or reserved name",
                clock
            )));
        }
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// True if `name` is `<prefix>_<digits>`
fn is_indexed(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .map_or(false, |bits| !bits.is_empty() && bits.chars().all(|c| c.is_ascii_digit()))
}

/// Builds a [`Netlist`] for a machine of known register, input and output widths
#[derive(Debug, Clone)]
pub struct NetlistAssembler {
    module_name: String,
    names: NetNames,
    initial_state: Vec<bool>,
}

impl NetlistAssembler {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            names: NetNames::default(),
            initial_state: Vec::new(),
        }
    }

    pub fn with_names(mut self, names: NetNames) -> Self {
        self.names = names;
        self
    }

    /// Power-on register values, bit 0 first. Defaults to all zeros.
    pub fn with_initial_state(mut self, bits: Vec<bool>) -> Self {
        self.initial_state = bits;
        self
    }

    /// Assemble registers, pins and (if given) the combinational network
    ///
    /// Logic variables are the register outputs followed by the input pins.
    pub fn assemble(
        &self,
        state_bits: usize,
        input_bits: usize,
        output_bits: usize,
        logic: Option<&MinimizedLogic>,
    ) -> Result<Netlist> {
        self.names.check()?;
        if !self.initial_state.is_empty() && self.initial_state.len() != state_bits {
            return Err(NetlistError::InitialStateWidth {
                expected: state_bits,
                found: self.initial_state.len(),
            });
        }
        if let Some(logic) = logic {
            check_count("next-state", state_bits, logic.next_state.len())?;
            check_count("output", output_bits, logic.outputs.len())?;
        }

        let mut netlist = Netlist::new(self.module_name.clone(), self.names.clock.clone());
        let placeholder = netlist.tie(false)?;

        let mut registers: Vec<RegisterId> = Vec::with_capacity(state_bits);
        let mut variables: Vec<NetId> = Vec::with_capacity(state_bits + input_bits);
        for bit in 0..state_bits {
            let init = self.initial_state.get(bit).copied().unwrap_or(false);
            let name = format!("{}_{}", self.names.state_prefix, bit);
            let (register, q) = netlist.add_register(name, placeholder, init)?;
            registers.push(register);
            variables.push(q);
        }
        for bit in 0..input_bits {
            variables.push(netlist.add_input(format!("{}_{}", self.names.input_prefix, bit))?);
        }

        let Some(logic) = logic else {
            for bit in 0..output_bits {
                netlist.add_output(format!("{}_{}", self.names.output_prefix, bit), placeholder);
            }
            info!(
                "Assembled skeleton: {} registers, {} inputs, {} outputs",
                state_bits, input_bits, output_bits
            );
            return Ok(netlist);
        };

        let mut builder = LogicBuilder {
            netlist,
            variables,
            inverted: HashMap::new(),
            products: HashMap::new(),
        };

        for (register, function) in registers.iter().zip(&logic.next_state) {
            let d = builder.realize(function)?;
            builder.netlist.set_register_input(*register, d);
        }
        let mut output_nets = Vec::with_capacity(output_bits);
        for function in &logic.outputs {
            output_nets.push(builder.realize(function)?);
        }

        let mut netlist = builder.netlist;
        for (bit, net) in output_nets.into_iter().enumerate() {
            netlist.add_output(format!("{}_{}", self.names.output_prefix, bit), net);
        }

        let stats = netlist.stats();
        info!(
            "Assembled netlist '{}': {} registers, {} gates ({} AND, {} OR, {} NOT)",
            netlist.name,
            stats.registers,
            stats.gates,
            stats.and_gates,
            stats.or_gates,
            stats.not_gates
        );
        Ok(netlist)
    }
}

fn check_count(kind: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(NetlistError::FunctionCount {
            kind,
            expected,
            found,
        })
    }
}

/// Two-level realization state with gate sharing
struct LogicBuilder {
    netlist: Netlist,
    variables: Vec<NetId>,
    inverted: HashMap<usize, NetId>,
    products: HashMap<Vec<Literal>, NetId>,
}

impl LogicBuilder {
    fn realize(&mut self, function: &SumOfProducts) -> Result<NetId> {
        if function.is_zero() {
            return self.netlist.tie(false);
        }
        if function.is_one() {
            return self.netlist.tie(true);
        }

        let mut terms: Vec<NetId> = Vec::with_capacity(function.products.len());
        for product in &function.products {
            let net = self.realize_product(product)?;
            if !terms.contains(&net) {
                terms.push(net);
            }
        }

        if terms.len() == 1 {
            Ok(terms[0])
        } else {
            self.netlist.add_gate(GateKind::Or, terms)
        }
    }

    fn realize_product(&mut self, product: &Product) -> Result<NetId> {
        let mut literals = product.literals.clone();
        literals.sort();
        literals.dedup();

        if literals.len() == 1 {
            return self.literal(literals[0]);
        }
        if let Some(&net) = self.products.get(&literals) {
            return Ok(net);
        }

        let mut inputs = Vec::with_capacity(literals.len());
        for &literal in &literals {
            inputs.push(self.literal(literal)?);
        }
        let net = self.netlist.add_gate(GateKind::And, inputs)?;
        debug!("Product of {} literals -> {}", literals.len(), self.netlist.net_name(net));
        self.products.insert(literals, net);
        Ok(net)
    }

    fn literal(&mut self, literal: Literal) -> Result<NetId> {
        let net = *self
            .variables
            .get(literal.var)
            .ok_or(NetlistError::UnknownVariable {
                var: literal.var,
                available: self.variables.len(),
            })?;
        if !literal.negated {
            return Ok(net);
        }
        if let Some(&inv) = self.inverted.get(&literal.var) {
            return Ok(inv);
        }
        let inv = self.netlist.add_gate(GateKind::Not, vec![net])?;
        self.inverted.insert(literal.var, inv);
        Ok(inv)
    }
}
