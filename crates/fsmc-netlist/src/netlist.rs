//! Structural netlist of registers, gates and the nets connecting them
//!
//! The netlist is a plain graph: nets are the edges, and every net records
//! its single driver and its sinks. It carries no placement information;
//! laying it out is left to the consumer.

use crate::error::{NetlistError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a net (wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetId(pub u32);

/// Unique identifier for a register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegisterId(pub u32);

/// Unique identifier for a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u32);

// ============================================================================
// Elements
// ============================================================================

/// Combinational gate kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// N-input AND
    And,
    /// N-input OR
    Or,
    /// Inverter
    Not,
}

impl GateKind {
    /// Prefix for generated output net names
    pub fn prefix(&self) -> &'static str {
        match self {
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Not => "not",
        }
    }

    /// Evaluate the gate over its input values
    pub fn eval(&self, inputs: &[bool]) -> bool {
        match self {
            GateKind::And => inputs.iter().all(|&v| v),
            GateKind::Or => inputs.iter().any(|&v| v),
            GateKind::Not => !inputs.first().copied().unwrap_or(false),
        }
    }
}

/// What drives a net
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetDriver {
    /// The global clock input
    Clock,
    /// Primary input, by position
    PrimaryInput(usize),
    /// Register output
    Register(RegisterId),
    /// Gate output
    Gate(GateId),
    /// Constant tie-off
    Tie(bool),
}

/// Where a net is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetSink {
    /// Gate input
    Gate(GateId),
    /// Register data input
    RegisterData(RegisterId),
    /// Register clock input
    RegisterClock(RegisterId),
    /// Primary output, by position
    PrimaryOutput(usize),
}

/// A single-bit wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub id: NetId,
    /// Unique net name
    pub name: String,
    /// Driver (None while undriven)
    pub driver: Option<NetDriver>,
    /// Consumers of this net
    pub fanout: Vec<NetSink>,
}

/// A one-bit storage element latching on the shared clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub id: RegisterId,
    /// Register name (also the name of its output net)
    pub name: String,
    /// Clock net
    pub clock: NetId,
    /// Next-value input
    pub d: NetId,
    /// Current-value output
    pub q: NetId,
    /// Power-on value
    pub init: bool,
}

/// An external input pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryInput {
    pub net: NetId,
    pub label: String,
}

/// An external output pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryOutput {
    /// Net observed by the pin
    pub net: NetId,
    pub label: String,
}

/// A combinational gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub kind: GateKind,
    pub inputs: Vec<NetId>,
    pub output: NetId,
}

/// Element counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetlistStats {
    pub nets: usize,
    pub registers: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub gates: usize,
    pub and_gates: usize,
    pub or_gates: usize,
    pub not_gates: usize,
}

// ============================================================================
// Netlist
// ============================================================================

/// Registers, gates, pins and nets of a synthesized machine
///
/// All registers share the single clock net created with the netlist.
/// Gates are stored in dependency order: a gate only reads nets driven by
/// pins, registers, ties or earlier gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNetlist")]
pub struct Netlist {
    /// Module name
    pub name: String,
    /// The global clock net
    pub clock: NetId,
    pub nets: Vec<Net>,
    pub registers: Vec<Register>,
    /// Data inputs (the clock is not listed here)
    pub inputs: Vec<PrimaryInput>,
    pub outputs: Vec<PrimaryOutput>,
    pub gates: Vec<Gate>,
    /// Net name to ID mapping (rebuilt after deserialization)
    #[serde(skip)]
    net_map: IndexMap<String, NetId>,
}

/// Serialized netlist, before the name index is restored
#[derive(Deserialize)]
struct RawNetlist {
    name: String,
    clock: NetId,
    nets: Vec<Net>,
    registers: Vec<Register>,
    inputs: Vec<PrimaryInput>,
    outputs: Vec<PrimaryOutput>,
    gates: Vec<Gate>,
}

impl From<RawNetlist> for Netlist {
    fn from(raw: RawNetlist) -> Self {
        let mut netlist = Netlist {
            name: raw.name,
            clock: raw.clock,
            nets: raw.nets,
            registers: raw.registers,
            inputs: raw.inputs,
            outputs: raw.outputs,
            gates: raw.gates,
            net_map: IndexMap::new(),
        };
        netlist.rebuild_cache();
        netlist
    }
}

impl Netlist {
    /// Create an empty netlist with its clock net
    pub fn new(name: impl Into<String>, clock_name: impl Into<String>) -> Self {
        let clock_name = clock_name.into();
        let mut net_map = IndexMap::new();
        net_map.insert(clock_name.clone(), NetId(0));
        Self {
            name: name.into(),
            clock: NetId(0),
            nets: vec![Net {
                id: NetId(0),
                name: clock_name,
                driver: Some(NetDriver::Clock),
                fanout: Vec::new(),
            }],
            registers: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            gates: Vec::new(),
            net_map,
        }
    }

    /// Rebuild the name index from the net table
    pub fn rebuild_cache(&mut self) {
        self.net_map = self
            .nets
            .iter()
            .map(|net| (net.name.clone(), net.id))
            .collect();
    }

    /// Add a net and return its ID
    pub fn add_net(&mut self, name: impl Into<String>, driver: Option<NetDriver>) -> Result<NetId> {
        let name = name.into();
        if self.net_map.contains_key(&name) {
            return Err(NetlistError::DuplicateNet(name));
        }
        let id = NetId(self.nets.len() as u32);
        self.net_map.insert(name.clone(), id);
        self.nets.push(Net {
            id,
            name,
            driver,
            fanout: Vec::new(),
        });
        Ok(id)
    }

    /// Add a primary input pin and its net
    pub fn add_input(&mut self, label: impl Into<String>) -> Result<NetId> {
        let label = label.into();
        let position = self.inputs.len();
        let net = self.add_net(label.clone(), Some(NetDriver::PrimaryInput(position)))?;
        self.inputs.push(PrimaryInput { net, label });
        Ok(net)
    }

    /// Add a primary output pin observing `net`
    pub fn add_output(&mut self, label: impl Into<String>, net: NetId) {
        let position = self.outputs.len();
        self.sink(net, NetSink::PrimaryOutput(position));
        self.outputs.push(PrimaryOutput {
            net,
            label: label.into(),
        });
    }

    /// Add a register clocked by the global clock with data input `d`
    ///
    /// Returns the register and its output net, which carries the
    /// register's name.
    pub fn add_register(
        &mut self,
        name: impl Into<String>,
        d: NetId,
        init: bool,
    ) -> Result<(RegisterId, NetId)> {
        let name = name.into();
        let id = RegisterId(self.registers.len() as u32);
        let q = self.add_net(name.clone(), Some(NetDriver::Register(id)))?;
        let clock = self.clock;
        self.sink(clock, NetSink::RegisterClock(id));
        self.sink(d, NetSink::RegisterData(id));
        self.registers.push(Register {
            id,
            name,
            clock,
            d,
            q,
            init,
        });
        Ok((id, q))
    }

    /// Reconnect a register's data input
    pub fn set_register_input(&mut self, register: RegisterId, d: NetId) {
        let Some(old) = self.registers.get(register.0 as usize).map(|r| r.d) else {
            return;
        };
        if let Some(net) = self.nets.get_mut(old.0 as usize) {
            net.fanout
                .retain(|s| *s != NetSink::RegisterData(register));
        }
        self.sink(d, NetSink::RegisterData(register));
        self.registers[register.0 as usize].d = d;
    }

    /// Add a gate and its output net
    pub fn add_gate(&mut self, kind: GateKind, inputs: Vec<NetId>) -> Result<NetId> {
        let id = GateId(self.gates.len() as u32);
        let name = format!("{}_{}", kind.prefix(), id.0);
        let output = self.add_net(name, Some(NetDriver::Gate(id)))?;
        for &input in &inputs {
            self.sink(input, NetSink::Gate(id));
        }
        self.gates.push(Gate {
            id,
            kind,
            inputs,
            output,
        });
        Ok(output)
    }

    /// The constant net for `value`, created on first use
    pub fn tie(&mut self, value: bool) -> Result<NetId> {
        let name = if value { "tie_hi" } else { "tie_lo" };
        match self.net_map.get(name) {
            Some(&id) => Ok(id),
            None => self.add_net(name, Some(NetDriver::Tie(value))),
        }
    }

    fn sink(&mut self, net: NetId, sink: NetSink) {
        if let Some(net) = self.nets.get_mut(net.0 as usize) {
            net.fanout.push(sink);
        }
    }

    /// Get a net by ID
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.0 as usize)
    }

    /// Get a net by name
    pub fn net_by_name(&self, name: &str) -> Option<&Net> {
        self.net_map.get(name).and_then(|id| self.net(*id))
    }

    /// Name of a net, or `"?"` for a dangling ID
    pub fn net_name(&self, id: NetId) -> &str {
        self.net(id).map(|n| n.name.as_str()).unwrap_or("?")
    }

    /// Constant nets and their values
    pub fn ties(&self) -> impl Iterator<Item = (&Net, bool)> + '_ {
        self.nets.iter().filter_map(|net| match net.driver {
            Some(NetDriver::Tie(value)) => Some((net, value)),
            _ => None,
        })
    }

    pub fn stats(&self) -> NetlistStats {
        let count = |kind: GateKind| self.gates.iter().filter(|g| g.kind == kind).count();
        NetlistStats {
            nets: self.nets.len(),
            registers: self.registers.len(),
            inputs: self.inputs.len(),
            outputs: self.outputs.len(),
            gates: self.gates.len(),
            and_gates: count(GateKind::And),
            or_gates: count(GateKind::Or),
            not_gates: count(GateKind::Not),
        }
    }
}
