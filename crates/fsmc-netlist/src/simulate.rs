//! Cycle-based simulation of a netlist
//!
//! Gates are evaluated in stored order, which is dependency order for
//! netlists built through [`Netlist::add_gate`]. Registers update together
//! on each clock edge.

use crate::error::{NetlistError, Result};
use crate::netlist::{NetDriver, Netlist};

/// Clocked simulator holding the current register values
pub struct Simulator<'a> {
    netlist: &'a Netlist,
    state: Vec<bool>,
    cycle: u64,
}

impl<'a> Simulator<'a> {
    /// Start from the registers' power-on values
    pub fn new(netlist: &'a Netlist) -> Self {
        Self {
            netlist,
            state: netlist.registers.iter().map(|r| r.init).collect(),
            cycle: 0,
        }
    }

    /// Return to power-on values
    pub fn reset(&mut self) {
        self.state = self.netlist.registers.iter().map(|r| r.init).collect();
        self.cycle = 0;
    }

    /// Current register values, register 0 first
    pub fn state(&self) -> &[bool] {
        &self.state
    }

    /// Clock edges applied since construction or reset
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Primary output values for the current state and `inputs`
    pub fn outputs(&self, inputs: &[bool]) -> Result<Vec<bool>> {
        let values = self.evaluate(inputs)?;
        self.netlist
            .outputs
            .iter()
            .map(|o| self.read(&values, o.net.0 as usize))
            .collect()
    }

    /// Apply one clock edge
    ///
    /// Returns the outputs observed before the edge.
    pub fn step(&mut self, inputs: &[bool]) -> Result<Vec<bool>> {
        let values = self.evaluate(inputs)?;
        let outputs = self
            .netlist
            .outputs
            .iter()
            .map(|o| self.read(&values, o.net.0 as usize))
            .collect::<Result<Vec<_>>>()?;
        self.state = self
            .netlist
            .registers
            .iter()
            .map(|r| self.read(&values, r.d.0 as usize))
            .collect::<Result<Vec<_>>>()?;
        self.cycle += 1;
        Ok(outputs)
    }

    fn evaluate(&self, inputs: &[bool]) -> Result<Vec<Option<bool>>> {
        if inputs.len() != self.netlist.inputs.len() {
            return Err(NetlistError::InputCount {
                expected: self.netlist.inputs.len(),
                found: inputs.len(),
            });
        }

        let mut values: Vec<Option<bool>> = self
            .netlist
            .nets
            .iter()
            .map(|net| match net.driver {
                Some(NetDriver::Clock) => Some(false),
                Some(NetDriver::Tie(value)) => Some(value),
                Some(NetDriver::PrimaryInput(position)) => inputs.get(position).copied(),
                Some(NetDriver::Register(id)) => self.state.get(id.0 as usize).copied(),
                Some(NetDriver::Gate(_)) | None => None,
            })
            .collect();

        for gate in &self.netlist.gates {
            let operands = gate
                .inputs
                .iter()
                .map(|net| self.read(&values, net.0 as usize))
                .collect::<Result<Vec<_>>>()?;
            let slot = values
                .get_mut(gate.output.0 as usize)
                .ok_or(NetlistError::DanglingNet(gate.output.0))?;
            *slot = Some(gate.kind.eval(&operands));
        }

        Ok(values)
    }

    fn read(&self, values: &[Option<bool>], index: usize) -> Result<bool> {
        let net = self
            .netlist
            .nets
            .get(index)
            .ok_or(NetlistError::DanglingNet(index as u32))?;
        values
            .get(index)
            .copied()
            .flatten()
            .ok_or_else(|| NetlistError::UnresolvedNet(net.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::{GateKind, NetId};

    /// One-bit toggle flip-flop with enable: next = q ^ en as SOP
    fn toggle_with_enable() -> Netlist {
        let mut netlist = Netlist::new("t", "clk");
        let lo = netlist.tie(false).unwrap();
        let (reg, q) = netlist.add_register("q", lo, false).unwrap();
        let en = netlist.add_input("en").unwrap();
        let nq = netlist.add_gate(GateKind::Not, vec![q]).unwrap();
        let nen = netlist.add_gate(GateKind::Not, vec![en]).unwrap();
        let a = netlist.add_gate(GateKind::And, vec![q, nen]).unwrap();
        let b = netlist.add_gate(GateKind::And, vec![nq, en]).unwrap();
        let d = netlist.add_gate(GateKind::Or, vec![a, b]).unwrap();
        netlist.set_register_input(reg, d);
        netlist.add_output("y", q);
        netlist
    }

    #[test]
    fn test_toggle_sequence() {
        let netlist = toggle_with_enable();
        let mut sim = Simulator::new(&netlist);

        assert_eq!(sim.step(&[true]).unwrap(), vec![false]);
        assert_eq!(sim.step(&[false]).unwrap(), vec![true]);
        assert_eq!(sim.step(&[true]).unwrap(), vec![true]);
        assert_eq!(sim.outputs(&[false]).unwrap(), vec![false]);
        assert_eq!(sim.cycle(), 3);

        sim.reset();
        assert_eq!(sim.state(), &[false]);
        assert_eq!(sim.cycle(), 0);
    }

    #[test]
    fn test_input_count_checked() {
        let netlist = toggle_with_enable();
        let sim = Simulator::new(&netlist);
        assert_eq!(
            sim.outputs(&[]),
            Err(NetlistError::InputCount {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_undriven_net_reported() {
        let mut netlist = Netlist::new("t", "clk");
        let floating = netlist.add_net("floating", None).unwrap();
        let (_, q) = netlist.add_register("q", floating, true).unwrap();
        netlist.add_output("y", q);

        let mut sim = Simulator::new(&netlist);
        assert_eq!(sim.outputs(&[]).unwrap(), vec![true]);
        assert_eq!(
            sim.step(&[]),
            Err(NetlistError::UnresolvedNet("floating".to_string()))
        );
    }

    #[test]
    fn test_gate_output_outside_net_table() {
        let mut netlist = toggle_with_enable();
        netlist.gates[0].output = NetId(42);

        let mut sim = Simulator::new(&netlist);
        assert_eq!(sim.step(&[true]), Err(NetlistError::DanglingNet(42)));
        assert_eq!(sim.cycle(), 0);
    }

    #[test]
    fn test_output_pin_outside_net_table() {
        let mut netlist = toggle_with_enable();
        netlist.outputs[0].net = NetId(7);

        let sim = Simulator::new(&netlist);
        assert_eq!(sim.outputs(&[false]), Err(NetlistError::DanglingNet(7)));
    }
}
