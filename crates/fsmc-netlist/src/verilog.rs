//! Structural Verilog output
//!
//! Emits one module per netlist: clock, input and output ports, a `reg`
//! per register, a continuous assignment per gate, and a single
//! `always @(posedge clk)` block updating every register.

use crate::error::{NetlistError, Result};
use crate::netlist::{GateKind, NetDriver, NetId, Netlist};

/// Render a netlist as a Verilog-2001 module
///
/// Fails if a register, gate or output refers to a net id the netlist
/// does not contain.
pub fn write_verilog(netlist: &Netlist) -> Result<String> {
    let mut out = String::new();
    let clock = wire(netlist, netlist.clock)?;

    let mut ports = vec![format!("    input wire {}", clock)];
    ports.extend(
        netlist
            .inputs
            .iter()
            .map(|i| format!("    input wire {}", identifier(&i.label))),
    );
    ports.extend(
        netlist
            .outputs
            .iter()
            .map(|o| format!("    output wire {}", identifier(&o.label))),
    );

    out.push_str("// Generated by fsmc\n");
    out.push_str(&format!("module {} (\n", identifier(&netlist.name)));
    out.push_str(&ports.join(",\n"));
    out.push_str("\n);\n");

    if !netlist.registers.is_empty() {
        out.push('\n');
        for register in &netlist.registers {
            out.push_str(&format!("    reg {};\n", identifier(&register.name)));
        }
    }

    let mut wires = String::new();
    for net in &netlist.nets {
        match net.driver {
            Some(NetDriver::Gate(_)) => {
                wires.push_str(&format!("    wire {};\n", identifier(&net.name)));
            }
            Some(NetDriver::Tie(value)) => {
                wires.push_str(&format!(
                    "    wire {} = 1'b{};\n",
                    identifier(&net.name),
                    u8::from(value)
                ));
            }
            _ => {}
        }
    }
    if !wires.is_empty() {
        out.push('\n');
        out.push_str(&wires);
    }

    if !netlist.gates.is_empty() {
        out.push('\n');
        for gate in &netlist.gates {
            let operands = gate
                .inputs
                .iter()
                .map(|n| wire(netlist, *n))
                .collect::<Result<Vec<_>>>()?;
            let expr = match gate.kind {
                GateKind::And => operands.join(" & "),
                GateKind::Or => operands.join(" | "),
                GateKind::Not => format!("~{}", operands.join("")),
            };
            out.push_str(&format!(
                "    assign {} = {};\n",
                wire(netlist, gate.output)?,
                expr
            ));
        }
    }

    if !netlist.outputs.is_empty() {
        out.push('\n');
        for output in &netlist.outputs {
            out.push_str(&format!(
                "    assign {} = {};\n",
                identifier(&output.label),
                wire(netlist, output.net)?
            ));
        }
    }

    if !netlist.registers.is_empty() {
        out.push_str("\n    initial begin\n");
        for register in &netlist.registers {
            out.push_str(&format!(
                "        {} = 1'b{};\n",
                identifier(&register.name),
                u8::from(register.init)
            ));
        }
        out.push_str("    end\n");

        out.push_str(&format!("\n    always @(posedge {}) begin\n", clock));
        for register in &netlist.registers {
            out.push_str(&format!(
                "        {} <= {};\n",
                identifier(&register.name),
                wire(netlist, register.d)?
            ));
        }
        out.push_str("    end\n");
    }

    out.push_str("endmodule\n");
    Ok(out)
}

/// Verilog name of a net
fn wire(netlist: &Netlist, id: NetId) -> Result<String> {
    netlist
        .net(id)
        .map(|net| identifier(&net.name))
        .ok_or(NetlistError::DanglingNet(id.0))
}

/// Map a name onto a legal Verilog identifier
fn identifier(name: &str) -> String {
    let mut id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::NetlistAssembler;
    use crate::logic::{Literal, MinimizedLogic, Product, SumOfProducts};

    #[test]
    fn test_toggle_module() {
        let logic = MinimizedLogic {
            next_state: vec![SumOfProducts::new(vec![Product::new(vec![
                Literal::negative(0),
                Literal::positive(1),
            ])])],
            outputs: vec![SumOfProducts::new(vec![Product::new(vec![
                Literal::positive(0),
            ])])],
        };
        let netlist = NetlistAssembler::new("toggle")
            .with_initial_state(vec![true])
            .assemble(1, 1, 1, Some(&logic))
            .unwrap();

        let verilog = write_verilog(&netlist).unwrap();
        assert!(verilog.contains("module toggle ("));
        assert!(verilog.contains("    input wire clk,\n    input wire in_0,\n    output wire out_0\n);"));
        assert!(verilog.contains("    reg state_0;"));
        assert!(verilog.contains("    assign not_0 = ~state_0;"));
        assert!(verilog.contains("    assign and_1 = not_0 & in_0;"));
        assert!(verilog.contains("    assign out_0 = state_0;"));
        assert!(verilog.contains("        state_0 = 1'b1;"));
        assert!(verilog.contains("    always @(posedge clk) begin\n        state_0 <= and_1;"));
        assert!(verilog.ends_with("endmodule\n"));
    }

    #[test]
    fn test_skeleton_ties_low() {
        let netlist = NetlistAssembler::new("skel").assemble(1, 1, 1, None).unwrap();
        let verilog = write_verilog(&netlist).unwrap();
        assert!(verilog.contains("    wire tie_lo = 1'b0;"));
        assert!(verilog.contains("        state_0 <= tie_lo;"));
        assert!(verilog.contains("    assign out_0 = tie_lo;"));
    }

    #[test]
    fn test_dangling_register_input() {
        let mut netlist = NetlistAssembler::new("bad").assemble(1, 1, 1, None).unwrap();
        netlist.registers[0].d = NetId(99);
        assert_eq!(write_verilog(&netlist), Err(NetlistError::DanglingNet(99)));
    }

    #[test]
    fn test_identifier_sanitized() {
        assert_eq!(identifier("traffic-light"), "traffic_light");
        assert_eq!(identifier("3way"), "_3way");
        assert_eq!(identifier(""), "_");
    }
}
