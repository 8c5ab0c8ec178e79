//! Binary encoding of states and input symbols
//!
//! States are numbered in machine order; input symbols are numbered in
//! ascending lexicographic order. Both use the narrowest width that fits,
//! never less than one bit. Codes live in ordered maps, so encoding the same
//! machine twice always yields identical results.

use fsmc_graph::{State, StateId, Transition};
use fsmc_netlist::assignment_bits;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Bits needed to number `count` items: `max(1, ceil(log2(count)))`
pub fn code_width(count: usize) -> usize {
    if count <= 2 {
        1
    } else {
        (usize::BITS - (count - 1).leading_zeros()) as usize
    }
}

// ============================================================================
// Bit patterns
// ============================================================================

/// Fixed-width bit pattern, most significant bit first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Bits(Vec<bool>);

impl Bits {
    /// `value` as a zero-padded pattern of `width` bits
    pub fn from_value(value: u64, width: usize) -> Self {
        Self(assignment_bits(value, width))
    }

    /// Parse a string of `0`/`1` characters
    pub fn parse(s: &str) -> Option<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Parse and left-pad with zeros to `width`
    pub fn zero_padded(s: &str, width: usize) -> Option<Self> {
        let bits = Self::parse(s)?;
        if bits.width() >= width {
            return Some(bits);
        }
        let mut padded = vec![false; width - bits.width()];
        padded.extend(bits.0);
        Some(Self(padded))
    }

    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Bit at `position`, 0 being the most significant
    pub fn get(&self, position: usize) -> bool {
        self.0.get(position).copied().unwrap_or(false)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Numeric value of the pattern
    pub fn value(&self) -> u64 {
        self.0.iter().fold(0, |acc, &b| (acc << 1) | u64::from(b))
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl From<Bits> for String {
    fn from(bits: Bits) -> Self {
        bits.to_string()
    }
}

impl TryFrom<String> for Bits {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Bits::parse(&s).ok_or_else(|| format!("'{}' is not a bit pattern", s))
    }
}

// ============================================================================
// State encoding
// ============================================================================

/// Code assigned to every state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEncoding {
    width: usize,
    codes: IndexMap<StateId, Bits>,
}

impl StateEncoding {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn code(&self, id: StateId) -> Option<&Bits> {
        self.codes.get(&id)
    }

    /// Codes in encoding order
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &Bits)> + '_ {
        self.codes.iter().map(|(id, code)| (*id, code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Number states in the given order
pub fn encode_states(states: &[State]) -> StateEncoding {
    let width = code_width(states.len());
    let codes = states
        .iter()
        .enumerate()
        .map(|(index, state)| (state.id, Bits::from_value(index as u64, width)))
        .collect();
    debug!("Encoded {} states in {} bits", states.len(), width);
    StateEncoding { width, codes }
}

// ============================================================================
// Input encoding
// ============================================================================

/// Code assigned to every distinct input symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEncoding {
    width: usize,
    codes: IndexMap<String, Bits>,
}

impl InputEncoding {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn code(&self, symbol: &str) -> Option<&Bits> {
        self.codes.get(symbol)
    }

    /// Symbols and codes in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bits)> + '_ {
        self.codes.iter().map(|(symbol, code)| (symbol.as_str(), code))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.codes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Number the distinct input symbols of `transitions` in sorted order
pub fn encode_inputs(transitions: &[Transition]) -> InputEncoding {
    let alphabet: BTreeSet<&str> = transitions.iter().map(|t| t.input.as_str()).collect();
    let width = code_width(alphabet.len());
    let codes = alphabet
        .into_iter()
        .enumerate()
        .map(|(index, symbol)| (symbol.to_string(), Bits::from_value(index as u64, width)))
        .collect::<IndexMap<_, _>>();
    debug!("Encoded {} input symbols in {} bits", codes.len(), width);
    InputEncoding { width, codes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmc_graph::Fsm;

    fn machine(states: usize, inputs: &[&str]) -> Fsm {
        let mut fsm = Fsm::new();
        let ids: Vec<StateId> = (0..states).map(|_| fsm.add_state("0")).collect();
        for (i, input) in inputs.iter().enumerate() {
            fsm.add_transition(ids[i % states], ids[(i + 1) % states], *input)
                .unwrap();
        }
        fsm
    }

    #[test]
    fn test_width_boundaries() {
        assert_eq!(code_width(0), 1);
        assert_eq!(code_width(1), 1);
        assert_eq!(code_width(2), 1);
        assert_eq!(code_width(3), 2);
        assert_eq!(code_width(4), 2);
        assert_eq!(code_width(5), 3);
        assert_eq!(code_width(8), 3);
        assert_eq!(code_width(9), 4);
    }

    #[test]
    fn test_state_codes_follow_order() {
        let fsm = machine(5, &["a"]);
        let enc = encode_states(fsm.states());
        assert_eq!(enc.width(), 3);
        let codes: Vec<String> = enc.iter().map(|(_, c)| c.to_string()).collect();
        assert_eq!(codes, vec!["000", "001", "010", "011", "100"]);
    }

    #[test]
    fn test_input_codes_sorted() {
        let fsm = machine(3, &["go", "abort", "go", "wait"]);
        let enc = encode_inputs(fsm.transitions());
        assert_eq!(enc.width(), 2);
        let codes: Vec<(String, String)> = enc
            .iter()
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("abort".to_string(), "00".to_string()),
                ("go".to_string(), "01".to_string()),
                ("wait".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_input_symbol_uses_one_bit() {
        let fsm = machine(2, &["tick"]);
        let enc = encode_inputs(fsm.transitions());
        assert_eq!(enc.width(), 1);
        assert_eq!(enc.code("tick").unwrap().to_string(), "0");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let fsm = machine(4, &["b", "a", "c", "a"]);
        assert_eq!(encode_states(fsm.states()), encode_states(fsm.states()));
        assert_eq!(
            encode_inputs(fsm.transitions()),
            encode_inputs(fsm.transitions())
        );
    }

    #[test]
    fn test_bits_padding_and_value() {
        let bits = Bits::zero_padded("101", 5).unwrap();
        assert_eq!(bits.to_string(), "00101");
        assert_eq!(bits.value(), 5);
        assert!(bits.get(2));
        assert!(Bits::parse("10x").is_none());
        assert_eq!(Bits::zero_padded("11", 1).unwrap().to_string(), "11");
    }

    #[test]
    fn test_bits_serialize_as_string() {
        let bits = Bits::from_value(2, 3);
        assert_eq!(serde_json::to_string(&bits).unwrap(), "\"010\"");
        let back: Bits = serde_json::from_str("\"010\"").unwrap();
        assert_eq!(back, bits);
    }
}
