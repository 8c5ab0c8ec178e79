//! FSM graph model
//!
//! States and transitions live in a per-machine arena. Ids are minted from
//! counters owned by the [`Fsm`] itself, and transitions refer to states by
//! id only, so the model never holds ownership cycles. State order is
//! significant: it is the order in which states are encoded.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of a state within one machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u32);

/// Stable identifier of a transition within one machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

// ============================================================================
// States and Transitions
// ============================================================================

/// Machine flavour. Only Moore machines are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineType {
    /// Outputs depend on the current state only
    #[default]
    Moore,
}

/// A state of a Moore machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Stable identifier
    pub id: StateId,
    /// Display name, unique among states
    pub name: String,
    /// Moore output symbol, a pattern of `0`/`1` characters
    pub output: String,
    /// Reset state of the machine
    pub is_initial: bool,
    /// Accepting state. Carried through, not used by synthesis.
    pub is_accept: bool,
}

impl State {
    /// Output symbol as synthesized. An empty symbol reads as `"0"`.
    pub fn output_bits(&self) -> &str {
        if self.output.is_empty() {
            "0"
        } else {
            &self.output
        }
    }

    /// True if the output symbol is a pattern of `0`/`1` characters
    pub fn has_binary_output(&self) -> bool {
        self.output_bits().chars().all(|c| c == '0' || c == '1')
    }
}

/// A labeled edge between two states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Stable identifier
    pub id: TransitionId,
    /// Source state
    pub from: StateId,
    /// Destination state
    pub to: StateId,
    /// Input symbol that triggers the transition
    pub input: String,
}

impl Transition {
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

// ============================================================================
// Machine
// ============================================================================

/// A Moore finite-state machine
///
/// The structural invariants synthesis relies on (at least two states, at
/// least one transition, exactly one initial state) are checked by
/// [`crate::validate`], not by this type. The determinism invariant (one
/// transition per source state and input) is enforced by
/// [`Fsm::add_transition`] and re-checked by the validator for machines
/// loaded from snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fsm {
    /// Machine flavour
    pub machine_type: MachineType,
    states: Vec<State>,
    transitions: Vec<Transition>,
    next_state_id: u32,
    next_transition_id: u32,
    name_counter: u32,
}

impl Fsm {
    /// Create an empty Moore machine
    pub fn new() -> Self {
        Self::default()
    }

    /// States in encoding order
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Transitions in insertion order
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Get a state by id
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Get a state by display name
    pub fn state_by_name(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Position of a state in encoding order
    pub fn state_index(&self, id: StateId) -> Option<usize> {
        self.states.iter().position(|s| s.id == id)
    }

    /// Get a transition by id
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// First state flagged initial
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    /// All transitions leaving `id`
    pub fn transitions_from(&self, id: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(move |t| t.from == id)
    }

    /// The transition leaving `id` on `input`, if any
    pub fn outgoing(&self, id: StateId, input: &str) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.from == id && t.input == input)
    }

    /// Distinct input symbols across all transitions, sorted ascending
    pub fn input_alphabet(&self) -> Vec<&str> {
        self.transitions
            .iter()
            .map(|t| t.input.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// True if some state other than `exclude` already uses `name`
    pub fn has_state_name(&self, name: &str, exclude: Option<StateId>) -> bool {
        self.states
            .iter()
            .any(|s| s.name == name && Some(s.id) != exclude)
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Add a state with a generated `S<n>` name
    ///
    /// The first state added to an empty machine becomes the initial state.
    pub fn add_state(&mut self, output: impl Into<String>) -> StateId {
        let name = loop {
            let candidate = format!("S{}", self.name_counter);
            self.name_counter += 1;
            if !self.has_state_name(&candidate, None) {
                break candidate;
            }
        };
        self.push_state(name, output.into())
    }

    /// Add a state with an explicit display name
    pub fn add_named_state(
        &mut self,
        name: impl Into<String>,
        output: impl Into<String>,
    ) -> Result<StateId> {
        let name = name.into();
        if self.has_state_name(&name, None) {
            return Err(GraphError::DuplicateStateName(name));
        }
        self.name_counter += 1;
        Ok(self.push_state(name, output.into()))
    }

    fn push_state(&mut self, name: String, output: String) -> StateId {
        let id = StateId(self.next_state_id);
        self.next_state_id += 1;
        let is_initial = self.states.is_empty();
        debug!("Adding state {} ({}), initial: {}", name, id, is_initial);
        self.states.push(State {
            id,
            name,
            output,
            is_initial,
            is_accept: false,
        });
        id
    }

    /// Add a transition `from --input--> to`
    ///
    /// Rejected, leaving the machine unchanged, when an endpoint is unknown,
    /// when the exact transition already exists, or when `from` already has
    /// a transition on `input` to a different destination.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        input: impl Into<String>,
    ) -> Result<TransitionId> {
        let input = input.into();
        let from_name = self.name_of(from)?.to_string();
        let to_name = self.name_of(to)?.to_string();

        if let Some(existing) = self.outgoing(from, &input) {
            if existing.to == to {
                return Err(GraphError::DuplicateTransition {
                    from: from_name,
                    to: to_name,
                    input,
                });
            }
            return Err(GraphError::ConflictingTransition {
                from: from_name,
                input,
                existing: self.name_of(existing.to)?.to_string(),
                requested: to_name,
            });
        }

        Ok(self.push_transition(from, to, input))
    }

    fn push_transition(&mut self, from: StateId, to: StateId, input: String) -> TransitionId {
        let id = TransitionId(self.next_transition_id);
        self.next_transition_id += 1;
        self.transitions.push(Transition {
            id,
            from,
            to,
            input,
        });
        id
    }

    /// Remove a state and every transition touching it
    ///
    /// If the removed state was initial, the first remaining state becomes
    /// initial.
    pub fn remove_state(&mut self, id: StateId) -> Result<State> {
        let index = self.state_index(id).ok_or(GraphError::UnknownState(id))?;
        self.transitions.retain(|t| t.from != id && t.to != id);
        let removed = self.states.remove(index);
        if removed.is_initial {
            if let Some(first) = self.states.first_mut() {
                first.is_initial = true;
            }
        }
        debug!("Removed state {} ({})", removed.name, id);
        Ok(removed)
    }

    /// Remove a single transition
    pub fn remove_transition(&mut self, id: TransitionId) -> Result<Transition> {
        let index = self
            .transitions
            .iter()
            .position(|t| t.id == id)
            .ok_or(GraphError::UnknownTransition(id))?;
        Ok(self.transitions.remove(index))
    }

    /// Make `id` the only initial state
    pub fn set_initial(&mut self, id: StateId) -> Result<()> {
        self.state_mut(id)?;
        for state in &mut self.states {
            state.is_initial = state.id == id;
        }
        Ok(())
    }

    /// Rename a state, keeping names unique
    pub fn rename_state(&mut self, id: StateId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.has_state_name(&name, Some(id)) {
            return Err(GraphError::DuplicateStateName(name));
        }
        self.state_mut(id)?.name = name;
        Ok(())
    }

    /// Change a state's Moore output symbol
    pub fn set_output(&mut self, id: StateId, output: impl Into<String>) -> Result<()> {
        self.state_mut(id)?.output = output.into();
        Ok(())
    }

    /// Mark or unmark a state as accepting
    pub fn set_accept(&mut self, id: StateId, accept: bool) -> Result<()> {
        self.state_mut(id)?.is_accept = accept;
        Ok(())
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State> {
        self.states
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(GraphError::UnknownState(id))
    }

    fn name_of(&self, id: StateId) -> Result<&str> {
        self.state(id)
            .map(|s| s.name.as_str())
            .ok_or(GraphError::UnknownState(id))
    }

    // ------------------------------------------------------------------------
    // Snapshot loading
    // ------------------------------------------------------------------------

    /// Append a fully-formed state, keeping its flags as given
    pub(crate) fn insert_loaded_state(
        &mut self,
        name: String,
        output: String,
        is_initial: bool,
        is_accept: bool,
    ) -> StateId {
        let id = StateId(self.next_state_id);
        self.next_state_id += 1;
        self.name_counter += 1;
        self.states.push(State {
            id,
            name,
            output,
            is_initial,
            is_accept,
        });
        id
    }

    /// Append a transition without the determinism check
    pub(crate) fn insert_loaded_transition(
        &mut self,
        from: StateId,
        to: StateId,
        input: String,
    ) -> TransitionId {
        self.push_transition(from, to, input)
    }
}
