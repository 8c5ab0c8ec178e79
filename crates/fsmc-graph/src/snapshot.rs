//! Snapshot interchange between the editor and the synthesizer
//!
//! A snapshot is the JSON document an editor hands over when synthesis is
//! requested. Editor ids are arbitrary strings; loading resolves them through
//! a lookup table and mints fresh per-machine ids in list order, so the same
//! document always produces the same [`Fsm`].

use crate::error::{GraphError, Result};
use crate::model::{Fsm, MachineType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Serialized form of a Moore machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsmSnapshot {
    /// Machine flavour
    #[serde(rename = "type", default)]
    pub machine_type: MachineType,
    /// States in encoding order
    pub states: Vec<StateSnapshot>,
    /// Transitions
    #[serde(default)]
    pub transitions: Vec<TransitionSnapshot>,
}

/// Serialized state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Editor-side id, referenced by transitions
    pub id: String,
    /// Display name
    pub name: String,
    /// Moore output symbol
    #[serde(default)]
    pub output: String,
    #[serde(default, alias = "isInitial")]
    pub initial: bool,
    #[serde(default, alias = "isAccept")]
    pub accept: bool,
}

/// Serialized transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub from: String,
    pub to: String,
    pub input: String,
}

impl FsmSnapshot {
    /// Parse a snapshot from a JSON string
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| GraphError::Parse(e.to_string()))
    }

    /// Read and parse a snapshot file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path.as_ref()).map_err(|e| GraphError::Io(e.to_string()))?;
        Self::from_json(&contents)
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Parse(e.to_string()))
    }
}

impl Fsm {
    /// Build a machine from a snapshot
    ///
    /// A transition naming a state id the snapshot never declared is a
    /// contract violation of the editor and fails the whole load. Snapshot
    /// transitions bypass the determinism check of [`Fsm::add_transition`];
    /// conflicts are reported by the validator instead.
    pub fn from_snapshot(snapshot: &FsmSnapshot) -> Result<Fsm> {
        let mut fsm = Fsm::new();
        fsm.machine_type = snapshot.machine_type;
        let mut ids = IndexMap::new();

        for state in &snapshot.states {
            if ids.contains_key(state.id.as_str()) {
                return Err(GraphError::DuplicateStateRef(state.id.clone()));
            }
            let id = fsm.insert_loaded_state(
                state.name.clone(),
                state.output.clone(),
                state.initial,
                state.accept,
            );
            ids.insert(state.id.as_str(), id);
        }

        for transition in &snapshot.transitions {
            let from = *ids
                .get(transition.from.as_str())
                .ok_or_else(|| GraphError::UnknownStateRef(transition.from.clone()))?;
            let to = *ids
                .get(transition.to.as_str())
                .ok_or_else(|| GraphError::UnknownStateRef(transition.to.clone()))?;
            fsm.insert_loaded_transition(from, to, transition.input.clone());
        }

        debug!(
            "Loaded snapshot with {} states and {} transitions",
            fsm.state_count(),
            fsm.transition_count()
        );
        Ok(fsm)
    }

    /// Capture the machine as a snapshot
    pub fn to_snapshot(&self) -> FsmSnapshot {
        FsmSnapshot {
            machine_type: self.machine_type,
            states: self
                .states()
                .iter()
                .map(|s| StateSnapshot {
                    id: s.id.to_string(),
                    name: s.name.clone(),
                    output: s.output.clone(),
                    initial: s.is_initial,
                    accept: s.is_accept,
                })
                .collect(),
            transitions: self
                .transitions()
                .iter()
                .map(|t| TransitionSnapshot {
                    from: t.from.to_string(),
                    to: t.to.to_string(),
                    input: t.input.clone(),
                })
                .collect(),
        }
    }
}
