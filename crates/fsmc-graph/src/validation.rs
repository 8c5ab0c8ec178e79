//! Structural validation of a machine before synthesis
//!
//! Errors block synthesis; warnings are advisory and the caller decides
//! whether to proceed. Validation is a pure function of the graph.

use crate::model::{Fsm, StateId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Whether an issue blocks synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Category of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// Fewer than two states
    TooFewStates,
    /// No transitions at all
    NoTransitions,
    /// No state is flagged initial
    NoInitialState,
    /// More than one state is flagged initial
    MultipleInitialStates,
    /// Two display names collide
    DuplicateStateName,
    /// Output symbol is not a bit pattern
    NonBinaryOutput,
    /// Same source and input lead to different destinations
    ConflictingTransitions,
    /// State has no outgoing transitions
    OrphanState,
    /// State lacks a transition for an input used elsewhere
    IncompleteCoverage,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::OrphanState | IssueKind::IncompleteCoverage => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// State the finding is about, if any
    pub state: Option<StateId>,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when there are no errors
    pub valid: bool,
    /// Blocking findings
    pub errors: Vec<ValidationIssue>,
    /// Advisory findings
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn push(&mut self, kind: IssueKind, state: Option<StateId>, message: String) {
        let issue = ValidationIssue {
            kind,
            state,
            message,
        };
        match kind.severity() {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
        self.valid = self.errors.is_empty();
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.message.clone()).collect()
    }

    /// True if any error or warning has the given kind
    pub fn contains(&self, kind: IssueKind) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|i| i.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "error: {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {}", warning)?;
        }
        Ok(())
    }
}

/// Check a machine's structure for synthesis
pub fn validate(fsm: &Fsm) -> ValidationReport {
    let mut report = ValidationReport {
        valid: true,
        ..Default::default()
    };

    if fsm.state_count() < 2 {
        report.push(
            IssueKind::TooFewStates,
            None,
            "Need at least 2 states".to_string(),
        );
    }
    if fsm.transition_count() == 0 {
        report.push(
            IssueKind::NoTransitions,
            None,
            "Need at least 1 transition".to_string(),
        );
    }

    let initial: Vec<&str> = fsm
        .states()
        .iter()
        .filter(|s| s.is_initial)
        .map(|s| s.name.as_str())
        .collect();
    match initial.len() {
        0 => report.push(
            IssueKind::NoInitialState,
            None,
            "No initial state set".to_string(),
        ),
        1 => {}
        _ => report.push(
            IssueKind::MultipleInitialStates,
            None,
            format!("Multiple initial states: {}", initial.join(", ")),
        ),
    }

    let mut seen_names = HashSet::new();
    for state in fsm.states() {
        if !seen_names.insert(state.name.as_str()) {
            report.push(
                IssueKind::DuplicateStateName,
                Some(state.id),
                format!("State name \"{}\" is used by more than one state", state.name),
            );
        }
        if !state.has_binary_output() {
            report.push(
                IssueKind::NonBinaryOutput,
                Some(state.id),
                format!(
                    "State \"{}\" has non-binary output \"{}\"",
                    state.name, state.output
                ),
            );
        }
    }

    check_determinism(fsm, &mut report);
    check_coverage(fsm, &mut report);

    report
}

fn check_determinism(fsm: &Fsm, report: &mut ValidationReport) {
    let mut reported = HashSet::new();
    for (index, transition) in fsm.transitions().iter().enumerate() {
        let conflict = fsm.transitions()[..index].iter().any(|t| {
            t.from == transition.from && t.input == transition.input && t.to != transition.to
        });
        if conflict && reported.insert((transition.from, transition.input.as_str())) {
            let name = fsm
                .state(transition.from)
                .map(|s| s.name.as_str())
                .unwrap_or("?");
            report.push(
                IssueKind::ConflictingTransitions,
                Some(transition.from),
                format!(
                    "State \"{}\" has conflicting transitions on input \"{}\"",
                    name, transition.input
                ),
            );
        }
    }
}

fn check_coverage(fsm: &Fsm, report: &mut ValidationReport) {
    for state in fsm.states() {
        if fsm.transitions_from(state.id).next().is_none() {
            report.push(
                IssueKind::OrphanState,
                Some(state.id),
                format!("State \"{}\" has no outgoing transitions", state.name),
            );
        }
    }

    // Inputs in the order the editor first used them
    let alphabet: IndexSet<&str> = fsm.transitions().iter().map(|t| t.input.as_str()).collect();

    for state in fsm.states() {
        let covered: HashSet<&str> = fsm
            .transitions_from(state.id)
            .map(|t| t.input.as_str())
            .collect();

        let missing: Vec<&str> = alphabet
            .iter()
            .copied()
            .filter(|input| !covered.contains(input))
            .collect();
        if !missing.is_empty() {
            report.push(
                IssueKind::IncompleteCoverage,
                Some(state.id),
                format!(
                    "State \"{}\" missing transitions for inputs: {}",
                    state.name,
                    missing.join(", ")
                ),
            );
        }
    }
}
