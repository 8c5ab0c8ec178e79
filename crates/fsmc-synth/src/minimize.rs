//! Hand-off between the truth table and a boolean minimizer
//!
//! ```text
//! TruthTable ─> problems() ─> [MinimizationProblem; state_bits + output_bits]
//!                                   │
//!                                   ▼  Minimizer (per bit, optionally on rayon)
//!                             SumOfProducts ─> minimize_all() ─> MinimizedLogic
//! ```
//!
//! Every next-state bit and every output bit becomes an independent
//! single-output problem over the current-state bits followed by the input
//! bits. Assignments that never occur in the table (unused state codes,
//! unused input codes) belong to the off-set; no don't-cares are emitted.

use crate::truth_table::{BitTarget, TruthTable};
use fsmc_netlist::{assignment_bits, assignment_index, MinimizedLogic, Product, SumOfProducts};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Assignments are packed into a `u64`, one bit per variable
pub const MAX_VARIABLES: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinimizeError {
    /// The minimizer gave up on a problem
    #[error("{minimizer} failed on {target}: {reason}")]
    Failed {
        minimizer: String,
        target: BitTarget,
        reason: String,
    },

    /// The returned expression uses a variable the problem never declared
    #[error("Expression for {target} references variable {var}; only {available} are declared")]
    UnknownVariable {
        target: BitTarget,
        var: usize,
        available: usize,
    },

    /// The returned expression disagrees with the truth table
    #[error("Expression for {target} disagrees with the table at assignment {assignment} (expected {expected})")]
    Mismatch {
        target: BitTarget,
        assignment: String,
        expected: bool,
    },
}

// ============================================================================
// Problems
// ============================================================================

/// One table row projected onto a single target bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRow {
    /// Packed variable values, variable 0 in the most significant position
    pub assignment: u64,
    pub value: bool,
}

/// Single-output minimization problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimizationProblem {
    pub target: BitTarget,
    /// Variable names in assignment order
    pub variables: Vec<String>,
    pub rows: Vec<ProblemRow>,
    /// Always empty: unlisted assignments are off-set
    pub dont_cares: Vec<u64>,
}

impl MinimizationProblem {
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Assignments for which the target is 1, in row order
    pub fn minterms(&self) -> Vec<u64> {
        self.rows
            .iter()
            .filter(|r| r.value)
            .map(|r| r.assignment)
            .collect()
    }
}

/// One problem per next-state bit, then one per output bit
pub fn problems(table: &TruthTable) -> Vec<MinimizationProblem> {
    let variables = table.variable_names();
    let assignments: Vec<u64> = table
        .rows
        .iter()
        .map(|r| assignment_index(&r.assignment()))
        .collect();

    table
        .targets()
        .into_iter()
        .map(|target| MinimizationProblem {
            target,
            variables: variables.clone(),
            rows: assignments
                .iter()
                .zip(table.column(target))
                .map(|(&assignment, value)| ProblemRow { assignment, value })
                .collect(),
            dont_cares: Vec::new(),
        })
        .collect()
}

// ============================================================================
// Minimizers
// ============================================================================

/// A boolean minimizer
///
/// Implementations must be callable from several threads at once; one call
/// is made per target bit.
pub trait Minimizer: Send + Sync {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Produce a sum of products covering exactly the problem's minterms
    fn minimize(&self, problem: &MinimizationProblem) -> Result<SumOfProducts, MinimizeError>;
}

/// One full minterm per on-set assignment
///
/// Exact but unminimized. Used when no external minimizer is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct MintermCover;

impl Minimizer for MintermCover {
    fn name(&self) -> &str {
        "minterm-cover"
    }

    fn minimize(&self, problem: &MinimizationProblem) -> Result<SumOfProducts, MinimizeError> {
        let mut minterms = problem.minterms();
        minterms.sort_unstable();
        minterms.dedup();
        let products = minterms
            .into_iter()
            .map(|m| Product::minterm(m, problem.num_vars()))
            .collect();
        Ok(SumOfProducts::new(products))
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Solve every bit problem of a table and join the results in bit order
pub fn minimize_all(
    table: &TruthTable,
    minimizer: &dyn Minimizer,
    parallel: bool,
    verify: bool,
) -> Result<MinimizedLogic, MinimizeError> {
    let problems = problems(table);
    info!(
        "Minimizing {} functions of {} variables with {}{}",
        problems.len(),
        table.num_variables(),
        minimizer.name(),
        if parallel { " (parallel)" } else { "" }
    );

    let mut functions = if parallel {
        problems
            .par_iter()
            .map(|p| solve(minimizer, p, verify))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        problems
            .iter()
            .map(|p| solve(minimizer, p, verify))
            .collect::<Result<Vec<_>, _>>()?
    };

    let outputs = functions.split_off(table.state_bits.min(functions.len()));
    Ok(MinimizedLogic {
        next_state: functions,
        outputs,
    })
}

fn solve(
    minimizer: &dyn Minimizer,
    problem: &MinimizationProblem,
    verify: bool,
) -> Result<SumOfProducts, MinimizeError> {
    let function = minimizer.minimize(problem)?;

    if let Some(var) = function.max_var() {
        if var >= problem.num_vars() {
            return Err(MinimizeError::UnknownVariable {
                target: problem.target,
                var,
                available: problem.num_vars(),
            });
        }
    }

    if verify {
        for row in &problem.rows {
            let values = assignment_bits(row.assignment, problem.num_vars());
            if function.eval(&values) != row.value {
                return Err(MinimizeError::Mismatch {
                    target: problem.target,
                    assignment: values.iter().map(|&b| if b { '1' } else { '0' }).collect(),
                    expected: row.value,
                });
            }
        }
        trace!("{} verified over {} rows", problem.target, problem.rows.len());
    }

    debug!(
        "{} = {} ({} products, {} literals)",
        problem.target,
        function.display_with(&problem.variables),
        function.products.len(),
        function.literal_count()
    );
    Ok(function)
}
