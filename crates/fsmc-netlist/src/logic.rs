//! Two-level boolean logic in sum-of-products form
//!
//! Variables are numbered positions in an assignment. For an assignment of
//! `num_vars` variables packed into an integer, variable 0 is the most
//! significant bit, so the packed value reads the same as the bit string
//! `x0 x1 ... xn-1`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unpack an assignment index into per-variable values, variable 0 first
pub fn assignment_bits(index: u64, num_vars: usize) -> Vec<bool> {
    (0..num_vars)
        .map(|var| (index >> (num_vars - 1 - var)) & 1 == 1)
        .collect()
}

/// Pack per-variable values into an assignment index
pub fn assignment_index(values: &[bool]) -> u64 {
    values
        .iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

/// A variable or its complement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// Variable index
    pub var: usize,
    /// True for the complemented variable
    pub negated: bool,
}

impl Literal {
    pub fn positive(var: usize) -> Self {
        Self {
            var,
            negated: false,
        }
    }

    pub fn negative(var: usize) -> Self {
        Self { var, negated: true }
    }

    /// Value of the literal under an assignment
    pub fn eval(&self, values: &[bool]) -> bool {
        values.get(self.var).copied().unwrap_or(false) != self.negated
    }
}

/// Conjunction of literals. An empty product is the constant 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub literals: Vec<Literal>,
}

impl Product {
    pub fn new(mut literals: Vec<Literal>) -> Self {
        literals.sort();
        literals.dedup();
        Self { literals }
    }

    /// The minterm covering exactly one assignment
    pub fn minterm(index: u64, num_vars: usize) -> Self {
        let literals = assignment_bits(index, num_vars)
            .into_iter()
            .enumerate()
            .map(|(var, bit)| Literal { var, negated: !bit })
            .collect();
        Self { literals }
    }

    pub fn eval(&self, values: &[bool]) -> bool {
        self.literals.iter().all(|l| l.eval(values))
    }

    pub fn is_tautology(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Disjunction of products. An empty sum is the constant 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SumOfProducts {
    pub products: Vec<Product>,
}

impl SumOfProducts {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Constant 0
    pub fn zero() -> Self {
        Self::default()
    }

    /// Constant 1
    pub fn one() -> Self {
        Self {
            products: vec![Product::default()],
        }
    }

    pub fn eval(&self, values: &[bool]) -> bool {
        self.products.iter().any(|p| p.eval(values))
    }

    pub fn is_zero(&self) -> bool {
        self.products.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.products.iter().any(Product::is_tautology)
    }

    /// Highest variable index referenced, if any
    pub fn max_var(&self) -> Option<usize> {
        self.products
            .iter()
            .flat_map(|p| p.literals.iter().map(|l| l.var))
            .max()
    }

    /// Total number of literal occurrences
    pub fn literal_count(&self) -> usize {
        self.products.iter().map(|p| p.literals.len()).sum()
    }

    /// Render using caller-supplied variable names
    pub fn display_with(&self, names: &[String]) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        self.products
            .iter()
            .map(|p| {
                if p.is_tautology() {
                    return "1".to_string();
                }
                p.literals
                    .iter()
                    .map(|l| {
                        let name = names
                            .get(l.var)
                            .cloned()
                            .unwrap_or_else(|| format!("x{}", l.var));
                        if l.negated {
                            format!("!{}", name)
                        } else {
                            name
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for SumOfProducts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with(&[]))
    }
}

/// Minimized next-state and output functions of a machine, in bit order
///
/// Variables are the current-state bits followed by the input bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimizedLogic {
    /// One function per state register
    pub next_state: Vec<SumOfProducts>,
    /// One function per primary output
    pub outputs: Vec<SumOfProducts>,
}
