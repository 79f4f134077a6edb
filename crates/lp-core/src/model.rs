//! Canonical representation of an LP/ILP problem handed to the solvers.
//!
//! The model is immutable once built: every solver clones-on-normalize
//! rather than mutating it in place.

use crate::error::SolveError;

/// Whether the objective is maximized or minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    Maximize,
    Minimize,
}

/// The domain a decision variable ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableType {
    /// x >= 0, any real value.
    ContinuousNonNegative,
    /// x <= 0, any real value.
    ContinuousNonPositive,
    /// x >= 0, integer-valued at the optimum.
    Integer,
    /// x in {0, 1}.
    Binary,
}

impl VariableType {
    /// Whether this type participates in integrality checks and branching.
    pub fn is_integral(self) -> bool {
        matches!(self, VariableType::Integer | VariableType::Binary)
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    pub name: String,
    /// Coefficient of this variable in the objective function.
    pub coefficient: f64,
    pub var_type: VariableType,
}

/// Comparison operator of a constraint's relation to its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

/// A single branching bound accumulated along a branch-and-bound path, or
/// injected directly by a caller that wants to pin a variable before
/// solving.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    pub var_index: usize,
    pub is_upper: bool,
    pub value: f64,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    pub sense: Objective,
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
}

impl Model {
    pub fn new(sense: Objective, variables: Vec<Variable>) -> Self {
        Self {
            sense,
            variables,
            constraints: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            coefficients,
            relation,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Every constraint's coefficient vector must have one entry per variable.
    pub fn validate(&self) -> Result<(), SolveError> {
        for (index, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != self.variables.len() {
                return Err(SolveError::MalformedModel {
                    index,
                    expected: self.variables.len(),
                    got: c.coefficients.len(),
                });
            }
        }
        Ok(())
    }

    /// +1 for every variable except `ContinuousNonPositive`, which is solved
    /// internally as `-y` with `y >= 0` and flipped back on the way out.
    pub fn sign_flip(&self) -> Vec<f64> {
        self.variables
            .iter()
            .map(|v| {
                if v.var_type == VariableType::ContinuousNonPositive {
                    -1.0
                } else {
                    1.0
                }
            })
            .collect()
    }

    /// Undo `sign_flip` on a vector of values extracted from a canonical tableau.
    pub fn unflip(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.sign_flip())
            .map(|(&xi, s)| xi * s)
            .collect()
    }

    /// Sum of the original (un-canonicalized) objective coefficients against `x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(x)
            .map(|(v, &xi)| v.coefficient * xi)
            .sum()
    }
}
