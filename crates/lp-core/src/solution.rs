//! Typed, named-constructor results for each of the five public operations.
//! Each engine gets its own result shape rather than one shared `Solution`:
//! a B&B run's log and node count mean nothing to a cutting-plane caller.

use crate::error::SolveError;
use crate::primal::Iteration;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimalResult {
    pub iterations: Vec<Iteration>,
    pub x: Vec<f64>,
    pub objective: f64,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DualResult {
    pub iterations: Vec<Iteration>,
}

/// One explored branch-and-bound node, kept for the caller's inspection and
/// for building `log`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BnBNode {
    pub label: String,
    pub depth: usize,
    pub x: Vec<f64>,
    pub objective: f64,
    pub is_integer: bool,
    pub infeasible: bool,
    pub solver_used: &'static str,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BnBResult {
    pub best_x: Vec<f64>,
    pub best_objective: f64,
    pub feasible: bool,
    pub nodes_explored: usize,
    pub nodes: Vec<BnBNode>,
    pub log: String,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CuttingPlaneResult {
    pub x_opt: Vec<f64>,
    pub z_opt: f64,
    pub cuts_added: usize,
    pub tableaus: Vec<Vec<Vec<f64>>>,
    pub logs: Vec<String>,
    /// Set when the loop had to stop early (iteration cap, zero pivot, …);
    /// the fields above still hold the best result found before the failure.
    pub failure: Option<SolveError>,
}

/// Terminal status of a [`KnapsackNode`] (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnapsackStatus {
    Unsolved,
    Unbranched,
    Branched,
    Candidate,
    Infeasible,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnapsackNode {
    pub label: String,
    pub parent_label: Option<String>,
    pub status: KnapsackStatus,
    /// `variable index -> fixed value` decided along the path to this node.
    pub fixed: Vec<(usize, u8)>,
    pub fractional_var: Option<usize>,
    pub x: Vec<f64>,
    pub objective: f64,
    pub weight_used: f64,
}

/// Why `solve_knapsack` declined to run, returned as data per §7.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotApplicableReason {
    NotMaximize,
    WrongConstraintCount { found: usize },
    NotSingleCapacityConstraint,
    NonBinaryVariable { index: usize },
    NegativeWeightOrCapacity,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnapsackResult {
    pub nodes: Vec<KnapsackNode>,
    pub best_candidate: Option<KnapsackNode>,
    pub not_applicable: Option<NotApplicableReason>,
}

impl KnapsackResult {
    pub fn not_applicable(reason: NotApplicableReason) -> Self {
        Self {
            nodes: Vec::new(),
            best_candidate: None,
            not_applicable: Some(reason),
        }
    }
}
