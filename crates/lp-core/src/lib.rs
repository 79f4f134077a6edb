mod branch_and_bound;
mod canon;
mod config;
mod cutting_plane;
mod dual;
mod error;
mod knapsack;
mod model;
mod primal;
mod solution;
mod tableau;

pub use canon::{build_tableau, canonicalize, CanonicalModel, CanonicalRow};
pub use config::{SolverConfig, FRAC_EPS, INT_EPS, PIVOT_EPS, ZERO_EPS};
pub use error::SolveError;
pub use model::{Bound, Constraint, Model, Objective, Relation, Variable, VariableType};
pub use primal::Iteration;
pub use solution::{
    BnBNode, BnBResult, CuttingPlaneResult, DualResult, KnapsackNode, KnapsackResult,
    KnapsackStatus, NotApplicableReason, PrimalResult,
};
pub use tableau::{format_cell, RowType, Tableau};

/// Build a fresh tableau from `model`, repair feasibility with Dual Simplex
/// if any RHS is negative (§2's data flow), then run Primal Simplex to
/// optimality. The returned iteration sequence is the dual repair's history
/// (if any, minus its duplicated starting tableau) followed by the primal
/// history.
pub fn solve_primal(model: &Model, cfg: &SolverConfig) -> Result<PrimalResult, SolveError> {
    let t = canon::build_tableau(model, &[])?;
    let (n_vars, n_rows, row_types) = (t.n_vars, t.n_rows, t.row_types.clone());

    let mut iterations = Vec::new();
    let t = if t.has_negative_rhs(cfg) {
        let dual_history = dual::solve(t, cfg)?;
        let last = dual_history.last().unwrap();
        let repaired = Tableau {
            data: last.tableau_data.clone(),
            basis: last.basis.clone(),
            n_vars,
            n_rows,
            row_types,
        };
        iterations.extend(dual_history);
        repaired
    } else {
        t
    };

    let primal_history = primal::solve(t, cfg)?;
    iterations.extend(primal_history.into_iter().skip(if iterations.is_empty() { 0 } else { 1 }));

    let last = iterations.last().unwrap();
    let x = model.unflip(&final_x(last, model.num_variables()));
    let objective = model.objective_value(&x);
    Ok(PrimalResult {
        iterations,
        x,
        objective,
    })
}

/// Run Dual Simplex on a caller-supplied tableau (which may already be
/// mid-pipeline, e.g. a B&B or cutting-plane tableau) until every RHS is
/// non-negative.
pub fn solve_dual(tableau: Tableau, cfg: &SolverConfig) -> Result<DualResult, SolveError> {
    let iterations = dual::solve(tableau, cfg)?;
    Ok(DualResult { iterations })
}

/// Depth-first Branch-and-Bound over `model`'s LP relaxations.
pub fn solve_branch_and_bound(model: &Model, cfg: &SolverConfig) -> Result<BnBResult, SolveError> {
    branch_and_bound::solve(model, cfg)
}

/// Gomory fractional cutting-plane loop over `model`.
pub fn solve_cutting_plane(model: &Model, cfg: &SolverConfig) -> Result<CuttingPlaneResult, SolveError> {
    cutting_plane::solve(model, cfg)
}

/// Specialized 0/1 knapsack branch-and-bound; returns `NotApplicable` data
/// (never an error) when `model` doesn't fit the knapsack shape.
pub fn solve_knapsack(model: &Model, cfg: &SolverConfig) -> Result<KnapsackResult, SolveError> {
    knapsack::solve(model, cfg)
}

fn final_x(last: &Iteration, n_vars: usize) -> Vec<f64> {
    let rhs_col = last.tableau_data[0].len() - 1;
    let mut x = vec![0.0; n_vars];
    for (row, &col) in last.basis.iter().enumerate() {
        if col < n_vars {
            x[col] = last.tableau_data[row][rhs_col];
        }
    }
    x
}
