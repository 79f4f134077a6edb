//! Branch-and-Bound (§4.5) over LP relaxations, with the parent->child
//! tableau warm-start (§4.5.1) as the design-critical piece: children are
//! grown directly from their parent's final tableau rather than rebuilt
//! from scratch.

use crate::canon::build_tableau;
use crate::config::SolverConfig;
use crate::dual;
use crate::error::SolveError;
use crate::model::{Bound, Model, Objective};
use crate::primal;
use crate::solution::{BnBNode, BnBResult};
use crate::tableau::{RowType, Tableau};

/// The parent's final tableau plus the one new bound a child introduces.
/// Consumed exactly once, when the child is popped and solved.
struct Seed {
    parent_tableau: Tableau,
    bound: Bound,
}

struct PendingNode {
    label: String,
    depth: usize,
    /// Full accumulated path of bounds, kept so a node can still be
    /// re-derived from the canonical model if it ever needs to be (not
    /// used on the warm-start path, but cheap to carry).
    bounds: Vec<Bound>,
    seed: Option<Seed>,
}

fn improves(candidate: f64, incumbent: f64, sense: Objective, eps: f64) -> bool {
    match sense {
        Objective::Maximize => candidate > incumbent + eps,
        Objective::Minimize => candidate < incumbent - eps,
    }
}

/// Grow `parent` by one row/column for `bound` and price the new row out
/// against the parent's basis (§4.5.1).
fn warm_start(parent: &Tableau, bound: &Bound, flip: &[f64], cfg: &SolverConfig) -> Tableau {
    let mut t = parent.grow();
    let new_row = t.n_rows - 1;
    let old_rhs_col = parent.rhs_col();
    let new_rhs_col = t.rhs_col();
    let sign = flip[bound.var_index];

    let (coefficient, rhs, row_type) = if bound.is_upper {
        (sign, bound.value, RowType::Slack)
    } else {
        (-sign, -bound.value, RowType::Surplus)
    };

    t.data[new_row][bound.var_index] = coefficient;
    t.data[new_row][t.n_vars + new_row] = 1.0;
    t.data[new_row][new_rhs_col] = rhs;
    *t.row_types.last_mut().unwrap() = row_type;

    for (i, &basic_col) in parent.basis.iter().enumerate() {
        let f = t.data[new_row][basic_col];
        if f == 0.0 {
            continue;
        }
        for j in 0..old_rhs_col {
            t.data[new_row][j] -= f * parent.data[i][j];
        }
        t.data[new_row][new_rhs_col] -= f * parent.data[i][old_rhs_col];
    }

    t.snap_zeros(cfg.zero_eps);
    t
}

/// A node's LP relaxation was solved successfully: its final tableau plus
/// which repair stage(s) ran, for the node's `solver_used` diagnostic.
struct SolvedRelaxation {
    tableau: Tableau,
    solver_used: &'static str,
}

pub fn solve(model: &Model, cfg: &SolverConfig) -> Result<BnBResult, SolveError> {
    model.validate()?;
    let flip = model.sign_flip();

    let mut stack = vec![PendingNode {
        label: "Root".to_string(),
        depth: 0,
        bounds: Vec::new(),
        seed: None,
    }];

    let mut nodes: Vec<BnBNode> = Vec::new();
    let mut log = String::new();
    let mut incumbent: Option<(Vec<f64>, f64)> = None;
    let mut nodes_explored = 0usize;

    while let Some(node) = stack.pop() {
        nodes_explored += 1;
        if nodes_explored > cfg.max_nodes {
            return Err(SolveError::IterationCap {
                phase: "branch_and_bound",
                cap: cfg.max_nodes,
            });
        }

        let fresh_tableau = match &node.seed {
            Some(seed) => warm_start(&seed.parent_tableau, &seed.bound, &flip, cfg),
            None => build_tableau(model, &node.bounds)?,
        };

        let solved = match solve_relaxation(fresh_tableau, cfg) {
            Ok(s) => s,
            Err(_) => {
                nodes.push(BnBNode {
                    label: node.label.clone(),
                    depth: node.depth,
                    x: Vec::new(),
                    objective: 0.0,
                    is_integer: false,
                    infeasible: true,
                    solver_used: "none",
                });
                log.push_str(&format!("{}: infeasible\n", node.label));
                continue;
            }
        };

        let x_canonical = solved.tableau.extract_x();
        let x = model.unflip(&x_canonical);
        let objective = model.objective_value(&x);

        let is_integer = model.variables.iter().enumerate().all(|(j, v)| {
            if !v.var_type.is_integral() {
                return true;
            }
            let xi = x[j];
            let close_to_int = (xi - xi.round()).abs() < cfg.int_eps;
            let binary_ok = v.var_type != crate::model::VariableType::Binary
                || (xi >= -cfg.zero_eps && xi <= 1.0 + cfg.zero_eps);
            close_to_int && binary_ok
        });

        nodes.push(BnBNode {
            label: node.label.clone(),
            depth: node.depth,
            x: x.clone(),
            objective,
            is_integer,
            infeasible: false,
            solver_used: solved.solver_used,
        });
        log.push_str(&format!(
            "{}: x={:?} obj={:.4} integer={} via {}\n",
            node.label, x, objective, is_integer, solved.solver_used
        ));

        if is_integer {
            let better = match &incumbent {
                None => true,
                Some((_, best)) => improves(objective, *best, model.sense, cfg.zero_eps),
            };
            if better {
                incumbent = Some((x.clone(), objective));
            }
            continue;
        }

        if let Some((_, best)) = &incumbent {
            if !improves(objective, *best, model.sense, cfg.zero_eps) {
                log.push_str(&format!("{}: pruned\n", node.label));
                continue;
            }
        }

        let branch_var = model
            .variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.var_type.is_integral())
            .map(|(j, _)| (j, (x[j] - x[j].round()).abs()))
            .filter(|(_, frac)| *frac > cfg.frac_eps)
            .max_by(|(ja, fa), (jb, fb)| {
                fa.partial_cmp(fb)
                    .unwrap()
                    .then(jb.cmp(ja))
            });

        let Some((j, _)) = branch_var else {
            continue;
        };
        let v = x[j];

        let floor_bound = Bound {
            var_index: j,
            is_upper: true,
            value: v.floor(),
        };
        let ceil_bound = Bound {
            var_index: j,
            is_upper: false,
            value: v.ceil(),
        };

        let mut floor_bounds = node.bounds.clone();
        floor_bounds.push(floor_bound);
        let mut ceil_bounds = node.bounds.clone();
        ceil_bounds.push(ceil_bound);

        let ceil_child = PendingNode {
            label: format!("{}.2", node.label),
            depth: node.depth + 1,
            bounds: ceil_bounds,
            seed: Some(Seed {
                parent_tableau: solved.tableau.clone(),
                bound: ceil_bound,
            }),
        };
        let floor_child = PendingNode {
            label: format!("{}.1", node.label),
            depth: node.depth + 1,
            bounds: floor_bounds,
            seed: Some(Seed {
                parent_tableau: solved.tableau.clone(),
                bound: floor_bound,
            }),
        };

        // Floor pushed last so it pops (and is explored) first.
        stack.push(ceil_child);
        stack.push(floor_child);
    }

    let (best_x, best_objective, feasible) = match incumbent {
        Some((x, obj)) => (x, obj, true),
        None => (vec![0.0; model.num_variables()], 0.0, false),
    };

    Ok(BnBResult {
        best_x,
        best_objective,
        feasible,
        nodes_explored,
        nodes,
        log,
    })
}

fn solve_relaxation(t: Tableau, cfg: &SolverConfig) -> Result<SolvedRelaxation, SolveError> {
    let n_vars = t.n_vars;
    let used_dual = t.has_negative_rhs(cfg);
    let t = if used_dual {
        let history = dual::solve(t, cfg)?;
        let last = history.last().unwrap();
        Tableau {
            data: last.tableau_data.clone(),
            basis: last.basis.clone(),
            n_vars,
            n_rows: last.basis.len(),
            row_types: vec![RowType::Slack; last.basis.len()],
        }
    } else {
        t
    };
    let n_rows = t.n_rows;
    let history = primal::solve(t, cfg)?;
    let last = history.last().unwrap();
    Ok(SolvedRelaxation {
        tableau: Tableau {
            data: last.tableau_data.clone(),
            basis: last.basis.clone(),
            n_vars,
            n_rows,
            row_types: vec![RowType::Slack; n_rows],
        },
        solver_used: if used_dual { "Dual+Primal" } else { "Primal" },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Relation, Variable, VariableType};

    #[test]
    fn scenario_e_small_milp() {
        let model = Model::new(
            Objective::Maximize,
            vec![
                Variable {
                    name: "x1".into(),
                    coefficient: 1.0,
                    var_type: VariableType::Integer,
                },
                Variable {
                    name: "x2".into(),
                    coefficient: 1.0,
                    var_type: VariableType::Integer,
                },
            ],
        );
        let mut model = model;
        model.add_constraint(vec![1.0, 2.0], Relation::Le, 4.0);
        model.add_constraint(vec![3.0, 2.0], Relation::Le, 6.0);

        let cfg = SolverConfig::default();
        let result = solve(&model, &cfg).unwrap();
        assert!(result.feasible);
        assert!((result.best_objective - 2.0).abs() < 1e-6);
        assert!(result.nodes_explored <= 8);
    }

    #[test]
    fn warm_started_child_matches_fresh_solve() {
        let mut model = Model::new(
            Objective::Maximize,
            vec![
                Variable {
                    name: "x1".into(),
                    coefficient: 3.0,
                    var_type: VariableType::Integer,
                },
                Variable {
                    name: "x2".into(),
                    coefficient: 2.0,
                    var_type: VariableType::Integer,
                },
            ],
        );
        model.add_constraint(vec![1.0, 1.0], Relation::Le, 4.0);

        let cfg = SolverConfig::default();
        let flip = model.sign_flip();
        let root_tableau = build_tableau(&model, &[]).unwrap();
        let root_solved = solve_relaxation(root_tableau, &cfg).unwrap();

        let bound = Bound {
            var_index: 0,
            is_upper: true,
            value: 3.0,
        };
        let warm = warm_start(&root_solved.tableau, &bound, &flip, &cfg);
        let warm_solved = solve_relaxation(warm, &cfg).unwrap();
        let warm_x = model.unflip(&warm_solved.tableau.extract_x());

        let fresh_tableau = build_tableau(&model, &[bound]).unwrap();
        let fresh_solved = solve_relaxation(fresh_tableau, &cfg).unwrap();
        let fresh_x = model.unflip(&fresh_solved.tableau.extract_x());

        for (a, b) in warm_x.iter().zip(fresh_x.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
