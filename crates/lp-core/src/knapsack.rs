//! Specialized 0/1 Knapsack branch-and-bound (§4.7): ratio-ordered greedy
//! LP relaxation per node instead of a general simplex relaxation.

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::model::{Model, Objective, Relation, VariableType};
use crate::solution::{KnapsackNode, KnapsackResult, KnapsackStatus, NotApplicableReason};

struct PendingNode {
    label: String,
    parent_label: Option<String>,
    fixed: Vec<(usize, u8)>,
}

/// Profit/weight ratio, descending; a zero-weight item ranks infinitely high.
fn rank_by_ratio(profits: &[f64], weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..profits.len()).collect();
    let ratio = |i: usize| if weights[i] == 0.0 { f64::INFINITY } else { profits[i] / weights[i] };
    order.sort_by(|&a, &b| ratio(b).partial_cmp(&ratio(a)).unwrap());
    order
}

/// Greedy fill under the node's fixed decisions; returns `(x, objective,
/// weight_used, fractional_var)`. `fractional_var` is `None` iff every
/// remaining item fit in whole, i.e. the node is a `Candidate`.
fn solve_node(
    profits: &[f64],
    weights: &[f64],
    capacity: f64,
    order: &[usize],
    fixed: &[(usize, u8)],
    cfg: &SolverConfig,
) -> Option<(Vec<f64>, f64, f64, Option<usize>)> {
    let n = profits.len();
    let mut x = vec![0.0; n];
    let mut remaining = capacity;
    let mut weight_used = 0.0;

    for &(idx, val) in fixed {
        if val == 1 {
            if weights[idx] > remaining + cfg.zero_eps {
                return None;
            }
            x[idx] = 1.0;
            remaining -= weights[idx];
            weight_used += weights[idx];
        }
    }

    let fixed_idx: Vec<usize> = fixed.iter().map(|&(i, _)| i).collect();
    let mut fractional_var = None;
    for &idx in order {
        if fixed_idx.contains(&idx) {
            continue;
        }
        if weights[idx] <= remaining + cfg.zero_eps {
            x[idx] = 1.0;
            remaining -= weights[idx];
            weight_used += weights[idx];
        } else if remaining > cfg.zero_eps {
            x[idx] = remaining / weights[idx];
            fractional_var = Some(idx);
            remaining = 0.0;
            break;
        }
    }

    let objective = x.iter().zip(profits).map(|(&xi, &p)| xi * p).sum();
    Some((x, objective, weight_used, fractional_var))
}

pub fn solve(model: &Model, cfg: &SolverConfig) -> Result<KnapsackResult, SolveError> {
    model.validate()?;

    if model.sense != Objective::Maximize {
        return Ok(KnapsackResult::not_applicable(NotApplicableReason::NotMaximize));
    }
    if model.constraints.len() != 1 {
        return Ok(KnapsackResult::not_applicable(
            NotApplicableReason::WrongConstraintCount {
                found: model.constraints.len(),
            },
        ));
    }
    let constraint = &model.constraints[0];
    if constraint.relation != Relation::Le {
        return Ok(KnapsackResult::not_applicable(
            NotApplicableReason::NotSingleCapacityConstraint,
        ));
    }
    if let Some((index, _)) = model
        .variables
        .iter()
        .enumerate()
        .find(|(_, v)| v.var_type != VariableType::Binary)
    {
        return Ok(KnapsackResult::not_applicable(
            NotApplicableReason::NonBinaryVariable { index },
        ));
    }
    if constraint.rhs < 0.0 || constraint.coefficients.iter().any(|&w| w < 0.0) {
        return Ok(KnapsackResult::not_applicable(
            NotApplicableReason::NegativeWeightOrCapacity,
        ));
    }

    let profits: Vec<f64> = model.variables.iter().map(|v| v.coefficient).collect();
    let weights = constraint.coefficients.clone();
    let capacity = constraint.rhs;
    let order = rank_by_ratio(&profits, &weights);

    let mut stack = vec![PendingNode {
        label: "Root".to_string(),
        parent_label: None,
        fixed: Vec::new(),
    }];

    let mut nodes = Vec::new();
    let mut best_candidate: Option<KnapsackNode> = None;
    let mut explored = 0usize;

    while let Some(pending) = stack.pop() {
        explored += 1;
        if explored > cfg.max_nodes {
            break;
        }

        match solve_node(&profits, &weights, capacity, &order, &pending.fixed, cfg) {
            None => {
                nodes.push(KnapsackNode {
                    label: pending.label,
                    parent_label: pending.parent_label,
                    status: KnapsackStatus::Infeasible,
                    fixed: pending.fixed,
                    fractional_var: None,
                    x: Vec::new(),
                    objective: 0.0,
                    weight_used: 0.0,
                });
            }
            Some((x, objective, weight_used, fractional_var)) => match fractional_var {
                None => {
                    let node = KnapsackNode {
                        label: pending.label,
                        parent_label: pending.parent_label,
                        status: KnapsackStatus::Candidate,
                        fixed: pending.fixed,
                        fractional_var: None,
                        x,
                        objective,
                        weight_used,
                    };
                    let better = match &best_candidate {
                        None => true,
                        Some(best) => node.objective > best.objective + cfg.zero_eps,
                    };
                    if better {
                        best_candidate = Some(node.clone());
                    }
                    nodes.push(node);
                }
                Some(j) => {
                    let mut zero_fixed = pending.fixed.clone();
                    zero_fixed.push((j, 0));
                    let mut one_fixed = pending.fixed.clone();
                    one_fixed.push((j, 1));

                    nodes.push(KnapsackNode {
                        label: pending.label.clone(),
                        parent_label: pending.parent_label.clone(),
                        status: KnapsackStatus::Branched,
                        fixed: pending.fixed.clone(),
                        fractional_var: Some(j),
                        x,
                        objective,
                        weight_used,
                    });

                    stack.push(PendingNode {
                        label: format!("{}.2", pending.label),
                        parent_label: Some(pending.label.clone()),
                        fixed: one_fixed,
                    });
                    stack.push(PendingNode {
                        label: format!("{}.1", pending.label),
                        parent_label: Some(pending.label),
                        fixed: zero_fixed,
                    });
                }
            },
        }
    }

    Ok(KnapsackResult {
        nodes,
        best_candidate,
        not_applicable: None,
    })
}
