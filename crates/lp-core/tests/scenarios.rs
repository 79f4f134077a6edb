//! Literal end-to-end scenarios (§8), each driving a whole public operation
//! rather than one module's internals.

use lp_core::{
    solve_branch_and_bound, solve_cutting_plane, solve_knapsack, solve_primal, Model, Objective,
    Relation, SolveError, SolverConfig, Variable, VariableType,
};

fn continuous(name: &str, c: f64) -> Variable {
    Variable {
        name: name.to_string(),
        coefficient: c,
        var_type: VariableType::ContinuousNonNegative,
    }
}

fn binary(name: &str, c: f64) -> Variable {
    Variable {
        name: name.to_string(),
        coefficient: c,
        var_type: VariableType::Binary,
    }
}

fn integer(name: &str, c: f64) -> Variable {
    Variable {
        name: name.to_string(),
        coefficient: c,
        var_type: VariableType::Integer,
    }
}

// Scenario A: Korean Auto LP, maximize over a >= region is unbounded.
#[test]
fn scenario_a_maximize_over_ge_region_is_unbounded() {
    let mut model = Model::new(
        Objective::Maximize,
        vec![continuous("x1", 50.0), continuous("x2", 100.0)],
    );
    model.add_constraint(vec![7.0, 2.0], Relation::Ge, 28.0);
    model.add_constraint(vec![2.0, 12.0], Relation::Ge, 24.0);

    let cfg = SolverConfig::default();
    let err = solve_primal(&model, &cfg).unwrap_err();
    assert!(matches!(err, SolveError::Unbounded { .. }));
}

// Scenario B: same coefficients, minimize; the two constraints' intersection
// (x1=3.6, x2=1.4) is the unique optimal vertex, giving z* = 50*3.6+100*1.4 = 320.
#[test]
fn scenario_b_korean_auto_minimize() {
    let mut model = Model::new(
        Objective::Minimize,
        vec![continuous("x1", 50.0), continuous("x2", 100.0)],
    );
    model.add_constraint(vec![7.0, 2.0], Relation::Ge, 28.0);
    model.add_constraint(vec![2.0, 12.0], Relation::Ge, 24.0);

    let cfg = SolverConfig::default();
    let result = solve_primal(&model, &cfg).unwrap();
    assert!((result.objective - 320.0).abs() < 1e-4);
    assert!((result.x[0] - 3.6).abs() < 1e-4);
    assert!((result.x[1] - 1.4).abs() < 1e-4);
}

// Scenario C: textbook 0/1 knapsack, optimum objective 13.
#[test]
fn scenario_c_textbook_knapsack() {
    let profits = [2.0, 3.0, 3.0, 5.0, 2.0, 4.0];
    let weights = [11.0, 8.0, 6.0, 14.0, 10.0, 10.0];
    let variables: Vec<Variable> = profits
        .iter()
        .enumerate()
        .map(|(i, &p)| binary(&format!("x{}", i + 1), p))
        .collect();
    let mut model = Model::new(Objective::Maximize, variables);
    model.add_constraint(weights.to_vec(), Relation::Le, 40.0);

    let cfg = SolverConfig::default();
    let result = solve_knapsack(&model, &cfg).unwrap();
    let best = result.best_candidate.expect("expected a candidate node");
    assert!((best.objective - 13.0).abs() < 1e-6);
    assert!(best.weight_used <= 40.0 + 1e-9);
}

// Scenario D: Gomory cuts on the same instance as binary variables must
// reach the Scenario C optimum with an all-integer x*.
#[test]
fn scenario_d_gomory_matches_knapsack_optimum() {
    let profits = [2.0, 3.0, 3.0, 5.0, 2.0, 4.0];
    let weights = [11.0, 8.0, 6.0, 14.0, 10.0, 10.0];
    let variables: Vec<Variable> = profits
        .iter()
        .enumerate()
        .map(|(i, &p)| binary(&format!("x{}", i + 1), p))
        .collect();
    let mut model = Model::new(Objective::Maximize, variables);
    model.add_constraint(weights.to_vec(), Relation::Le, 40.0);

    let cfg = SolverConfig::default();
    let result = solve_cutting_plane(&model, &cfg).unwrap();
    assert!(result.failure.is_none());
    for &xi in &result.x_opt {
        assert!((xi - xi.round()).abs() < 1e-6);
    }
    assert!((result.z_opt - 13.0).abs() < 1e-6);
}

// Scenario E: small MILP, expect x1=1, x2=1, z=2 within <= 8 nodes explored.
#[test]
fn scenario_e_small_milp_bnb() {
    let mut model = Model::new(Objective::Maximize, vec![integer("x1", 1.0), integer("x2", 1.0)]);
    model.add_constraint(vec![1.0, 2.0], Relation::Le, 4.0);
    model.add_constraint(vec![3.0, 2.0], Relation::Le, 6.0);

    let cfg = SolverConfig::default();
    let result = solve_branch_and_bound(&model, &cfg).unwrap();
    assert!(result.feasible);
    assert!((result.best_objective - 2.0).abs() < 1e-6);
    assert!((result.best_x[0] - 1.0).abs() < 1e-6);
    assert!((result.best_x[1] - 1.0).abs() < 1e-6);
    assert!(result.nodes_explored <= 8);
}

// Scenario F: a degenerate cut source row (fractional RHS within tolerance
// of 0 or 1) must be skipped rather than produce a zero cut. Exercised
// end-to-end by running cutting-plane on the Scenario D instance and
// checking no cut has an all-zero coefficient row.
#[test]
fn scenario_f_no_zero_cut_is_ever_inserted() {
    let profits = [2.0, 3.0, 3.0, 5.0, 2.0, 4.0];
    let weights = [11.0, 8.0, 6.0, 14.0, 10.0, 10.0];
    let variables: Vec<Variable> = profits
        .iter()
        .enumerate()
        .map(|(i, &p)| binary(&format!("x{}", i + 1), p))
        .collect();
    let mut model = Model::new(Objective::Maximize, variables);
    model.add_constraint(weights.to_vec(), Relation::Le, 40.0);

    let cfg = SolverConfig::default();
    let result = solve_cutting_plane(&model, &cfg).unwrap();
    for tableau in &result.tableaus {
        let last_row = tableau.len() - 1;
        for row in &tableau[..last_row] {
            let rhs = *row.last().unwrap();
            // No row should have RHS exactly 0 immediately after a cut
            // insertion while every other coefficient is also 0 (a vacuous
            // cut would add nothing and signal a bug in cut selection).
            let all_zero = row[..row.len() - 1].iter().all(|&v| v.abs() < 1e-12);
            assert!(!(all_zero && rhs.abs() < 1e-12));
        }
    }
}
