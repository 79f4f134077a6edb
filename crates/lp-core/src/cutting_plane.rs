//! Gomory fractional cutting-plane loop (§4.6): solve, detect a fractional
//! integer variable, inject a cut row, repair with Dual Simplex, repeat.

use crate::canon::build_tableau;
use crate::config::SolverConfig;
use crate::dual;
use crate::error::SolveError;
use crate::model::{Bound, Model, VariableType};
use crate::primal;
use crate::solution::CuttingPlaneResult;
use crate::tableau::{RowType, Tableau};

/// First (smallest-index) Integer/Binary variable whose value is more than
/// `frac_eps` from the nearest integer.
fn find_fractional_int_var(model: &Model, x: &[f64], cfg: &SolverConfig) -> Option<usize> {
    model.variables.iter().enumerate().find_map(|(j, v)| {
        if !v.var_type.is_integral() {
            return None;
        }
        let frac = (x[j] - x[j].round()).abs();
        if frac > cfg.frac_eps {
            Some(j)
        } else {
            None
        }
    })
}

fn frac_part(v: f64) -> f64 {
    v - v.floor()
}

/// §4.6 step 4: prefer the row where `target_var` is basic; else a row whose
/// basic column is an integer variable with a fractional RHS; else any row
/// with a fractional RHS. Skips rows whose fractional RHS is within
/// `zero_eps` of 0 or 1 (degenerate, per Scenario F).
fn choose_cut_row(t: &Tableau, model: &Model, target_var: usize, cfg: &SolverConfig) -> Option<usize> {
    let rhs_col = t.rhs_col();
    let is_viable = |row: usize| {
        let b = frac_part(t.data[row][rhs_col]);
        b > cfg.zero_eps && (1.0 - b) > cfg.zero_eps
    };

    if let Some(row) = (0..t.n_rows).find(|&i| t.basis[i] == target_var) {
        if is_viable(row) {
            return Some(row);
        }
    }

    for row in 0..t.n_rows {
        let basic_col = t.basis[row];
        if basic_col < model.num_variables()
            && model.variables[basic_col].var_type.is_integral()
            && is_viable(row)
        {
            return Some(row);
        }
    }

    (0..t.n_rows).find(|&row| is_viable(row))
}

/// Grow the tableau by one row/column for a Gomory cut sourced from `row`.
fn insert_cut(t: &Tableau, source_row: usize, cfg: &SolverConfig) -> Tableau {
    let old_rhs_col = t.rhs_col();
    let mut grown = t.grow();
    let new_row = grown.n_rows - 1;
    let new_rhs_col = grown.rhs_col();

    for j in 0..old_rhs_col {
        let a = t.data[source_row][j];
        grown.data[new_row][j] = a.floor() - a;
    }
    grown.data[new_row][t.n_vars + new_row] = 1.0;
    grown.data[new_row][new_rhs_col] = -frac_part(t.data[source_row][old_rhs_col]);
    *grown.row_types.last_mut().unwrap() = RowType::Cut;

    grown.snap_zeros(cfg.zero_eps);
    grown
}

pub fn solve(model: &Model, cfg: &SolverConfig) -> Result<CuttingPlaneResult, SolveError> {
    model.validate()?;

    let extra: Vec<Bound> = model
        .variables
        .iter()
        .enumerate()
        .filter(|(_, v)| v.var_type == VariableType::Integer)
        .map(|(j, _)| Bound {
            var_index: j,
            is_upper: true,
            value: 1.0,
        })
        .collect();

    let mut t = build_tableau(model, &extra)?;
    let mut tableaus = vec![t.data.clone()];
    let mut logs = Vec::new();
    let mut cuts_added = 0usize;
    let mut last_x = vec![0.0; model.num_variables()];
    let mut last_z = 0.0;
    let mut failure = None;

    loop {
        if t.has_negative_rhs(cfg) {
            match dual::solve(t.clone(), cfg) {
                Ok(history) => {
                    let last = history.last().unwrap();
                    t.data = last.tableau_data.clone();
                    t.basis = last.basis.clone();
                    for iter in history.iter().skip(1) {
                        tableaus.push(iter.tableau_data.clone());
                    }
                    logs.push(format!("dual repair: {} pivots", history.len() - 1));
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        match primal::solve(t.clone(), cfg) {
            Ok(history) => {
                let last = history.last().unwrap();
                t.data = last.tableau_data.clone();
                t.basis = last.basis.clone();
                for iter in history.iter().skip(1) {
                    tableaus.push(iter.tableau_data.clone());
                }
                logs.push(format!("primal optimize: {} pivots", history.len() - 1));
            }
            Err(e) => {
                failure = Some(e);
                break;
            }
        }

        let x_canonical = t.extract_x();
        let x = model.unflip(&x_canonical);
        last_x = x.clone();
        last_z = model.objective_value(&x);

        let Some(target_var) = find_fractional_int_var(model, &x, cfg) else {
            logs.push("integer-feasible, stopping".to_string());
            break;
        };

        let Some(source_row) = choose_cut_row(&t, model, target_var, cfg) else {
            logs.push("no viable cut row found, stopping".to_string());
            break;
        };

        t = insert_cut(&t, source_row, cfg);
        tableaus.push(t.data.clone());
        cuts_added += 1;
        logs.push(format!(
            "cut #{} inserted from row {} (var {})",
            cuts_added, source_row, target_var
        ));

        if cuts_added > cfg.max_cuts {
            failure = Some(SolveError::IterationCap {
                phase: "cutting_plane",
                cap: cfg.max_cuts,
            });
            break;
        }
    }

    Ok(CuttingPlaneResult {
        x_opt: last_x,
        z_opt: last_z,
        cuts_added,
        tableaus,
        logs,
        failure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Objective, Relation, Variable};

    #[test]
    fn scenario_d_gomory_on_binary_ip() {
        let mut model = Model::new(
            Objective::Maximize,
            vec![
                Variable {
                    name: "x1".into(),
                    coefficient: 2.0,
                    var_type: VariableType::Binary,
                },
                Variable {
                    name: "x2".into(),
                    coefficient: 3.0,
                    var_type: VariableType::Binary,
                },
                Variable {
                    name: "x3".into(),
                    coefficient: 3.0,
                    var_type: VariableType::Binary,
                },
                Variable {
                    name: "x4".into(),
                    coefficient: 5.0,
                    var_type: VariableType::Binary,
                },
                Variable {
                    name: "x5".into(),
                    coefficient: 2.0,
                    var_type: VariableType::Binary,
                },
                Variable {
                    name: "x6".into(),
                    coefficient: 4.0,
                    var_type: VariableType::Binary,
                },
            ],
        );
        model.add_constraint(vec![11.0, 8.0, 6.0, 14.0, 10.0, 10.0], Relation::Le, 40.0);

        let cfg = SolverConfig::default();
        let result = solve(&model, &cfg).unwrap();
        assert!(result.failure.is_none());
        for &xi in &result.x_opt {
            assert!((xi - xi.round()).abs() < 1e-6);
        }
        assert!((result.z_opt - 13.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_source_row_is_skipped_scenario_f() {
        // A row whose RHS fractional part sits within zero_eps of 0 or 1
        // must never be chosen; choose_cut_row should look further or give up
        // rather than emit a zero cut.
        let cfg = SolverConfig::default();
        let t = Tableau {
            data: vec![
                vec![1.0, 0.0, 1.0, 0.0, 1.0 + 1e-12],
                vec![0.0, 1.0, 0.0, 1.0, 2.5],
                vec![0.0, 0.0, 0.0, 0.0, 0.0],
            ],
            basis: vec![0, 1],
            n_vars: 2,
            n_rows: 2,
            row_types: vec![RowType::Slack, RowType::Slack],
        };
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
        let row = choose_cut_row(&t, &model, 0, &cfg);
        assert_eq!(row, Some(1));
    }
}
