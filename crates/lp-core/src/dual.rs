//! Dual Simplex (§4.4): repairs negative right-hand sides in a tableau
//! whose objective row is already dual-feasible.

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::primal::Iteration;
use crate::tableau::Tableau;

fn snapshot(t: &Tableau, pivot: Option<(usize, usize)>) -> Iteration {
    Iteration {
        tableau_data: t.data.clone(),
        basis: t.basis.clone(),
        pivot,
    }
}

/// Row with the most negative RHS; `None` once every RHS clears `-zero_eps`.
fn leaving_row(t: &Tableau, cfg: &SolverConfig) -> Option<usize> {
    let rhs_col = t.rhs_col();
    let mut best: Option<(usize, f64)> = None;
    for i in 0..t.n_rows {
        let rhs = t.data[i][rhs_col];
        if rhs < -cfg.zero_eps {
            match best {
                None => best = Some((i, rhs)),
                Some((_, br)) if rhs < br => best = Some((i, rhs)),
                _ => {}
            }
        }
    }
    best.map(|(i, _)| i)
}

/// Dual ratio test: among columns with a strictly negative entry in the
/// leaving row, the one minimizing `|obj / entry|`, ties broken by smallest
/// column index.
fn entering_column(t: &Tableau, row: usize, cfg: &SolverConfig) -> Option<usize> {
    let obj_row = t.obj_row();
    let rhs_col = t.rhs_col();
    let mut best: Option<(usize, f64)> = None;
    for j in 0..rhs_col {
        let a = t.data[row][j];
        if a < -cfg.zero_eps {
            let ratio = (t.data[obj_row][j] / a).abs();
            match best {
                None => best = Some((j, ratio)),
                Some((_, br)) if ratio < br - cfg.zero_eps => best = Some((j, ratio)),
                _ => {}
            }
        }
    }
    best.map(|(j, _)| j)
}

/// Run Dual Simplex until every RHS is non-negative. Returns the full
/// iteration history, starting tableau first.
pub fn solve(mut t: Tableau, cfg: &SolverConfig) -> Result<Vec<Iteration>, SolveError> {
    let mut history = vec![snapshot(&t, None)];
    let mut pivots = 0usize;

    loop {
        let Some(row) = leaving_row(&t, cfg) else {
            break;
        };
        let Some(col) = entering_column(&t, row, cfg) else {
            return Err(SolveError::Infeasible { leaving_row: row });
        };

        t.pivot(row, col, cfg)?;
        history.push(snapshot(&t, Some((row, col))));

        pivots += 1;
        if pivots > cfg.max_pivots {
            return Err(SolveError::IterationCap {
                phase: "dual",
                cap: cfg.max_pivots,
            });
        }
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::build_tableau;
    use crate::model::{Model, Objective, Relation, Variable, VariableType};

    fn var(name: &str, c: f64) -> Variable {
        Variable {
            name: name.to_string(),
            coefficient: c,
            var_type: VariableType::ContinuousNonNegative,
        }
    }

    #[test]
    fn repairs_negative_rhs_from_a_ge_constraint() {
        // x1 >= 2, maximize -x1: canonicalized row is -x1 <= -2 (negative RHS),
        // objective row already dual-feasible since it's a single-variable max.
        let mut model = Model::new(Objective::Maximize, vec![var("x1", -1.0)]);
        model.add_constraint(vec![1.0], Relation::Ge, 2.0);
        let cfg = SolverConfig::default();
        let t = build_tableau(&model, &[]).unwrap();
        assert!(t.has_negative_rhs(&cfg));

        let history = solve(t, &cfg).unwrap();
        let last = history.last().unwrap();
        let rhs_col = last.tableau_data[0].len() - 1;
        for i in 0..last.tableau_data.len() - 1 {
            assert!(last.tableau_data[i][rhs_col] >= -1e-6);
        }
    }

    #[test]
    fn infeasible_when_leaving_row_has_no_negative_entry() {
        // A row that is entirely non-negative with a negative RHS cannot be
        // repaired: there is no column to pivot on.
        let mut model = Model::new(Objective::Maximize, vec![var("x1", 1.0)]);
        model.add_constraint(vec![0.0], Relation::Le, -1.0);
        let cfg = SolverConfig::default();
        let t = build_tableau(&model, &[]).unwrap();
        let err = solve(t, &cfg).unwrap_err();
        assert!(matches!(err, SolveError::Infeasible { .. }));
    }
}
