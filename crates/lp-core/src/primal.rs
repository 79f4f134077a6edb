//! Primal Simplex (§4.3): drives an objective-row-feasible tableau to
//! optimality, recording every intermediate tableau along the way.

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::tableau::Tableau;

/// One pivot's worth of history: the tableau state right after the pivot
/// (or the starting tableau, for the first entry).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iteration {
    pub tableau_data: Vec<Vec<f64>>,
    pub basis: Vec<usize>,
    /// `None` for the starting tableau; otherwise the pivot that produced it.
    pub pivot: Option<(usize, usize)>,
}

fn snapshot(t: &Tableau, pivot: Option<(usize, usize)>) -> Iteration {
    Iteration {
        tableau_data: t.data.clone(),
        basis: t.basis.clone(),
        pivot,
    }
}

/// Most negative entry in the objective row, excluding RHS. `None` once
/// every entry clears `-zero_eps`, signalling optimality.
fn entering_column(t: &Tableau, cfg: &SolverConfig) -> Option<usize> {
    let obj_row = t.obj_row();
    let rhs_col = t.rhs_col();
    let mut best: Option<(usize, f64)> = None;
    for j in 0..rhs_col {
        let v = t.data[obj_row][j];
        if v < -cfg.zero_eps {
            match best {
                Some((_, bv)) if v >= bv => {}
                _ => best = Some((j, v)),
            }
        }
    }
    best.map(|(j, _)| j)
}

/// Minimum-ratio test among rows with a strictly positive entry in `col`;
/// ties broken by smallest row index.
fn leaving_row(t: &Tableau, col: usize, cfg: &SolverConfig) -> Option<usize> {
    let rhs_col = t.rhs_col();
    let mut best: Option<(usize, f64)> = None;
    for i in 0..t.n_rows {
        let a = t.data[i][col];
        if a > cfg.zero_eps {
            let ratio = t.data[i][rhs_col] / a;
            match best {
                None => best = Some((i, ratio)),
                Some((_, br)) if ratio < br - cfg.zero_eps => best = Some((i, ratio)),
                _ => {}
            }
        }
    }
    best.map(|(i, _)| i)
}

/// Run Primal Simplex to optimality. Returns the full iteration history,
/// the starting tableau first, including the optimal final one.
pub fn solve(mut t: Tableau, cfg: &SolverConfig) -> Result<Vec<Iteration>, SolveError> {
    let mut history = vec![snapshot(&t, None)];
    let mut pivots = 0usize;

    loop {
        let Some(col) = entering_column(&t, cfg) else {
            break;
        };
        let Some(row) = leaving_row(&t, col, cfg) else {
            return Err(SolveError::Unbounded { entering_col: col });
        };

        t.pivot(row, col, cfg)?;
        history.push(snapshot(&t, Some((row, col))));

        pivots += 1;
        if pivots > cfg.max_pivots {
            return Err(SolveError::IterationCap {
                phase: "primal",
                cap: cfg.max_pivots,
            });
        }
    }

    Ok(history)
}
