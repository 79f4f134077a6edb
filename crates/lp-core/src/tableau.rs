//! The dense tableau shared by every engine.
//!
//! Storage differs from the spec's illustrative layout in one way only:
//! the objective occupies the *last* row rather than row 0, matching the
//! teacher's `formulang-solver::Tableau` (`obj_row = n_constraints`). This
//! is a storage detail; column semantics (decision vars, then slack/surplus
//! in row order, then RHS last) match the spec exactly, and every pivot
//! rule is defined relative to "the objective row" rather than a literal
//! index.
//!
//! Basis is tracked explicitly (`basis[row] -> column`), updated on every
//! pivot, rather than re-derived by scanning for unit-vector columns. This
//! is the "unify on an explicit basis array" design decision: it removes a
//! class of ties-at-a-unit-value bugs that pattern detection is prone to.

use crate::config::SolverConfig;
use crate::error::SolveError;

/// Tags a constraint row with the kind of auxiliary variable its slack
/// column represents, used only to name that column (`S_i` / `E_i` / `G_i`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowType {
    /// `<=` row; its column is a true slack.
    Slack,
    /// `>=` row negated to `<=`; its column is a surplus.
    Surplus,
    /// Row inserted by the Gomory cutting-plane loop.
    Cut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    /// `n_rows + 1` rows (constraint rows, then the objective row) by
    /// `n_vars + n_rows + 1` columns (decision vars, slack/surplus, RHS).
    pub data: Vec<Vec<f64>>,
    /// `basis[i]` is the column currently basic in constraint row `i`.
    pub basis: Vec<usize>,
    pub n_vars: usize,
    pub n_rows: usize,
    pub row_types: Vec<RowType>,
}

impl Tableau {
    pub fn n_cols(&self) -> usize {
        self.data[0].len()
    }

    pub fn rhs_col(&self) -> usize {
        self.n_cols() - 1
    }

    pub fn obj_row(&self) -> usize {
        self.n_rows
    }

    /// Build a tableau from a canonical model (§4.2): row 0..n-1 coefficients
    /// copied in, `+1` at the row's own slack column, RHS last; objective row
    /// holds `-effective_c_j` (the "always pivot as maximization" single
    /// convention described in SPEC_FULL.md §G).
    pub fn from_canonical(canon: &crate::canon::CanonicalModel) -> Tableau {
        let n_vars = canon.n_vars;
        let n_rows = canon.rows.len();
        let total_cols = n_vars + n_rows + 1;
        let mut data = vec![vec![0.0; total_cols]; n_rows + 1];
        let mut basis = vec![0usize; n_rows];
        let mut row_types = Vec::with_capacity(n_rows);

        for (i, row) in canon.rows.iter().enumerate() {
            data[i][..n_vars].copy_from_slice(&row.coefficients);
            data[i][n_vars + i] = 1.0;
            data[i][total_cols - 1] = row.rhs;
            basis[i] = n_vars + i;
            row_types.push(row.row_type);
        }

        let obj_row = n_rows;
        for j in 0..n_vars {
            data[obj_row][j] = -canon.effective_objective[j];
        }

        Tableau {
            data,
            basis,
            n_vars,
            n_rows,
            row_types,
        }
    }

    /// Gauss-Jordan pivot on `(row, col)`: scale the pivot row so the pivot
    /// element becomes 1, then eliminate `col` from every other row
    /// (including the objective row). Values within `zero_eps` of zero are
    /// snapped flat afterward to limit drift.
    pub fn pivot(&mut self, row: usize, col: usize, cfg: &SolverConfig) -> Result<(), SolveError> {
        let pivot_val = self.data[row][col];
        if pivot_val.abs() < cfg.pivot_eps {
            return Err(SolveError::ZeroPivot {
                row,
                col,
                value: pivot_val,
            });
        }

        let n_cols = self.n_cols();
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        let n_total_rows = self.data.len();
        for i in 0..n_total_rows {
            if i == row {
                continue;
            }
            let factor = self.data[i][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n_cols {
                self.data[i][j] -= factor * self.data[row][j];
            }
        }

        self.basis[row] = col;
        self.snap_zeros(cfg.zero_eps);
        Ok(())
    }

    pub fn snap_zeros(&mut self, eps: f64) {
        for row in &mut self.data {
            for v in row.iter_mut() {
                if v.abs() < eps {
                    *v = 0.0;
                }
            }
        }
    }

    /// Decision-variable values: basic columns read off their row's RHS,
    /// every non-basic column (including non-basic decision columns) is 0.
    pub fn extract_x(&self) -> Vec<f64> {
        let rhs_col = self.rhs_col();
        let mut x = vec![0.0; self.n_vars];
        for (row, &col) in self.basis.iter().enumerate() {
            if col < self.n_vars {
                x[col] = self.data[row][rhs_col];
            }
        }
        x
    }

    /// True iff any constraint row's RHS is below `-zero_eps`.
    pub fn has_negative_rhs(&self, cfg: &SolverConfig) -> bool {
        let rhs_col = self.rhs_col();
        (0..self.n_rows).any(|i| self.data[i][rhs_col] < -cfg.zero_eps)
    }

    /// Human-readable name for column `col`, following §3's naming rule:
    /// decision columns keep their variable name, slack/surplus columns are
    /// `S_i` / `E_i` / `G_i` (1-indexed by row), and the last column is `RHS`.
    pub fn column_name(&self, col: usize, variable_names: &[String]) -> String {
        if col < self.n_vars {
            variable_names
                .get(col)
                .cloned()
                .unwrap_or_else(|| format!("x{}", col + 1))
        } else if col < self.n_vars + self.n_rows {
            let row = col - self.n_vars;
            match self.row_types[row] {
                RowType::Slack => format!("S_{}", row + 1),
                RowType::Surplus => format!("E_{}", row + 1),
                RowType::Cut => format!("G_{}", row + 1),
            }
        } else {
            "RHS".to_string()
        }
    }

    /// Allocate a tableau with one more constraint row and one more column
    /// (a slack slot inserted just before RHS, which shifts right by one),
    /// with every parent row copied across and the new row left at zero for
    /// the caller to fill in. Shared scaffolding for the parent->child
    /// warm-start (§4.5.1) and Gomory cut insertion (§4.6), which grow the
    /// tableau with identical topology.
    pub(crate) fn grow(&self) -> Tableau {
        let old_rhs_col = self.rhs_col();
        let new_n_rows = self.n_rows + 1;
        let new_n_cols = self.n_cols() + 1;
        let mut data = vec![vec![0.0; new_n_cols]; new_n_rows + 1];

        for i in 0..self.n_rows {
            data[i][..old_rhs_col].copy_from_slice(&self.data[i][..old_rhs_col]);
            data[i][new_n_cols - 1] = self.data[i][old_rhs_col];
        }
        let obj_old = self.n_rows;
        let obj_new = new_n_rows;
        data[obj_new][..old_rhs_col].copy_from_slice(&self.data[obj_old][..old_rhs_col]);
        data[obj_new][new_n_cols - 1] = self.data[obj_old][old_rhs_col];

        let mut basis = self.basis.clone();
        basis.push(new_n_cols - 2);
        let mut row_types = self.row_types.clone();
        row_types.push(RowType::Slack);

        Tableau {
            data,
            basis,
            n_vars: self.n_vars,
            n_rows: new_n_rows,
            row_types,
        }
    }
}

/// Integer-looking values (within 1e-9 of an integer) render without
/// decimals; otherwise two decimals, with `-0.00` normalized to `0` (§6).
pub fn format_cell(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        let r = if rounded == 0.0 { 0 } else { rounded as i64 };
        return r.to_string();
    }
    let s = format!("{:.2}", value);
    if s == "-0.00" {
        "0".to_string()
    } else {
        s
    }
}
