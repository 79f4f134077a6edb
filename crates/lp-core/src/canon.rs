//! Canonicalization (§4.1/§4.2): turn a [`Model`] into row/column data a
//! [`Tableau`] can be built from directly, with every relation normalized to
//! `<=` and every minimize turned into its maximize-equivalent.

use crate::error::SolveError;
use crate::model::{Model, Objective, Relation, VariableType};
use crate::tableau::{RowType, Tableau};

#[derive(Debug, Clone)]
pub struct CanonicalRow {
    pub coefficients: Vec<f64>,
    pub rhs: f64,
    pub row_type: RowType,
}

/// A model with every relation folded to `<=` and the objective folded to a
/// maximization, ready to drop straight into [`Tableau::from_canonical`].
#[derive(Debug, Clone)]
pub struct CanonicalModel {
    pub n_vars: usize,
    pub rows: Vec<CanonicalRow>,
    /// Coefficients to maximize. For an original `Minimize` model this is
    /// `-c`; the true objective is always recovered afterward via
    /// [`Model::objective_value`], never by re-negating a running total.
    pub effective_objective: Vec<f64>,
}

/// Fold relations and sense, and apply `model.sign_flip()` to every column so
/// `ContinuousNonPositive` variables are solved as their non-negative
/// complement.
///
/// `Le` rows are copied as-is (tag `Slack`); `Ge` rows are negated to read as
/// `Le` (tag `Surplus`); `Eq` rows emit both the `Le` form and its negation
/// (§4.1), each with its own slack column. Every `Binary` variable gets an
/// automatic `x_j <= 1` bound row appended after the user's constraints.
pub fn canonicalize(model: &Model, extra_bounds: &[crate::model::Bound]) -> Result<CanonicalModel, SolveError> {
    model.validate()?;

    let flip = model.sign_flip();
    let n_vars = model.num_variables();

    let mut rows: Vec<CanonicalRow> = Vec::new();
    for c in &model.constraints {
        let flipped: Vec<f64> = c
            .coefficients
            .iter()
            .zip(&flip)
            .map(|(&a, &s)| a * s)
            .collect();
        match c.relation {
            Relation::Le => rows.push(CanonicalRow {
                coefficients: flipped,
                rhs: c.rhs,
                row_type: RowType::Slack,
            }),
            Relation::Ge => {
                let negated: Vec<f64> = flipped.iter().map(|&a| -a).collect();
                rows.push(CanonicalRow {
                    coefficients: negated,
                    rhs: -c.rhs,
                    row_type: RowType::Surplus,
                });
            }
            Relation::Eq => {
                let negated: Vec<f64> = flipped.iter().map(|&a| -a).collect();
                rows.push(CanonicalRow {
                    coefficients: flipped,
                    rhs: c.rhs,
                    row_type: RowType::Slack,
                });
                rows.push(CanonicalRow {
                    coefficients: negated,
                    rhs: -c.rhs,
                    row_type: RowType::Surplus,
                });
            }
        }
    }

    for (j, v) in model.variables.iter().enumerate() {
        if v.var_type == VariableType::Binary {
            let mut coefficients = vec![0.0; n_vars];
            coefficients[j] = flip[j];
            rows.push(CanonicalRow {
                coefficients,
                rhs: 1.0,
                row_type: RowType::Slack,
            });
        }
    }

    for b in extra_bounds {
        // Bounds are expressed against the original variable x; the internal
        // column is y where x = sign*y, so "x <= value" is literally
        // "sign*y <= value" and needs no further negation to reach <= form.
        let sign = flip[b.var_index];
        let mut coefficients = vec![0.0; n_vars];
        let row = if b.is_upper {
            coefficients[b.var_index] = sign;
            CanonicalRow {
                coefficients,
                rhs: b.value,
                row_type: RowType::Slack,
            }
        } else {
            // x >= value  ==>  sign*y >= value  ==>  -sign*y <= -value
            coefficients[b.var_index] = -sign;
            CanonicalRow {
                coefficients,
                rhs: -b.value,
                row_type: RowType::Surplus,
            }
        };
        rows.push(row);
    }

    let effective_objective: Vec<f64> = model
        .variables
        .iter()
        .zip(&flip)
        .map(|(v, &s)| {
            let c = v.coefficient * s;
            match model.sense {
                Objective::Maximize => c,
                Objective::Minimize => -c,
            }
        })
        .collect();

    Ok(CanonicalModel {
        n_vars,
        rows,
        effective_objective,
    })
}

/// Convenience wrapper: canonicalize then build the tableau in one call.
pub fn build_tableau(model: &Model, extra_bounds: &[crate::model::Bound]) -> Result<Tableau, SolveError> {
    let canon = canonicalize(model, extra_bounds)?;
    Ok(Tableau::from_canonical(&canon))
}
