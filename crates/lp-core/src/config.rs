//! Named tolerances and iteration caps shared by all five engines.
//!
//! The source this crate is built from used five or six different
//! tolerance literals scattered across the codebase; consolidating them
//! here is what makes the testable properties in the spec reproducible
//! instead of flaky.

/// Threshold below which a value is treated as exactly zero.
pub const ZERO_EPS: f64 = 1e-9;
/// Threshold below which a fractional part is treated as exactly 0 or 1.
pub const FRAC_EPS: f64 = 1e-7;
/// Threshold below which a value is treated as integer-feasible.
pub const INT_EPS: f64 = 1e-6;
/// Threshold below which a candidate pivot element is rejected as degenerate.
pub const PIVOT_EPS: f64 = 1e-15;

/// Tunable knobs shared by `PrimalSimplex`, `DualSimplex`, `BranchAndBound`,
/// the cutting-plane loop, and `BnBKnapsack`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub zero_eps: f64,
    pub frac_eps: f64,
    pub int_eps: f64,
    pub pivot_eps: f64,
    /// Hard cap on pivots within a single primal or dual simplex run.
    pub max_pivots: usize,
    /// Hard cap on branch-and-bound nodes explored.
    pub max_nodes: usize,
    /// Hard cap on Gomory cuts inserted.
    pub max_cuts: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            zero_eps: ZERO_EPS,
            frac_eps: FRAC_EPS,
            int_eps: INT_EPS,
            pivot_eps: PIVOT_EPS,
            max_pivots: 10_000,
            max_nodes: 10_000,
            max_cuts: 200,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zero_eps(mut self, eps: f64) -> Self {
        self.zero_eps = eps;
        self
    }

    pub fn with_frac_eps(mut self, eps: f64) -> Self {
        self.frac_eps = eps;
        self
    }

    pub fn with_int_eps(mut self, eps: f64) -> Self {
        self.int_eps = eps;
        self
    }

    pub fn with_pivot_eps(mut self, eps: f64) -> Self {
        self.pivot_eps = eps;
        self
    }

    pub fn with_max_pivots(mut self, max: usize) -> Self {
        self.max_pivots = max;
        self
    }

    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    pub fn with_max_cuts(mut self, max: usize) -> Self {
        self.max_cuts = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.zero_eps, ZERO_EPS);
        assert_eq!(cfg.max_nodes, 10_000);
    }

    #[test]
    fn builder_overrides_one_field_at_a_time() {
        let cfg = SolverConfig::new().with_max_cuts(5).with_int_eps(1e-4);
        assert_eq!(cfg.max_cuts, 5);
        assert_eq!(cfg.int_eps, 1e-4);
        assert_eq!(cfg.max_nodes, 10_000);
    }
}
