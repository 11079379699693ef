//! Newton-Raphson convergence check, applied separately to the voltage
//! block and the current block of the solution vector.
use crate::prelude::*;

/// Outcome of a convergence check: the overall verdict plus a per-variable
/// breakdown for diagnostics.
pub struct ConvergenceReport {
    pub converged: bool,
    pub per_variable: Vec<bool>,
}

/// Checks whether `dx` and `residual` are small enough, given solution
/// `x`, to declare Newton-Raphson converged.
///
/// Entry `i` passes iff `|dx[i]| <= e_r*|x[i]| + e_a` and
/// `|residual[i]| <= e_residual`, with `(e_r, e_a, e_residual)` drawn from
/// the voltage tolerances (`ver`, `vea`, `iea`) for node-voltage entries
/// and the current tolerances (`ier`, `iea`, `vea`) for branch-current
/// entries. An empty block trivially passes.
pub fn check(circuit: &Circuit, config: &Configuration, x: &[f64], dx: &[f64], residual: &[f64]) -> ConvergenceReport {
    let n_voltage = circuit.num_nodes() - 1;

    let per_variable: Vec<bool> = (0..x.len())
        .map(|i| {
            let (er, ea, e_residual) = if i < n_voltage {
                (config.ver, config.vea, config.iea)
            } else {
                (config.ier, config.iea, config.vea)
            };
            dx[i].abs() <= er * x[i].abs() + ea && residual[i].abs() <= e_residual
        })
        .collect();

    ConvergenceReport {
        converged: per_variable.iter().all(|&ok| ok),
        per_variable,
    }
}
