//! DC initial-guess collaborator (external interface, §6).
use crate::prelude::*;

/// An analytic estimator for a reduced-size initial guess, consulted by
/// [`crate::op::solve`] when no explicit `x0` is supplied and
/// [`Configuration::dc_use_guess`] is set.
///
/// This core ships no implementation: a circuit-specific heuristic lives
/// outside this crate and is injected at the call site.
pub trait DcGuessProvider {
    fn get_dc_guess(&self, circuit: &Circuit) -> Vec<f64>;
}
