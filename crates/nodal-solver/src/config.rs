/// Tunables for every analysis entry point in this crate.
///
/// Threaded through by reference; no function here reads ambient or
/// global state. Call sites build one `Configuration` (typically via
/// `Configuration::default()`, adjusted as needed) and reuse it across an
/// OP solve, a DC sweep, or a batch of both.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Default Gmin conductance added node-to-ground during the Gmin-on
    /// pass of `op_analysis` and as the base of the Gmin-stepping ladder.
    pub gmin: f64,

    /// Maximum Newton-Raphson iterations per solve attempt.
    pub dc_max_nr_iter: usize,

    /// Whether `op_analysis` consults the external `DcGuessProvider` when
    /// no explicit initial guess is supplied.
    pub dc_use_guess: bool,

    /// Whether a non-converging sweep point is skipped (`true`) or aborts
    /// the whole sweep (`false`).
    pub dc_sweep_skip_allowed: bool,

    /// Enables the direct (un-stepped) solve attempt.
    pub use_standard_solve_method: bool,
    /// Enables the Gmin-stepping convergence aid.
    pub use_gmin_stepping: bool,
    /// Enables the source-stepping convergence aid.
    pub use_source_stepping: bool,

    /// Enables the iteration-count damping guard in `get_td`.
    pub nr_damp_first_iters: bool,
    /// Enables the locked-node damping guard in `get_td`.
    pub nl_voltages_lock: bool,
    /// Multiple of the thermal voltage a locked-node pair may move by in
    /// one damped Newton step.
    pub nl_voltages_lock_factor: f64,

    /// Relative tolerance for the voltage block of the convergence check.
    pub ver: f64,
    /// Absolute tolerance for the voltage block of the convergence check.
    pub vea: f64,
    /// Relative tolerance for the current block of the convergence check.
    pub ier: f64,
    /// Absolute tolerance for the current block of the convergence check.
    pub iea: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            gmin: 1e-12,
            dc_max_nr_iter: 300,
            dc_use_guess: true,
            dc_sweep_skip_allowed: false,

            use_standard_solve_method: true,
            use_gmin_stepping: true,
            use_source_stepping: true,

            nr_damp_first_iters: true,
            nl_voltages_lock: true,
            nl_voltages_lock_factor: 2.0,

            ver: 1e-3,
            vea: 1e-6,
            ier: 1e-3,
            iea: 1e-12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_tolerances() {
        let config = Configuration::default();
        assert_eq!(config.vea, 1e-6);
        assert_eq!(config.iea, 1e-12);
        assert_eq!(config.dc_max_nr_iter, 300);
    }
}
