//! External result-reporting contracts (§6).
//!
//! Result file formatting is an explicit Non-goal of the analysis core: this
//! crate does not write Parquet, CSV, or any other format. It defines the
//! `ResultSink`/`ProgressTicker` interfaces a caller composes with the core,
//! plus a logging-only reference sink in the teacher's `log::info!` style —
//! a binary that wants a real file format implements `ResultSink` itself.
use log::{info, warn};
use nodal_solver::op::OpOutcome;
use nodal_solver::op_report::OpReport;

/// Per-sweep-point accumulator handed out by [`ResultSink::dc_solution`].
pub trait DcSink {
    fn add_op(&mut self, sweep_value: f64, x: &[f64]);
}

/// Consumes analysis outcomes as they complete.
pub trait ResultSink {
    type Dc: DcSink;

    fn dc_solution(&mut self, sweepvar: &str, start: f64, stop: f64) -> Self::Dc;

    fn op_solution(&mut self, outcome: &OpOutcome, report: &OpReport);
}

/// Scoped progress display; `step` and `hide` carry no semantic meaning for
/// the analysis itself.
pub trait ProgressTicker {
    fn step(&mut self);
    fn hide(&mut self);
}

/// Cross-checks two independently obtained solution vectors over the same
/// variable ordering and returns the names of variables outside `tol`.
/// `op::solve` already runs this internally between its gmin-on/gmin-off
/// passes (see `OpOutcome::gmin_check_warnings`); this free function exists
/// for a sink that wants to re-run the comparison against a solution
/// obtained some other way.
pub fn gmin_check(variable_names: &[String], a: &[f64], b: &[f64], tol: f64) -> Vec<String> {
    variable_names
        .iter()
        .zip(a.iter().zip(b.iter()))
        .filter(|(_, (x, y))| (*x - *y).abs() > tol)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Logs every result through `log`; writes nothing to disk. A binary wiring
/// a real output format composes its own `ResultSink` instead of this one.
#[derive(Debug, Default)]
pub struct LoggingResultSink;

pub struct LoggingDcSink {
    sweepvar: String,
    points: usize,
}

impl DcSink for LoggingDcSink {
    fn add_op(&mut self, sweep_value: f64, x: &[f64]) {
        self.points += 1;
        info!("dc_analysis: {}={sweep_value} -> {} variables solved ({} points so far)", self.sweepvar, x.len(), self.points);
    }
}

impl ResultSink for LoggingResultSink {
    type Dc = LoggingDcSink;

    fn dc_solution(&mut self, sweepvar: &str, start: f64, stop: f64) -> Self::Dc {
        info!("dc_analysis: sweeping {sweepvar} from {start} to {stop}");
        LoggingDcSink { sweepvar: sweepvar.to_string(), points: 0 }
    }

    fn op_solution(&mut self, outcome: &OpOutcome, report: &OpReport) {
        if outcome.converged {
            info!("op_analysis: converged in {} iterations, total power {}", outcome.iterations, report.total_power);
        } else {
            warn!("op_analysis: failed to converge after {} iterations", outcome.iterations);
        }
        for warning in &outcome.gmin_check_warnings {
            warn!("op_analysis: gmin check failed for {warning}");
        }
        for warning in &outcome.ground_path_warnings {
            warn!("op_analysis: node {warning} has no DC path to ground");
        }
    }
}

/// No-op progress ticker, matching `log`'s own no-op-by-default posture: safe
/// to use when nothing is wired to display progress.
#[derive(Debug, Default)]
pub struct NullProgressTicker;

impl ProgressTicker for NullProgressTicker {
    fn step(&mut self) {}
    fn hide(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gmin_check_flags_only_variables_outside_tolerance() {
        let names = vec!["V(n1)".to_string(), "V(n2)".to_string()];
        let a = [1.0, 0.65];
        let b = [1.0, 0.80];
        let offenders = gmin_check(&names, &a, &b, 1e-3);
        assert_eq!(offenders, vec!["V(n2)".to_string()]);
    }

    #[test]
    fn gmin_check_is_empty_when_both_solutions_agree() {
        let names = vec!["V(n1)".to_string()];
        let a = [1.0];
        let b = [1.0 + 1e-9];
        assert!(gmin_check(&names, &a, &b, 1e-6).is_empty());
    }

    #[test]
    fn logging_dc_sink_counts_points_added() {
        let mut sink = LoggingResultSink;
        let mut dc = sink.dc_solution("V1", 0.0, 1.0);
        dc.add_op(0.0, &[0.0, 0.0]);
        dc.add_op(0.5, &[0.5, 0.25]);
        assert_eq!(dc.points, 2);
    }

    #[test]
    fn null_progress_ticker_is_harmless() {
        let mut ticker = NullProgressTicker;
        ticker.step();
        ticker.hide();
    }
}
