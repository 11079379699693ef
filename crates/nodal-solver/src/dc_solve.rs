//! Convergence-aid driver (`dc_solve`).
//!
//! Wraps the Newton-Raphson kernel with a three-phase fallback: a direct
//! solve, then Gmin stepping, then source stepping. Also folds any
//! time-variant independent-source values into the constant vector for
//! callers solving at a fixed time point.
use crate::assembler::{add_gmin, node_row};
use crate::newton::{self, NewtonOutcome};
use crate::prelude::*;
use faer::Mat;

/// The fixed source-stepping schedule: ten scaled attempts, followed by an
/// explicit full-strength (factor 1.0) solve. The reference implementation
/// leaves it ambiguous whether termination after the 10th scaled step
/// implies a final full solve; this performs one explicitly.
const SOURCE_STEPS: [f64; 10] = [0.001, 0.005, 0.01, 0.03, 0.1, 0.3, 0.5, 0.7, 0.8, 0.9];

/// Outcome of the convergence-aid driver: `x`/`residual` are `None` when
/// every configured strategy failed.
pub struct DcSolveOutcome {
    pub x: Option<Vec<f64>>,
    pub residual: Option<Vec<f64>>,
    pub converged: bool,
    pub total_iterations: usize,
}

/// Inputs to a single `dc_solve` call. Borrowed rather than owned since
/// `M`/`N` are typically built once by the caller and reused (e.g. across
/// sweep points or strategy phases).
pub struct DcSolveParams<'a> {
    pub m: &'a Mat<f64>,
    /// A precomputed `M + Gmin` matrix the Standard strategy solves against
    /// instead of the bare `m`, e.g. `op_analysis`'s Gmin-on pass. Gmin
    /// stepping always ladders from the bare `m`, never from this matrix —
    /// otherwise its own conductance-to-ground ladder would double-count
    /// the one already baked in here.
    pub gmin_matrix: Option<&'a Mat<f64>>,
    pub n_dc: &'a [f64],
    pub circuit: &'a Circuit,
    /// An additional constant term folded in verbatim (e.g. a transient
    /// companion-model contribution); `None` for a pure DC solve.
    pub n_tran: Option<&'a [f64]>,
    pub x0: Option<&'a [f64]>,
    pub time: f64,
    pub max_iter: Option<usize>,
    /// Skips time-variant source folding, for callers that have already
    /// folded `N` themselves.
    pub skip_tt: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Standard,
    GminStepping,
    SourceStepping,
}

pub fn solve(config: &Configuration, params: &DcSolveParams) -> Result<DcSolveOutcome> {
    let size = params.n_dc.len();

    let mut n = params.n_dc.to_vec();
    if !params.skip_tt {
        fold_time_variant(params.circuit, params.time, &mut n);
    }
    if let Some(n_tran) = params.n_tran {
        for i in 0..size {
            n[i] += n_tran[i];
        }
    }

    let x0 = params.x0.map(<[f64]>::to_vec).unwrap_or_else(|| vec![0.0; size]);

    let mut local_config = config.clone();
    if let Some(max_iter) = params.max_iter {
        local_config.dc_max_nr_iter = max_iter;
    }

    let strategies = [
        (Strategy::Standard, config.use_standard_solve_method),
        (Strategy::GminStepping, config.use_gmin_stepping),
        (Strategy::SourceStepping, config.use_source_stepping),
    ];
    let mut failed = [false; 3];
    let mut total_iterations = 0usize;

    loop {
        let Some((idx, &(strategy, _))) = strategies.iter().enumerate().find(|(i, &(_, enabled))| enabled && !failed[*i]) else {
            log::warn!("dc_solve: all convergence-aid strategies exhausted without a solution");
            return Ok(DcSolveOutcome { x: None, residual: None, converged: false, total_iterations });
        };

        let attempt = match strategy {
            Strategy::Standard => {
                let standard_matrix = params.gmin_matrix.unwrap_or(params.m);
                run_standard(params.circuit, &local_config, standard_matrix, &n, &x0, params.time)
            }
            Strategy::GminStepping => run_gmin_stepping(config, params.circuit, &local_config, params.m, &n, &x0, params.time),
            Strategy::SourceStepping => run_source_stepping(params.circuit, &local_config, params.m, &n, &x0, params.time),
        };

        match attempt {
            Some((outcome, iters)) => {
                total_iterations += iters;
                log::info!("dc_solve: strategy converged after {total_iterations} total iterations");
                return Ok(DcSolveOutcome {
                    x: Some(outcome.x),
                    residual: Some(outcome.residual),
                    converged: true,
                    total_iterations,
                });
            }
            None => {
                log::info!("dc_solve: a convergence-aid strategy failed, promoting the next one");
                failed[idx] = true;
                // Iteration counts from failed attempts still count toward the total.
            }
        }
    }
}

fn run_standard(circuit: &Circuit, config: &Configuration, m: &Mat<f64>, n: &[f64], x0: &[f64], t: f64) -> Option<(NewtonOutcome, usize)> {
    log::info!("dc_solve: trying standard solve");
    match newton::solve(circuit, config, m, n, x0, t) {
        Ok(outcome) if outcome.converged => {
            let iters = outcome.iterations;
            Some((outcome, iters))
        }
        Ok(_) | Err(_) => None,
    }
}

fn run_gmin_stepping(
    base_config: &Configuration,
    circuit: &Circuit,
    config: &Configuration,
    m: &Mat<f64>,
    n: &[f64],
    x0: &[f64],
    t: f64,
) -> Option<(NewtonOutcome, usize)> {
    log::info!("dc_solve: trying Gmin stepping");
    let min_exp = base_config.gmin.log10().floor() as i32;
    let mut x = x0.to_vec();
    let mut total = 0usize;
    let mut last = None;

    for e in min_exp..=0 {
        let g = 10f64.powi(e);
        let augmented = add_gmin(m, circuit, g);
        match newton::solve(circuit, config, &augmented, n, &x, t) {
            Ok(outcome) if outcome.converged => {
                total += outcome.iterations;
                x.clone_from(&outcome.x);
                last = Some(outcome);
            }
            Ok(outcome) => {
                total += outcome.iterations;
                log::info!("dc_solve: Gmin stepping failed at g=1e{e}");
                return None;
            }
            Err(_) => return None,
        }
    }

    last.map(|outcome| (outcome, total))
}

fn run_source_stepping(circuit: &Circuit, config: &Configuration, m: &Mat<f64>, n: &[f64], x0: &[f64], t: f64) -> Option<(NewtonOutcome, usize)> {
    log::info!("dc_solve: trying source stepping");
    let mut x = x0.to_vec();
    let mut total = 0usize;
    let mut last = None;

    for factor in SOURCE_STEPS.iter().copied().chain(std::iter::once(1.0)) {
        let scaled: Vec<f64> = n.iter().map(|v| v * factor).collect();
        match newton::solve(circuit, config, m, &scaled, &x, t) {
            Ok(outcome) if outcome.converged => {
                total += outcome.iterations;
                x.clone_from(&outcome.x);
                last = Some(outcome);
            }
            Ok(outcome) => {
                total += outcome.iterations;
                log::info!("dc_solve: source stepping failed at factor={factor}");
                return None;
            }
            Err(_) => return None,
        }
    }

    last.map(|outcome| (outcome, total))
}

fn fold_time_variant(circuit: &Circuit, t: f64, n: &mut [f64]) {
    let n_minus_1 = circuit.num_nodes() - 1;

    for (p, &idx) in circuit.voltage_defined_order().iter().enumerate() {
        let element = &circuit.elements()[idx];
        if matches!(element, Element::VoltageSource(_)) {
            if let Some(value) = element.time_varying_value(t) {
                n[n_minus_1 + p] = -value;
            }
        }
    }

    for element in circuit.elements() {
        if let Element::CurrentSource(src) = element {
            if let Some(value) = element.time_varying_value(t) {
                if let Some(r_plus) = node_row(circuit, src.plus) {
                    n[r_plus] += value;
                }
                if let Some(r_minus) = node_row(circuit, src.minus) {
                    n[r_minus] -= value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodal_circuit::elements::resistor::Resistor;
    use nodal_circuit::elements::voltage_source::VoltageSource;
    use nodal_circuit::waveform::Pulse;

    #[test]
    fn standard_strategy_solves_a_resistive_divider() {
        let mut b = Circuit::builder();
        let n1 = b.node("1");
        let n2 = b.node("2");
        b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 1.0)));
        b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
        b.add(Element::Resistor(Resistor::new("2", n2, GROUND, 1000.0)));
        let circuit = b.build().unwrap();

        let sys = crate::assembler::assemble(&circuit).unwrap();
        let n_dc: Vec<f64> = (0..sys.size()).map(|i| sys.b[(i, 0)]).collect();
        let config = Configuration::default();

        let outcome = solve(
            &config,
            &DcSolveParams {
                m: &sys.a,
                gmin_matrix: None,
                n_dc: &n_dc,
                circuit: &circuit,
                n_tran: None,
                x0: None,
                time: 0.0,
                max_iter: None,
                skip_tt: false,
            },
        )
        .unwrap();

        assert!(outcome.converged);
        let x = outcome.x.unwrap();
        assert!((x[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn time_varying_voltage_source_is_folded_at_the_requested_time() {
        let mut b = Circuit::builder();
        let n1 = b.node("1");
        let mut vs = VoltageSource::new("1", n1, GROUND, 0.0);
        vs.waveform = Some(Pulse { initial: 0.0, pulsed: 3.0, delay: 0.0, rise_time: 0.0, fall_time: 0.0, pulse_width: 1.0, period: 10.0 });
        b.add(Element::VoltageSource(vs));
        b.add(Element::Resistor(Resistor::new("1", n1, GROUND, 1000.0)));
        let circuit = b.build().unwrap();

        let sys = crate::assembler::assemble(&circuit).unwrap();
        let n_dc: Vec<f64> = (0..sys.size()).map(|i| sys.b[(i, 0)]).collect();
        let config = Configuration::default();

        let outcome = solve(
            &config,
            &DcSolveParams {
                m: &sys.a,
                gmin_matrix: None,
                n_dc: &n_dc,
                circuit: &circuit,
                n_tran: None,
                x0: None,
                time: 0.5,
                max_iter: None,
                skip_tt: false,
            },
        )
        .unwrap();

        let x = outcome.x.unwrap();
        assert!((x[0] - 3.0).abs() < 1e-9);
    }
}
