//! Operating Point controller (`op_analysis`).
use crate::assembler::{self, add_gmin};
use crate::dc_solve::{self, DcSolveParams};
use crate::guess::DcGuessProvider;
use crate::prelude::*;

/// Result of a full `op_analysis` call: the Gmin-on/Gmin-off cross-check
/// result, plus whatever warnings the two diagnostics in §4.6/§4.8 raised.
#[derive(Debug, Clone)]
pub struct OpOutcome {
    pub x: Vec<f64>,
    pub converged: bool,
    pub iterations: usize,
    pub gmin_check_warnings: Vec<String>,
    pub ground_path_warnings: Vec<String>,
}

/// Runs the Gmin-on, then Gmin-off cross-check operating-point solve.
///
/// `guess` is consulted only when `x0` is `None` and `config.dc_use_guess`
/// is set.
pub fn solve(circuit: &Circuit, config: &Configuration, guess: Option<&dyn DcGuessProvider>, x0: Option<&[f64]>) -> Result<OpOutcome> {
    let ground_path_warnings = circuit.check_ground_paths();
    for node in &ground_path_warnings {
        log::warn!("no path to ground from node {node}");
    }

    let m = assembler::assemble(circuit)?;
    let size = m.size();
    let n_dc: Vec<f64> = (0..size).map(|i| m.b[(i, 0)]).collect();

    let initial_x0: Vec<f64> = match x0 {
        Some(x) => x.to_vec(),
        None if config.dc_use_guess => guess.map(|g| g.get_dc_guess(circuit)).unwrap_or_else(|| vec![0.0; size]),
        None => vec![0.0; size],
    };

    log::info!("op_analysis: solving with gmin");
    let gmin_matrix = add_gmin(&m.a, circuit, config.gmin);
    let op1 = dc_solve::solve(
        config,
        &DcSolveParams {
            m: &m.a,
            gmin_matrix: Some(&gmin_matrix),
            n_dc: &n_dc,
            circuit,
            n_tran: None,
            x0: Some(&initial_x0),
            time: 0.0,
            max_iter: None,
            skip_tt: false,
        },
    )?;

    let Some(x1) = op1.x else {
        log::warn!("op_analysis: gmin-on solve failed to converge");
        return Ok(OpOutcome {
            x: Vec::new(),
            converged: false,
            iterations: op1.total_iterations,
            gmin_check_warnings: Vec::new(),
            ground_path_warnings,
        });
    };

    log::info!("op_analysis: re-solving with gmin removed");
    let op2 = dc_solve::solve(
        config,
        &DcSolveParams {
            m: &m.a,
            gmin_matrix: None,
            n_dc: &n_dc,
            circuit,
            n_tran: None,
            x0: Some(&x1),
            time: 0.0,
            max_iter: None,
            skip_tt: false,
        },
    )?;

    match op2.x {
        Some(x2) => {
            let gmin_check_warnings = gmin_check(circuit, config, &x1, &x2);
            if !gmin_check_warnings.is_empty() {
                log::warn!("op_analysis: gmin cross-check mismatch on {}", gmin_check_warnings.join(", "));
            }
            Ok(OpOutcome {
                x: x2,
                converged: true,
                iterations: op1.total_iterations + op2.total_iterations,
                gmin_check_warnings,
                ground_path_warnings,
            })
        }
        None => {
            log::warn!("op_analysis: gmin-off re-solve failed to converge, keeping the gmin-on solution");
            Ok(OpOutcome {
                x: x1,
                converged: true,
                iterations: op1.total_iterations,
                gmin_check_warnings: Vec::new(),
                ground_path_warnings,
            })
        }
    }
}

/// Compares the Gmin-on and Gmin-off solutions elementwise, returning the
/// display names of every variable outside `e_a + e_r*|op2|`.
fn gmin_check(circuit: &Circuit, config: &Configuration, op1: &[f64], op2: &[f64]) -> Vec<String> {
    let n_minus_1 = circuit.num_nodes() - 1;
    (0..op2.len())
        .filter(|&i| {
            let (er, ea) = if i < n_minus_1 { (config.ver, config.vea) } else { (config.ier, config.iea) };
            (op2[i] - op1[i]).abs() > ea + er * op2[i].abs()
        })
        .map(|i| variable_name(circuit, i, n_minus_1))
        .collect()
}

fn variable_name(circuit: &Circuit, i: usize, n_minus_1: usize) -> String {
    if i < n_minus_1 {
        format!("V({})", circuit.node_label(i + 1))
    } else {
        let p = i - n_minus_1;
        circuit.find_vde(p).map_or_else(|| format!("I(branch {p})"), |e| format!("I({})", e.identifier()))
    }
}
