use approx::assert_relative_eq;
use nodal_circuit::elements::diode::Diode;
use nodal_circuit::elements::resistor::Resistor;
use nodal_circuit::elements::voltage_source::VoltageSource;
use nodal_circuit::prelude::*;
use nodal_solver::assembler;
use nodal_solver::config::Configuration;
use nodal_solver::dc_solve::{self, DcSolveParams};

fn diode_clamp() -> Circuit {
    let mut b = Circuit::builder();
    let n1 = b.node("1");
    let n2 = b.node("2");
    b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 2.0)));
    b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
    b.add(Element::Nonlinear(Box::new(Diode::new("1", n2, GROUND))));
    b.build().unwrap()
}

/// S5 (source-stepping rescue), exercised directly: with standard solve
/// and Gmin stepping both disabled, only the source-stepping ladder is
/// available. It should still walk the diode clamp up to full source
/// amplitude and land on the same answer the unrestricted solver finds.
#[test]
fn s5_source_stepping_alone_still_converges() {
    let circuit = diode_clamp();
    let sys = assembler::assemble(&circuit).unwrap();
    let n_dc: Vec<f64> = (0..sys.size()).map(|i| sys.b[(i, 0)]).collect();

    let config = Configuration {
        use_standard_solve_method: false,
        use_gmin_stepping: false,
        use_source_stepping: true,
        ..Configuration::default()
    };

    let outcome = dc_solve::solve(
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
    assert_relative_eq!(x[1], 0.65, max_relative = 0.02);
}

/// When every strategy is disabled, `dc_solve` reports failure rather than
/// panicking or silently returning a stale guess.
#[test]
fn all_strategies_disabled_reports_no_solution() {
    let circuit = diode_clamp();
    let sys = assembler::assemble(&circuit).unwrap();
    let n_dc: Vec<f64> = (0..sys.size()).map(|i| sys.b[(i, 0)]).collect();

    let config = Configuration {
        use_standard_solve_method: false,
        use_gmin_stepping: false,
        use_source_stepping: false,
        ..Configuration::default()
    };

    let outcome = dc_solve::solve(
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

    assert!(!outcome.converged);
    assert!(outcome.x.is_none());
}
