use approx::assert_relative_eq;
use nodal_circuit::elements::diode::Diode;
use nodal_circuit::elements::resistor::Resistor;
use nodal_circuit::elements::voltage_source::VoltageSource;
use nodal_circuit::prelude::*;
use nodal_solver::config::Configuration;
use nodal_solver::op;

fn divider() -> Circuit {
    let mut b = Circuit::builder();
    let n1 = b.node("1");
    let n2 = b.node("2");
    b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 1.0)));
    b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
    b.add(Element::Resistor(Resistor::new("2", n2, GROUND, 1000.0)));
    b.build().unwrap()
}

/// S1: resistive divider. NR should converge in exactly one iteration
/// since the circuit is purely linear.
#[test]
fn s1_resistive_divider() {
    let circuit = divider();
    let outcome = op::solve(&circuit, &Configuration::default(), None, None).unwrap();

    assert!(outcome.converged);
    assert_relative_eq!(outcome.x[0], 1.0, max_relative = 1e-9);
    assert_relative_eq!(outcome.x[1], 0.5, max_relative = 1e-9);
    assert_relative_eq!(outcome.x[2], -5e-4, max_relative = 1e-9);
    assert_eq!(outcome.iterations, 2); // one NR iteration per op1/op2 solve
}

/// S2: diode clamp. The midpoint voltage should settle near the diode's
/// forward drop, with the gmin-on/gmin-off cross-check passing.
#[test]
fn s2_diode_clamp() {
    let mut b = Circuit::builder();
    let n1 = b.node("1");
    let n2 = b.node("2");
    b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 2.0)));
    b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
    b.add(Element::Nonlinear(Box::new(Diode::new("1", n2, GROUND))));
    let circuit = b.build().unwrap();

    let outcome = op::solve(&circuit, &Configuration::default(), None, None).unwrap();

    assert!(outcome.converged);
    assert_relative_eq!(outcome.x[1], 0.65, max_relative = 0.02);
    assert!(outcome.gmin_check_warnings.is_empty());

    let expected_current = -(2.0 - outcome.x[1]) / 1000.0;
    assert_relative_eq!(outcome.x[2], expected_current, max_relative = 1e-6);
}

/// Invariant: idempotence. Rerunning op_analysis with the previous
/// solution as x0 (guess disabled) converges with no extra NR work beyond
/// the gmin-on/gmin-off pass itself.
#[test]
fn idempotence_of_op() {
    let circuit = divider();
    let config = Configuration::default();
    let first = op::solve(&circuit, &config, None, None).unwrap();
    let second = op::solve(&circuit, &config, None, Some(&first.x)).unwrap();

    assert!(second.converged);
    for (a, b) in first.x.iter().zip(second.x.iter()) {
        assert_relative_eq!(a, b, max_relative = 1e-9);
    }
}

/// S6: two capacitors in series between a driven node and ground leave a
/// floating midpoint; `op_analysis` should warn but still solve (Gmin
/// keeps the system conditioned).
#[test]
fn s6_ground_path_warning_does_not_block_solving() {
    use nodal_circuit::elements::capacitor::Capacitor;

    let mut b = Circuit::builder();
    let a = b.node("A");
    let m = b.node("M");
    b.add(Element::VoltageSource(VoltageSource::new("1", a, GROUND, 5.0)));
    b.add(Element::Capacitor(Capacitor::new("1", a, m, 1e-6)));
    b.add(Element::Capacitor(Capacitor::new("2", m, GROUND, 1e-6)));
    let circuit = b.build().unwrap();

    let outcome = op::solve(&circuit, &Configuration::default(), None, None).unwrap();

    assert!(outcome.converged);
    assert_eq!(outcome.ground_path_warnings, vec!["M".to_string()]);
}
