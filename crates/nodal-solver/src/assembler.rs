//! MNA system assembly (`generate_mna_and_N`).
//!
//! Builds the reduced Modified Nodal Analysis matrix `M` and constant
//! vector `N` from a circuit's linear devices. Nonlinear devices
//! contribute nothing here; their Jacobian/excitation update is built
//! fresh each Newton-Raphson iteration by [`crate::contribution`].
use crate::prelude::*;
use faer::Mat;

/// Reduced-system row/column for node `n`, or `None` for ground (whose row
/// and column are dropped from the reduced system).
pub fn node_row(circuit: &Circuit, n: NodeId) -> Option<usize> {
    if n == GROUND { None } else { Some(n - 1) }
}

/// Assembles the reduced MNA system for `circuit`'s linear elements.
///
/// Fails with [`nodal_circuit::Error::UnsupportedElement`] if the circuit
/// contains an `Hvsource`, which has no stamping rule.
pub fn assemble(circuit: &Circuit) -> Result<MnaSystem> {
    let size = circuit.reduced_size();
    let mut sys = MnaSystem::zeros(size);

    for element in circuit.elements() {
        match element {
            Element::Resistor(r) => {
                stamp_conductance(&mut sys, node_row(circuit, r.plus), node_row(circuit, r.minus), r.conductance());
            }
            Element::Gisource(g) => {
                stamp_vccs(
                    &mut sys,
                    node_row(circuit, g.plus),
                    node_row(circuit, g.minus),
                    node_row(circuit, g.sense_plus),
                    node_row(circuit, g.sense_minus),
                    g.gain,
                );
            }
            Element::CurrentSource(i) if i.waveform.is_none() => {
                stamp_current_source(&mut sys, node_row(circuit, i.plus), node_row(circuit, i.minus), i.dc_value);
            }
            // Capacitors are open circuits at DC; time-dependent sources
            // and nonlinear devices are folded in by later stages.
            Element::Capacitor(_) | Element::CurrentSource(_) | Element::Nonlinear(_) => {}
            _ if element.is_voltage_defined() => {}
            other => return Err(nodal_circuit::Error::UnsupportedElement(other.identifier()).into()),
        }
    }

    let n_minus_1 = circuit.num_nodes() - 1;
    for (p, &idx) in circuit.voltage_defined_order().iter().enumerate() {
        let branch_row = n_minus_1 + p;
        match &circuit.elements()[idx] {
            Element::VoltageSource(v) => {
                stamp_kcl_kvl(&mut sys, node_row(circuit, v.plus), node_row(circuit, v.minus), branch_row);
                if v.waveform.is_none() {
                    sys.b[(branch_row, 0)] = -v.dc_value;
                }
            }
            Element::Inductor(l) => {
                // Ideal inductor: a short at DC, zero right-hand side.
                stamp_kcl_kvl(&mut sys, node_row(circuit, l.plus), node_row(circuit, l.minus), branch_row);
            }
            Element::Evsource(e) => {
                stamp_kcl_kvl(&mut sys, node_row(circuit, e.plus), node_row(circuit, e.minus), branch_row);
                if let Some(r) = node_row(circuit, e.sense_plus) {
                    sys.a[(branch_row, r)] -= e.gain;
                }
                if let Some(r) = node_row(circuit, e.sense_minus) {
                    sys.a[(branch_row, r)] += e.gain;
                }
            }
            Element::Hvsource(h) => {
                return Err(nodal_circuit::Error::UnsupportedElement(h.identifier()).into());
            }
            other => unreachable!("{other:?} is not voltage-defined"),
        }
    }

    Ok(sys)
}

fn stamp_conductance(sys: &mut MnaSystem, plus: Option<usize>, minus: Option<usize>, g: f64) {
    if let Some(p) = plus {
        sys.a[(p, p)] += g;
    }
    if let Some(m) = minus {
        sys.a[(m, m)] += g;
    }
    if let (Some(p), Some(m)) = (plus, minus) {
        sys.a[(p, m)] -= g;
        sys.a[(m, p)] -= g;
    }
}

fn stamp_vccs(
    sys: &mut MnaSystem,
    plus: Option<usize>,
    minus: Option<usize>,
    sense_plus: Option<usize>,
    sense_minus: Option<usize>,
    alpha: f64,
) {
    if let (Some(p), Some(sp)) = (plus, sense_plus) {
        sys.a[(p, sp)] += alpha;
    }
    if let (Some(p), Some(sm)) = (plus, sense_minus) {
        sys.a[(p, sm)] -= alpha;
    }
    if let (Some(m), Some(sp)) = (minus, sense_plus) {
        sys.a[(m, sp)] -= alpha;
    }
    if let (Some(m), Some(sm)) = (minus, sense_minus) {
        sys.a[(m, sm)] += alpha;
    }
}

fn stamp_current_source(sys: &mut MnaSystem, plus: Option<usize>, minus: Option<usize>, value: f64) {
    if let Some(p) = plus {
        sys.b[(p, 0)] += value;
    }
    if let Some(m) = minus {
        sys.b[(m, 0)] -= value;
    }
}

fn stamp_kcl_kvl(sys: &mut MnaSystem, plus: Option<usize>, minus: Option<usize>, branch_row: usize) {
    if let Some(p) = plus {
        sys.a[(p, branch_row)] += 1.0;
        sys.a[(branch_row, p)] += 1.0;
    }
    if let Some(m) = minus {
        sys.a[(m, branch_row)] -= 1.0;
        sys.a[(branch_row, m)] -= 1.0;
    }
}

/// `M + g*I` restricted to node rows: the homotopy matrix used by both the
/// Gmin-on pass of `op_analysis` and each rung of the Gmin-stepping ladder.
/// KVL rows (voltage-defined branch currents) are left untouched.
pub fn add_gmin(m: &Mat<f64>, circuit: &Circuit, g: f64) -> Mat<f64> {
    let mut augmented = m.clone();
    let n_minus_1 = circuit.num_nodes() - 1;
    for i in 0..n_minus_1 {
        augmented[(i, i)] += g;
    }
    augmented
}
