//! Supplemental per-element OP power/branch-current summary (§4.11),
//! grounded in the original implementation's `print_elements_ops`.
//!
//! Never part of MNA assembly or the NR kernel: computing it cannot fail,
//! and it is handed to the Result sink alongside (never instead of) the
//! solver's `x` vector.
use crate::assembler::node_row;
use crate::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct OpReport {
    /// Branch current of every voltage-defined element, keyed by
    /// identifier.
    pub branch_currents: HashMap<String, f64>,
    /// Running total power, following the original implementation's sign
    /// convention literally: delivered power is negative, dissipated
    /// power is positive.
    pub total_power: f64,
}

/// Builds an [`OpReport`] from a converged OP solution `x`.
pub fn build(circuit: &Circuit, x: &[f64]) -> OpReport {
    let n_minus_1 = circuit.num_nodes() - 1;
    let mut branch_currents = HashMap::new();

    for (p, &idx) in circuit.voltage_defined_order().iter().enumerate() {
        let element = &circuit.elements()[idx];
        branch_currents.insert(element.identifier(), x[n_minus_1 + p]);
    }

    let v_at = |n: NodeId| node_row(circuit, n).map_or(0.0, |r| x[r]);

    let mut total_power = 0.0;
    for element in circuit.elements() {
        match element {
            Element::VoltageSource(v) => {
                let branch = *branch_currents.get(&v.identifier()).unwrap_or(&0.0);
                total_power += (v_at(v.plus) - v_at(v.minus)) * branch;
            }
            Element::Evsource(e) => {
                let branch = *branch_currents.get(&e.identifier()).unwrap_or(&0.0);
                total_power += (v_at(e.plus) - v_at(e.minus)) * branch;
            }
            Element::CurrentSource(i) => {
                total_power += (v_at(i.plus) - v_at(i.minus)) * i.dc_value;
            }
            Element::Gisource(g) => {
                // Literal per the original implementation's `print_elements_ops`:
                // alpha-scaled drive voltage times drive voltage, not output-port
                // voltage times current.
                let drive = v_at(g.sense_plus) - v_at(g.sense_minus);
                total_power += g.gain * drive * drive;
            }
            _ => {}
        }
    }

    OpReport { branch_currents, total_power }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodal_circuit::elements::resistor::Resistor;
    use nodal_circuit::elements::voltage_source::VoltageSource;

    #[test]
    fn resistive_divider_branch_current_matches_the_solver_output() {
        let mut b = Circuit::builder();
        let n1 = b.node("1");
        let n2 = b.node("2");
        b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 1.0)));
        b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
        b.add(Element::Resistor(Resistor::new("2", n2, GROUND, 1000.0)));
        let circuit = b.build().unwrap();

        let x = [1.0, 0.5, -5e-4];
        let report = build(&circuit, &x);
        assert_eq!(report.branch_currents["V1"], -5e-4);
        assert!((report.total_power - (1.0 * -5e-4)).abs() < 1e-12);
    }
}
