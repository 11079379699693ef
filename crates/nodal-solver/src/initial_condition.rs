//! Initial-condition assembly (§4.10): building a reduced-size `x0` from
//! a user-supplied dictionary, and overlaying element-level `ic` values.
use crate::assembler::node_row;
use crate::prelude::*;

/// Builds a reduced-size initial guess from `{ "V(node_label)": value,
/// "I(element_id)": value }`. Missing entries default to 0.
///
/// Fails with [`nodal_circuit::Error::UnrecognizedLabel`] on a malformed
/// key, an unknown node label, or an unknown (or non-voltage-defined)
/// element identifier.
pub fn from_user_dictionary(circuit: &Circuit, values: &HashMap<String, f64>) -> Result<Vec<f64>> {
    let size = circuit.reduced_size();
    let mut x0 = vec![0.0; size];
    let n_minus_1 = circuit.num_nodes() - 1;

    for (key, &value) in values {
        if let Some(label) = key.strip_prefix("V(").and_then(|s| s.strip_suffix(')')) {
            let node = circuit
                .node_id(label)
                .ok_or_else(|| nodal_circuit::Error::UnrecognizedLabel(key.clone()))?;
            if let Some(row) = node_row(circuit, node) {
                x0[row] = value;
            }
        } else if let Some(id) = key.strip_prefix("I(").and_then(|s| s.strip_suffix(')')) {
            let p = circuit
                .voltage_defined_order()
                .iter()
                .position(|&idx| circuit.elements()[idx].identifier() == id)
                .ok_or_else(|| nodal_circuit::Error::UnrecognizedLabel(key.clone()))?;
            x0[n_minus_1 + p] = value;
        } else {
            return Err(nodal_circuit::Error::UnrecognizedLabel(key.clone()).into());
        }
    }

    Ok(x0)
}

/// Overlays element-level initial conditions onto `x0` in place: a
/// capacitor's `ic` forces `v(plus) = v(minus) + ic`; an inductor's `ic`
/// sets its branch current directly. Nonlinear devices carry no `ic` in
/// this data model, so the original implementation's mention of a diode
/// initial condition has no counterpart here.
pub fn apply_element_ics(circuit: &Circuit, x0: &mut [f64]) {
    for (p, &idx) in circuit.voltage_defined_order().iter().enumerate() {
        if let Element::Inductor(l) = &circuit.elements()[idx] {
            if let Some(ic) = l.ic {
                let n_minus_1 = circuit.num_nodes() - 1;
                x0[n_minus_1 + p] = ic;
            }
        }
    }

    for element in circuit.elements() {
        if let Element::Capacitor(c) = element {
            if let Some(ic) = c.ic {
                if let Some(row_plus) = node_row(circuit, c.plus) {
                    let minus_v = node_row(circuit, c.minus).map_or(0.0, |r| x0[r]);
                    x0[row_plus] = minus_v + ic;
                }
            }
        }
    }
}
