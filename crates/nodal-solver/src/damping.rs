//! Newton-Raphson step damping (`get_td`).
use crate::assembler::node_row;
use crate::prelude::*;
use nodal_circuit::constants::THERMAL_VOLTAGE;

/// Damping coefficient in `(0, 1]` applied to a raw Newton step `dx`.
///
/// Combines two independent guards, each individually disable-able via
/// `config`, and returns their minimum:
/// - an iteration-count guard that ramps full-strength steps in slowly;
/// - a locked-node guard that caps how far any nonlinear drive-port pair
///   may move in one step, relative to the thermal voltage.
pub fn get_td(circuit: &Circuit, config: &Configuration, iter: usize, dx: &[f64]) -> f64 {
    let td1 = if !config.nr_damp_first_iters {
        1.0
    } else if iter < 10 {
        0.01
    } else if iter < 20 {
        0.1
    } else {
        1.0
    };

    let td2 = if config.nl_voltages_lock {
        circuit
            .locked_nodes()
            .iter()
            .fold(f64::INFINITY, |min_td, &(n1, n2)| {
                let d1 = node_row(circuit, n1).map_or(0.0, |r| dx[r]);
                let d2 = node_row(circuit, n2).map_or(0.0, |r| dx[r]);
                let delta_v = (d1 - d2).abs();
                let bound = config.nl_voltages_lock_factor * THERMAL_VOLTAGE;
                if delta_v > bound {
                    min_td.min(bound / delta_v)
                } else {
                    min_td
                }
            })
    } else {
        f64::INFINITY
    };

    td1.min(td2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodal_circuit::elements::diode::Diode;

    fn diode_circuit() -> Circuit {
        let mut b = Circuit::builder();
        let n1 = b.node("1");
        b.add(Element::Nonlinear(Box::new(Diode::new("1", n1, GROUND))));
        b.build().unwrap()
    }

    #[test]
    fn early_iterations_are_heavily_damped() {
        let circuit = diode_circuit();
        let config = Configuration { nl_voltages_lock: false, ..Configuration::default() };
        assert_eq!(get_td(&circuit, &config, 0, &[0.0]), 0.01);
        assert_eq!(get_td(&circuit, &config, 15, &[0.0]), 0.1);
        assert_eq!(get_td(&circuit, &config, 25, &[0.0]), 1.0);
    }

    #[test]
    fn locked_node_guard_bounds_the_step_to_the_thermal_voltage_factor() {
        let circuit = diode_circuit();
        let config = Configuration { nr_damp_first_iters: false, ..Configuration::default() };
        let bound = config.nl_voltages_lock_factor * THERMAL_VOLTAGE;
        let dx = [bound * 10.0];
        let td = get_td(&circuit, &config, 100, &dx);
        assert!((td * dx[0]).abs() <= bound + 1e-12);
    }
}
