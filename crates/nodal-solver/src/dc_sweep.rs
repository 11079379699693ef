//! DC sweep controller (`dc_analysis`).
//!
//! Sweeps one independent source across a linear or logarithmic range,
//! reusing each point's converged solution as the next point's initial
//! guess. The circuit's swept source is a scoped mutation: its pre-sweep
//! value is restored on every exit path.
use crate::guess::DcGuessProvider;
use crate::op;
use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepType {
    Linear,
    Logarithmic,
}

/// One converged point of a DC sweep.
#[derive(Debug, Clone)]
pub struct DcSweepPoint {
    pub sweep_value: f64,
    pub x: Vec<f64>,
}

/// Sweeps `element_identifier` (a voltage or current source) from `start`
/// to `stop` in steps of `step`.
///
/// Fails with [`Error::UnboundedStepping`] if `(stop - start) * step <= 0`,
/// or if `sweep_type` is [`SweepType::Logarithmic`] and `stop <= start`.
/// Fails with [`Error::MissingSource`] if no such source exists.
pub fn solve(
    circuit: &mut Circuit,
    config: &Configuration,
    guess: Option<&dyn DcGuessProvider>,
    element_identifier: &str,
    start: f64,
    stop: f64,
    step: f64,
    sweep_type: SweepType,
) -> Result<Vec<DcSweepPoint>> {
    if (stop - start) * step <= 0.0 {
        return Err(Error::UnboundedStepping);
    }
    if sweep_type == SweepType::Logarithmic && stop <= start {
        return Err(Error::UnboundedStepping);
    }

    let index = circuit
        .elements()
        .iter()
        .position(|e| e.identifier() == element_identifier)
        .ok_or_else(|| Error::MissingSource(element_identifier.to_string()))?;

    let original = read_source_value(circuit, index)?;
    let points = sweep_points(start, stop, step, sweep_type);

    let outcome = run_sweep(circuit, config, guess, index, &points);

    // Unconditional restoration: runs before the sweep's own result (success,
    // skip, or abort) is returned to the caller.
    set_source_value(circuit, index, original);

    outcome
}

fn sweep_points(start: f64, stop: f64, step: f64, sweep_type: SweepType) -> Vec<f64> {
    let num_steps = ((stop - start) / step).abs() as usize + 1;
    match sweep_type {
        SweepType::Linear => (0..num_steps).map(|k| start + k as f64 * step).collect(),
        SweepType::Logarithmic => {
            if num_steps < 2 {
                return vec![start];
            }
            let delta = (stop.log10() - start.log10()) / (num_steps - 1) as f64;
            (0..num_steps).map(|k| 10f64.powf(start.log10() + k as f64 * delta)).collect()
        }
    }
}

fn run_sweep(
    circuit: &mut Circuit,
    config: &Configuration,
    guess: Option<&dyn DcGuessProvider>,
    index: usize,
    points: &[f64],
) -> Result<Vec<DcSweepPoint>> {
    let mut results = Vec::new();
    let mut previous_x: Option<Vec<f64>> = None;

    for &value in points {
        set_source_value(circuit, index, value);

        let first_point = previous_x.is_none();
        let outcome = op::solve(circuit, config, if first_point { guess } else { None }, previous_x.as_deref())?;

        if !outcome.converged {
            log::warn!("dc_analysis: sweep point {value} failed to converge");
            if config.dc_sweep_skip_allowed {
                continue;
            }
            log::warn!("dc_analysis: aborting sweep, returning the {} point(s) already solved", results.len());
            break;
        }

        previous_x = Some(outcome.x.clone());
        results.push(DcSweepPoint { sweep_value: value, x: outcome.x });
    }

    Ok(results)
}

fn read_source_value(circuit: &Circuit, index: usize) -> Result<f64> {
    match &circuit.elements()[index] {
        Element::VoltageSource(v) => Ok(v.dc_value),
        Element::CurrentSource(i) => Ok(i.dc_value),
        other => Err(Error::MissingSource(other.identifier())),
    }
}

fn set_source_value(circuit: &mut Circuit, index: usize, value: f64) {
    match &mut circuit.elements_mut()[index] {
        Element::VoltageSource(v) => v.dc_value = value,
        Element::CurrentSource(i) => i.dc_value = value,
        _ => unreachable!("validated as a source by read_source_value at sweep setup"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nodal_circuit::elements::resistor::Resistor;
    use nodal_circuit::elements::voltage_source::VoltageSource;

    fn divider() -> Circuit {
        let mut b = Circuit::builder();
        let n1 = b.node("1");
        let n2 = b.node("2");
        b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 0.0)));
        b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
        b.add(Element::Resistor(Resistor::new("2", n2, GROUND, 1000.0)));
        b.build().unwrap()
    }

    #[test]
    fn node_voltages_vary_affinely_with_the_swept_source() {
        let mut circuit = divider();
        let points = solve(&mut circuit, &Configuration::default(), None, "V1", 0.0, 2.0, 1.0, SweepType::Linear).unwrap();

        assert_eq!(points.len(), 3);
        for point in &points {
            assert_relative_eq!(point.x[1], point.sweep_value * 0.5, max_relative = 1e-9);
        }
    }

    #[test]
    fn source_value_is_restored_after_a_successful_sweep() {
        let mut circuit = divider();
        solve(&mut circuit, &Configuration::default(), None, "V1", 0.0, 2.0, 1.0, SweepType::Linear).unwrap();
        match &circuit.elements()[0] {
            Element::VoltageSource(v) => assert_eq!(v.dc_value, 0.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn negative_step_toward_a_higher_stop_is_rejected() {
        let mut circuit = divider();
        let result = solve(&mut circuit, &Configuration::default(), None, "V1", 0.0, 1.0, -0.1, SweepType::Linear);
        assert!(matches!(result, Err(Error::UnboundedStepping)));
    }

    #[test]
    fn descending_logarithmic_sweep_is_rejected() {
        let mut circuit = divider();
        let result = solve(&mut circuit, &Configuration::default(), None, "V1", 1.0, 0.001, 0.1, SweepType::Logarithmic);
        assert!(matches!(result, Err(Error::UnboundedStepping)));
    }

    #[test]
    fn an_unknown_sweep_element_never_mutates_the_circuit() {
        let mut circuit = divider();
        let result = solve(&mut circuit, &Configuration::default(), None, "V9", 0.0, 1.0, 0.1, SweepType::Linear);
        assert!(matches!(result, Err(Error::MissingSource(_))));
        match &circuit.elements()[0] {
            Element::VoltageSource(v) => assert_eq!(v.dc_value, 0.0),
            _ => unreachable!(),
        }
    }
}
