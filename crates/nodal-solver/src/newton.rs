//! Damped Newton-Raphson kernel (`mdn_solver`).
//!
//! Solves `F(x) = M x + n + Tx(x) = 0`, where `n` is the caller-supplied
//! constant vector (including any folded time-variant source values) and
//! `Tx` is assembled fresh each iteration by [`crate::contribution`].
use crate::contribution;
use crate::convergence;
use crate::damping::get_td;
use crate::prelude::*;
use faer::Mat;

/// Result of a Newton-Raphson solve attempt, successful or not.
#[derive(Clone, Debug)]
pub struct NewtonOutcome {
    pub x: Vec<f64>,
    pub residual: Vec<f64>,
    /// The last computed step, retained even on non-convergence: the
    /// reference implementation's debug diagnostic prints this value
    /// as-is, from before the final `x` update.
    pub last_dx: Vec<f64>,
    pub converged: bool,
    pub iterations: usize,
}

fn to_column(values: &[f64]) -> Mat<f64> {
    let mut m = Mat::zeros(values.len(), 1);
    for (i, &v) in values.iter().enumerate() {
        m[(i, 0)] = v;
    }
    m
}

/// Runs the damped Newton-Raphson loop for a single `(M, n)` linear system
/// against `circuit`'s nonlinear devices, starting from `x0`, evaluating
/// any time-dependent device behavior at `t`.
///
/// For a purely linear circuit this is a single direct solve: `x = -M^-1 n`.
pub fn solve(circuit: &Circuit, config: &Configuration, m: &Mat<f64>, n: &[f64], x0: &[f64], t: f64) -> Result<NewtonOutcome> {
    let size = n.len();

    if !circuit.is_nonlinear() {
        let sys = MnaSystem { a: m.clone(), b: to_column(n) };
        let solution = sys.solve().map_err(|_| Error::SingularJacobian)?;
        let x: Vec<f64> = solution.iter().map(|&v| -v).collect();
        log::debug!("newton: linear circuit solved directly");
        return Ok(NewtonOutcome {
            x,
            residual: vec![0.0; size],
            last_dx: vec![0.0; size],
            converged: true,
            iterations: 1,
        });
    }

    let mut x = x0.to_vec();
    let mut last_residual = vec![0.0; size];
    let mut last_dx = vec![0.0; size];

    for iter in 0..config.dc_max_nr_iter {
        let contribution = contribution::build(circuit, &x, t);

        let mut j = m.clone();
        for row in 0..size {
            for col in 0..size {
                j[(row, col)] += contribution.delta_j[(row, col)];
            }
        }

        let mut residual = vec![0.0; size];
        for row in 0..size {
            let mut r = n[row] + contribution.tx[(row, 0)];
            for col in 0..size {
                r += m[(row, col)] * x[col];
            }
            residual[row] = r;
        }

        let neg_residual: Vec<f64> = residual.iter().map(|&v| -v).collect();
        let sys = MnaSystem { a: j, b: to_column(&neg_residual) };
        let dx = sys.solve().map_err(|_| Error::SingularJacobian)?;

        if dx.iter().any(|v| !v.is_finite()) {
            return Err(Error::Overflow);
        }

        let td = get_td(circuit, config, iter, &dx);
        for i in 0..size {
            x[i] += td * dx[i];
        }

        let report = convergence::check(circuit, config, &x, &dx, &residual);
        last_residual = residual;
        last_dx = dx;

        if report.converged {
            log::debug!("newton: converged after {} iterations", iter + 1);
            return Ok(NewtonOutcome {
                x,
                residual: last_residual,
                last_dx,
                converged: true,
                iterations: iter + 1,
            });
        }
    }

    log::debug!("newton: did not converge within {} iterations", config.dc_max_nr_iter);
    Ok(NewtonOutcome {
        x,
        residual: last_residual,
        last_dx,
        converged: false,
        iterations: config.dc_max_nr_iter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nodal_circuit::elements::diode::Diode;
    use nodal_circuit::elements::resistor::Resistor;
    use nodal_circuit::elements::voltage_source::VoltageSource;

    #[test]
    fn linear_circuit_converges_in_one_iteration() {
        let mut b = Circuit::builder();
        let n1 = b.node("1");
        let n2 = b.node("2");
        b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 1.0)));
        b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
        b.add(Element::Resistor(Resistor::new("2", n2, GROUND, 1000.0)));
        let circuit = b.build().unwrap();

        let m = crate::assembler::assemble(&circuit).unwrap();
        let n_dc: Vec<f64> = (0..m.size()).map(|i| m.b[(i, 0)]).collect();
        let x0 = vec![0.0; m.size()];

        let outcome = solve(&circuit, &Configuration::default(), &m.a, &n_dc, &x0, 0.0).unwrap();
        assert_eq!(outcome.iterations, 1);
        assert_relative_eq!(outcome.x[0], 1.0, max_relative = 1e-9);
        assert_relative_eq!(outcome.x[1], 0.5, max_relative = 1e-9);
    }

    #[test]
    fn diode_clamp_converges_near_its_forward_voltage() {
        let mut b = Circuit::builder();
        let n1 = b.node("1");
        let n2 = b.node("2");
        b.add(Element::VoltageSource(VoltageSource::new("1", n1, GROUND, 2.0)));
        b.add(Element::Resistor(Resistor::new("1", n1, n2, 1000.0)));
        b.add(Element::Nonlinear(Box::new(Diode::new("1", n2, GROUND))));
        let circuit = b.build().unwrap();

        let m = crate::assembler::assemble(&circuit).unwrap();
        let n_dc: Vec<f64> = (0..m.size()).map(|i| m.b[(i, 0)]).collect();
        let x0 = vec![0.0; m.size()];

        let outcome = solve(&circuit, &Configuration::default(), &m.a, &n_dc, &x0, 0.0).unwrap();
        assert!(outcome.converged);
        assert_relative_eq!(outcome.x[1], 0.65, max_relative = 0.05);
    }
}
