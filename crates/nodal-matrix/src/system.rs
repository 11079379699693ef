use crate::error::Error;
use faer::Mat;
use faer::prelude::*;
use std::fmt;

/// A dense `a * x = b` system sized for the reduced MNA matrix.
///
/// The spec this solver implements is explicit that a dense representation
/// is sufficient at the circuit sizes in scope, so this wraps `faer`'s
/// dense `Mat` rather than its sparse column format.
pub struct MnaSystem {
    pub a: Mat<f64>,
    pub b: Mat<f64>,
}

impl MnaSystem {
    pub fn zeros(size: usize) -> Self {
        MnaSystem {
            a: Mat::zeros(size, size),
            b: Mat::zeros(size, 1),
        }
    }

    pub fn size(&self) -> usize {
        self.b.nrows()
    }

    /// Solves via partial-pivot LU, returning the solution column vector.
    ///
    /// `faer`'s dense LU never errors outright on a singular matrix; a
    /// singular system instead surfaces as a non-finite entry in the
    /// solution, which is what we check for here.
    pub fn solve(&self) -> Result<Vec<f64>, Error> {
        let lu = self.a.partial_piv_lu();
        let x = lu.solve(&self.b);

        let solution: Vec<f64> = (0..x.nrows()).map(|i| x[(i, 0)]).collect();
        if solution.iter().any(|v| !v.is_finite()) {
            return Err(Error::Singular);
        }
        Ok(solution)
    }
}

impl fmt::Display for MnaSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size();
        for row in 0..n {
            for col in 0..n {
                write!(f, "{:10.4} ", self.a[(row, col)])?;
            }
            writeln!(f, "| {:10.4}", self.b[(row, 0)])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_simple_diagonal_system() {
        let mut sys = MnaSystem::zeros(2);
        sys.a[(0, 0)] = 2.0;
        sys.a[(1, 1)] = 4.0;
        sys.b[(0, 0)] = 4.0;
        sys.b[(1, 0)] = 8.0;

        let x = sys.solve().unwrap();
        assert_eq!(x, vec![2.0, 2.0]);
    }

    #[test]
    fn flags_a_singular_system() {
        let sys = MnaSystem::zeros(2);
        assert!(sys.solve().is_err());
    }
}
