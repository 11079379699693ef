//! Device Contribution Engine (`build_J_and_Tx` / `update_J_and_Tx`).
//!
//! Given the current reduced solution vector, queries every nonlinear
//! device for its port currents and conductances and stamps them into a
//! Jacobian update `delta_j` and right-hand-side contribution `tx`. Run
//! fresh each Newton-Raphson iteration.
use crate::assembler::node_row;
use crate::prelude::*;
use faer::Mat;

pub struct Contribution {
    pub delta_j: Mat<f64>,
    pub tx: Mat<f64>,
}

/// Builds `(delta_j, tx)` for `circuit`'s nonlinear elements at solution
/// `x` and time `t`. `x` and the returned matrices are all sized to the
/// reduced system.
pub fn build(circuit: &Circuit, x: &[f64], t: f64) -> Contribution {
    let size = x.len();
    let mut delta_j = Mat::zeros(size, size);
    let mut tx = Mat::zeros(size, 1);

    let v_at = |n: NodeId| node_row(circuit, n).map_or(0.0, |r| x[r]);

    for element in circuit.elements() {
        let Element::Nonlinear(nl) = element else { continue };

        for (k, (n1, n2)) in nl.output_ports().into_iter().enumerate() {
            let drives = nl.drive_ports(k);
            let v_drive: Vec<f64> = drives.iter().map(|&(p, m)| v_at(p) - v_at(m)).collect();
            let i_k = nl.i(k, &v_drive, t);

            if let Some(r1) = node_row(circuit, n1) {
                tx[(r1, 0)] += i_k;
            }
            if let Some(r2) = node_row(circuit, n2) {
                tx[(r2, 0)] -= i_k;
            }

            for (j, &(p, m)) in drives.iter().enumerate() {
                let g_kj = nl.g(k, &v_drive, j, t);
                let rp = node_row(circuit, p);
                let rm = node_row(circuit, m);
                let r1 = node_row(circuit, n1);
                let r2 = node_row(circuit, n2);

                if let (Some(r1), Some(rp)) = (r1, rp) {
                    delta_j[(r1, rp)] += g_kj;
                }
                if let (Some(r1), Some(rm)) = (r1, rm) {
                    delta_j[(r1, rm)] -= g_kj;
                }
                if let (Some(r2), Some(rp)) = (r2, rp) {
                    delta_j[(r2, rp)] -= g_kj;
                }
                if let (Some(r2), Some(rm)) = (r2, rm) {
                    delta_j[(r2, rm)] += g_kj;
                }
            }
        }
    }

    Contribution { delta_j, tx }
}
