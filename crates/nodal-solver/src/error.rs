use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A circuit-model/topology problem surfaced while assembling the MNA
    /// system (e.g. an `Hvsource`, which has no stamping rule).
    #[error(transparent)]
    Circuit(#[from] nodal_circuit::Error),

    /// The Jacobian was singular at some Newton-Raphson iteration.
    #[error("jacobian is singular")]
    SingularJacobian,

    /// A Newton-Raphson step produced a non-finite value.
    #[error("numeric overflow during Newton-Raphson iteration")]
    Overflow,

    /// No configured convergence-aid strategy produced a solution within
    /// its iteration budget.
    #[error("maximum iterations ({0}) exceeded without convergence")]
    MaxIterationsExceeded(usize),

    /// `dc_analysis` was asked to sweep with `(stop - start) * step <= 0`.
    #[error("sweep bounds imply an unbounded or zero-length number of steps")]
    UnboundedStepping,

    /// A sweep type string from an external caller did not map to a known
    /// [`crate::dc_sweep::SweepType`]. Never raised internally: the enum
    /// is closed here, so this exists for callers translating an external
    /// (e.g. netlist) representation.
    #[error("unknown sweep type: {0}")]
    UnknownSweepType(String),

    /// The element named as the swept source in a DC sweep does not exist,
    /// or is not a voltage/current source.
    #[error("source element '{0}' not found or not sweepable")]
    MissingSource(String),
}
