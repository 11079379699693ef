pub use crate::config::Configuration;
pub use crate::error::Error;
pub type Result<T> = core::result::Result<T, Error>;

pub use nodal_circuit::prelude::{Circuit, Element, GROUND, HashMap, Identifiable, NodeId, VoltageDefined};
pub use nodal_matrix::MnaSystem;
