pub use crate::error::Error;
pub type Result<T> = core::result::Result<T, Error>;

pub use crate::circuit::Circuit;
pub use crate::element::{Element, Identifiable, VoltageDefined};
pub use crate::elements::nonlinear::NonlinearElement;
pub use crate::node::{GROUND, NodeId};
pub use std::collections::HashMap;
