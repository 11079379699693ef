use crate::node::NodeId;

/// A linear resistor. Not voltage-defined: contributes only a conductance
/// stamp, never a branch-current unknown.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub plus: NodeId,
    pub minus: NodeId,
    /// Resistance in ohms. Always positive.
    pub resistance: f64,
}

impl Resistor {
    pub fn new(name: impl Into<String>, plus: NodeId, minus: NodeId, resistance: f64) -> Self {
        Resistor {
            name: name.into(),
            plus,
            minus,
            resistance,
        }
    }

    pub fn identifier(&self) -> String {
        format!("R{}", self.name)
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }
}
