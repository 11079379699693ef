use crate::node::NodeId;

/// A linear capacitor. Contributes nothing to the DC system except via
/// an optional initial condition on its plus-minus voltage.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub name: String,
    pub plus: NodeId,
    pub minus: NodeId,
    pub capacitance: f64,
    /// Initial voltage across the capacitor, if fixed by the caller.
    pub ic: Option<f64>,
}

impl Capacitor {
    pub fn new(name: impl Into<String>, plus: NodeId, minus: NodeId, capacitance: f64) -> Self {
        Capacitor {
            name: name.into(),
            plus,
            minus,
            capacitance,
            ic: None,
        }
    }

    pub fn identifier(&self) -> String {
        format!("C{}", self.name)
    }
}
