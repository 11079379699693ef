use crate::node::NodeId;
use crate::waveform::Pulse;

/// An independent current source. Not voltage-defined.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    pub name: String,
    pub plus: NodeId,
    pub minus: NodeId,
    pub dc_value: f64,
    pub waveform: Option<Pulse>,
}

impl CurrentSource {
    pub fn new(name: impl Into<String>, plus: NodeId, minus: NodeId, dc_value: f64) -> Self {
        CurrentSource {
            name: name.into(),
            plus,
            minus,
            dc_value,
            waveform: None,
        }
    }

    pub fn identifier(&self) -> String {
        format!("I{}", self.name)
    }

    pub fn value_at(&self, t: f64) -> f64 {
        match &self.waveform {
            Some(w) => w.value_at(t),
            None => self.dc_value,
        }
    }
}
