use crate::node::NodeId;
use crate::waveform::Pulse;

/// An independent voltage source. Voltage-defined: always carries a
/// branch-current unknown.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub name: String,
    pub plus: NodeId,
    pub minus: NodeId,
    /// The time-invariant component of the source value.
    pub dc_value: f64,
    /// Optional time-dependent component, folded into N at a fixed time
    /// point by the caller; `None` for a pure DC source.
    pub waveform: Option<Pulse>,
}

impl VoltageSource {
    pub fn new(name: impl Into<String>, plus: NodeId, minus: NodeId, dc_value: f64) -> Self {
        VoltageSource {
            name: name.into(),
            plus,
            minus,
            dc_value,
            waveform: None,
        }
    }

    pub fn identifier(&self) -> String {
        format!("V{}", self.name)
    }

    /// Value of this source at time `t`: the DC value unless a waveform
    /// is attached, in which case the waveform takes over entirely (it is
    /// responsible for reproducing `dc_value` before its own delay).
    pub fn value_at(&self, t: f64) -> f64 {
        match &self.waveform {
            Some(w) => w.value_at(t),
            None => self.dc_value,
        }
    }
}
