use crate::elements::{
    capacitor::Capacitor,
    controlled_sources::{Evsource, Gisource, Hvsource},
    current_source::CurrentSource,
    inductor::Inductor,
    nonlinear::NonlinearElement,
    resistor::Resistor,
    voltage_source::VoltageSource,
};
use crate::node::NodeId;

/// Any device instance that can be included in a circuit.
///
/// Nonlinear devices are stored as a trait object: the MNA assembler and
/// Newton-Raphson kernel never need to know anything about a nonlinear
/// element beyond its [`NonlinearElement`] contract.
#[derive(Debug)]
pub enum Element {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    Gisource(Gisource),
    Evsource(Evsource),
    Hvsource(Hvsource),
    Nonlinear(Box<dyn NonlinearElement>),
}

macro_rules! dispatch_identifier {
    ($self:expr) => {
        match $self {
            Element::Resistor(e) => e.identifier(),
            Element::Capacitor(e) => e.identifier(),
            Element::Inductor(e) => e.identifier(),
            Element::VoltageSource(e) => e.identifier(),
            Element::CurrentSource(e) => e.identifier(),
            Element::Gisource(e) => e.identifier(),
            Element::Evsource(e) => e.identifier(),
            Element::Hvsource(e) => e.identifier(),
            Element::Nonlinear(e) => e.identifier(),
        }
    };
}

/// An element that has a unique string identifier such as `R1` or `D2`.
pub trait Identifiable {
    fn identifier(&self) -> String;
}

impl Identifiable for Element {
    fn identifier(&self) -> String {
        dispatch_identifier!(self)
    }
}

/// A device whose branch current is itself an MNA unknown: independent
/// and controlled voltage sources, and inductors. Each contributes one
/// extra row/column to the unreduced system.
pub trait VoltageDefined {
    fn is_voltage_defined(&self) -> bool;
}

impl VoltageDefined for Element {
    fn is_voltage_defined(&self) -> bool {
        matches!(
            self,
            Element::VoltageSource(_) | Element::Evsource(_) | Element::Hvsource(_) | Element::Inductor(_)
        )
    }
}

impl Element {
    /// All nodes this element's topology references, for ground-path and
    /// dangling-node validation. Includes controlled-source sense/drive
    /// ports: a node that is only ever a `Gisource`/`Evsource` sense
    /// terminal, or only ever a nonlinear device's drive port, is still a
    /// real reference and must not be flagged as dangling.
    pub fn nodes(&self) -> Vec<NodeId> {
        match self {
            Element::Resistor(e) => vec![e.plus, e.minus],
            Element::Capacitor(e) => vec![e.plus, e.minus],
            Element::Inductor(e) => vec![e.plus, e.minus],
            Element::VoltageSource(e) => vec![e.plus, e.minus],
            Element::CurrentSource(e) => vec![e.plus, e.minus],
            Element::Gisource(e) => vec![e.plus, e.minus, e.sense_plus, e.sense_minus],
            Element::Evsource(e) => vec![e.plus, e.minus, e.sense_plus, e.sense_minus],
            Element::Hvsource(e) => vec![e.plus, e.minus],
            Element::Nonlinear(e) => (0..e.output_ports().len())
                .flat_map(|k| e.drive_ports(k))
                .chain(e.output_ports())
                .flat_map(|(a, b)| [a, b])
                .collect(),
        }
    }

    pub fn is_nonlinear(&self) -> bool {
        matches!(self, Element::Nonlinear(_))
    }

    /// Value of this element's attached waveform at time `t`, if it has
    /// one. `None` for everything else, including a source with no
    /// waveform (its `dc_value` is already folded in at assembly time).
    pub fn time_varying_value(&self, t: f64) -> Option<f64> {
        match self {
            Element::VoltageSource(e) if e.waveform.is_some() => Some(e.value_at(t)),
            Element::CurrentSource(e) if e.waveform.is_some() => Some(e.value_at(t)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
