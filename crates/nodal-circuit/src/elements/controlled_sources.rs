use crate::node::NodeId;

/// Linear voltage-controlled current source: `i(n1 -> n2) = alpha * (v(sn1) - v(sn2))`.
/// Not voltage-defined.
#[derive(Debug, Clone)]
pub struct Gisource {
    pub name: String,
    pub plus: NodeId,
    pub minus: NodeId,
    pub sense_plus: NodeId,
    pub sense_minus: NodeId,
    pub gain: f64,
}

impl Gisource {
    pub fn identifier(&self) -> String {
        format!("G{}", self.name)
    }
}

/// Linear voltage-controlled voltage source: `v(n1) - v(n2) = alpha * (v(sn1) - v(sn2))`.
/// Voltage-defined.
#[derive(Debug, Clone)]
pub struct Evsource {
    pub name: String,
    pub plus: NodeId,
    pub minus: NodeId,
    pub sense_plus: NodeId,
    pub sense_minus: NodeId,
    pub gain: f64,
}

impl Evsource {
    pub fn identifier(&self) -> String {
        format!("E{}", self.name)
    }
}

/// Current-controlled voltage source. Declared for netlist completeness;
/// no stamping rule is implemented. Constructing one and handing it to the
/// assembler always fails with `Error::UnsupportedElement`, per the
/// reference implementation this was modeled on, which leaves the same gap.
#[derive(Debug, Clone)]
pub struct Hvsource {
    pub name: String,
    pub plus: NodeId,
    pub minus: NodeId,
    pub control_element: String,
    pub gain: f64,
}

impl Hvsource {
    pub fn identifier(&self) -> String {
        format!("H{}", self.name)
    }
}
