/// Internal node identifier used throughout assembly and solving.
///
/// Node numbering is contiguous starting at [`GROUND`]; the mapping between
/// an internal id and the netlist-facing label it came from lives on
/// [`crate::circuit::Circuit`], not on the id itself.
pub type NodeId = usize;

/// The reference node. Its row and column are always dropped from the
/// reduced MNA system.
pub const GROUND: NodeId = 0;
