use crate::element::{Element, Identifiable, VoltageDefined};
use crate::error::Error;
use crate::node::{GROUND, NodeId};
use std::collections::{HashMap, HashSet};

/// A structured, already-resolved circuit: every element's terminals are
/// internal integer node ids, not text labels. Netlist parsing (turning a
/// text description into this structure) is an external concern; circuits
/// are built programmatically via [`Circuit::builder`].
#[derive(Debug)]
pub struct Circuit {
    elements: Vec<Element>,
    node_labels: Vec<String>,
    label_to_node: HashMap<String, NodeId>,
}

impl Circuit {
    pub fn builder() -> CircuitBuilder {
        CircuitBuilder::new()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Number of nodes including ground.
    pub fn num_nodes(&self) -> usize {
        self.node_labels.len()
    }

    pub fn node_label(&self, node: NodeId) -> &str {
        &self.node_labels[node]
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.label_to_node.get(label).copied()
    }

    pub fn num_voltage_defined(&self) -> usize {
        self.elements.iter().filter(|e| e.is_voltage_defined()).count()
    }

    /// Size of the reduced (ground row/column dropped) MNA system.
    pub fn reduced_size(&self) -> usize {
        (self.num_nodes() - 1) + self.num_voltage_defined()
    }

    /// Indices into `elements()` of every voltage-defined element, in the
    /// stable traversal order that determines branch-current unknown
    /// ordering. Position `p` in this list owns reduced-system row/column
    /// `(num_nodes() - 1) + p`.
    pub fn voltage_defined_order(&self) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_voltage_defined())
            .map(|(i, _)| i)
            .collect()
    }

    /// The voltage-defined element occupying branch-current row `p` of the
    /// reduced system (`p` as returned by `voltage_defined_order`).
    pub fn find_vde(&self, p: usize) -> Option<&Element> {
        self.voltage_defined_order().get(p).map(|&i| &self.elements[i])
    }

    pub fn is_nonlinear(&self) -> bool {
        self.elements.iter().any(Element::is_nonlinear)
    }

    /// Drive-port node pairs of every nonlinear element, used by the
    /// damping policy's locked-node guard.
    pub fn locked_nodes(&self) -> Vec<(NodeId, NodeId)> {
        let mut pairs = Vec::new();
        for element in &self.elements {
            if let Element::Nonlinear(nl) = element {
                for k in 0..nl.output_ports().len() {
                    pairs.extend(nl.drive_ports(k));
                }
            }
        }
        pairs
    }

    pub fn has_duplicate_elem(&self) -> Option<String> {
        let mut seen = HashSet::new();
        for element in &self.elements {
            let id = element.identifier();
            if !seen.insert(id.clone()) {
                return Some(id);
            }
        }
        None
    }

    /// Nodes other than ground that no element references. Unlike
    /// [`Circuit::check_ground_paths`] this is a hard precondition, checked
    /// once at build time.
    pub fn dangling_nodes(&self) -> Vec<NodeId> {
        let mut referenced = HashSet::new();
        for element in &self.elements {
            referenced.extend(element.nodes());
        }
        (1..self.num_nodes())
            .filter(|n| !referenced.contains(n))
            .collect()
    }

    /// Warning-only ground-path diagnostic: a non-reference node passes if
    /// it appears in a resistive/conductive stamp, a voltage-defined KVL
    /// row, or as an output port of a nonlinear device. Returns the labels
    /// of nodes that fail; callers log these as warnings and proceed
    /// (Gmin keeps the system solvable regardless).
    pub fn check_ground_paths(&self) -> Vec<String> {
        let mut has_path = vec![false; self.num_nodes()];
        for element in &self.elements {
            match element {
                Element::Resistor(r) => {
                    has_path[r.plus] = true;
                    has_path[r.minus] = true;
                }
                Element::Nonlinear(nl) => {
                    for (p, m) in nl.output_ports() {
                        has_path[p] = true;
                        has_path[m] = true;
                    }
                }
                _ if element.is_voltage_defined() => {
                    for n in element.nodes() {
                        has_path[n] = true;
                    }
                }
                _ => {}
            }
        }
        (1..self.num_nodes())
            .filter(|&n| !has_path[n])
            .map(|n| self.node_labels[n].clone())
            .collect()
    }
}

/// Incrementally builds a [`Circuit`], interning node labels into
/// contiguous integer ids as elements are added.
pub struct CircuitBuilder {
    elements: Vec<Element>,
    node_labels: Vec<String>,
    label_to_node: HashMap<String, NodeId>,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        let mut label_to_node = HashMap::new();
        label_to_node.insert("0".to_string(), GROUND);
        CircuitBuilder {
            elements: Vec::new(),
            node_labels: vec!["0".to_string()],
            label_to_node,
        }
    }

    /// Interns `label`, returning its node id (assigning a fresh one on
    /// first use). `"0"` always resolves to [`GROUND`].
    pub fn node(&mut self, label: impl Into<String>) -> NodeId {
        let label = label.into();
        if let Some(&id) = self.label_to_node.get(&label) {
            return id;
        }
        let id = self.node_labels.len();
        self.node_labels.push(label.clone());
        self.label_to_node.insert(label, id);
        id
    }

    pub fn add(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn build(self) -> Result<Circuit, Error> {
        let circuit = Circuit {
            elements: self.elements,
            node_labels: self.node_labels,
            label_to_node: self.label_to_node,
        };

        if let Some(id) = circuit.has_duplicate_elem() {
            return Err(Error::DuplicateElement(id));
        }
        if let Some(&n) = circuit.dangling_nodes().first() {
            return Err(Error::DanglingNode(circuit.node_labels[n].clone()));
        }

        Ok(circuit)
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
