//! Electrical net extraction.
//!
//! Each wire is an edge between two nodes. Component pins are their own
//! nodes; breadboard holes collapse onto the strip or rail they belong to,
//! so two parts plugged into the same strip share a net without a wire
//! between them.

use std::collections::HashMap;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::document::{Endpoint, ShdfDocument};
use crate::mapping::breadboard::{BreadboardAddress, BreadboardNode};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NetNode {
    Pin(String),
    Breadboard(BreadboardNode),
    /// Unparseable breadboard text, kept as an isolated node
    Unknown(String),
}

impl NetNode {
    fn from_endpoint(endpoint: &str) -> Self {
        match Endpoint::parse(endpoint) {
            Endpoint::Breadboard(_) => match BreadboardAddress::parse_neutral(endpoint) {
                Ok(address) => NetNode::Breadboard(address.node()),
                Err(_) => NetNode::Unknown(endpoint.to_string()),
            },
            Endpoint::Pin { component, pin } => NetNode::Pin(format!("{}.{}", component, pin.to_lowercase())),
            Endpoint::Malformed(text) => NetNode::Unknown(text.to_string()),
        }
    }
}

fn pin_name(endpoint: &str) -> &str {
    endpoint.split_once('.').map(|(_, pin)| pin).unwrap_or(endpoint)
}

fn is_ground_pin(pin: &str) -> bool {
    pin.starts_with("gnd") || pin == "ground" || pin == "vss"
}

fn is_supply_pin(pin: &str) -> bool {
    matches!(pin, "5v" | "3.3v" | "33v" | "3v3" | "vin" | "vcc" | "vdd" | "v+")
}

/// One electrically connected group of endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// Component pin endpoints, sorted
    pub pins: Vec<String>,
    /// Breadboard strips and rails the net runs through, sorted
    pub breadboard_nodes: Vec<String>,
    pub has_ground: bool,
    pub has_supply: bool,
}

impl Net {
    /// Ground and supply on the same net.
    pub fn is_short(&self) -> bool {
        self.has_ground && self.has_supply
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetReport {
    pub net_count: usize,
    pub nets: Vec<Net>,
    pub shorted_nets: usize,
    pub shorted_net_list: Vec<Net>,
}

/// Undirected connectivity graph of a document's wiring.
pub struct Netlist {
    graph: UnGraph<NetNode, usize>,
    indices: HashMap<NetNode, NodeIndex>,
}

impl Netlist {
    pub fn from_document(document: &ShdfDocument) -> Self {
        let mut netlist = Self {
            graph: UnGraph::new_undirected(),
            indices: HashMap::new(),
        };
        for (index, connection) in document.connections.iter().enumerate() {
            let a = netlist.node(NetNode::from_endpoint(&connection.from));
            let b = netlist.node(NetNode::from_endpoint(&connection.to));
            netlist.graph.add_edge(a, b, index);
        }
        netlist
    }

    fn node(&mut self, node: NetNode) -> NodeIndex {
        if let Some(&idx) = self.indices.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.indices.insert(node, idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Connected groups, ordered by their first pin (or breadboard node).
    pub fn nets(&self) -> Vec<Net> {
        let mut nets: Vec<Net> = kosaraju_scc(&self.graph)
            .into_iter()
            .map(|members| {
                let mut pins = Vec::new();
                let mut breadboard_nodes = Vec::new();
                for idx in members {
                    match &self.graph[idx] {
                        NetNode::Pin(endpoint) => pins.push(endpoint.clone()),
                        NetNode::Breadboard(node) => breadboard_nodes.push(node.to_string()),
                        NetNode::Unknown(text) => breadboard_nodes.push(text.clone()),
                    }
                }
                pins.sort();
                breadboard_nodes.sort();
                Net {
                    has_ground: pins.iter().any(|p| is_ground_pin(pin_name(p))),
                    has_supply: pins.iter().any(|p| is_supply_pin(pin_name(p))),
                    pins,
                    breadboard_nodes,
                }
            })
            .collect();
        nets.sort_by(|a, b| (&a.pins, &a.breadboard_nodes).cmp(&(&b.pins, &b.breadboard_nodes)));
        nets
    }
}

/// Group a document's endpoints into nets and flag ground/supply shorts.
pub fn check_electrical_nets(document: &ShdfDocument) -> NetReport {
    let nets = Netlist::from_document(document).nets();
    let shorted_net_list: Vec<Net> = nets.iter().filter(|n| n.is_short()).cloned().collect();
    NetReport {
        net_count: nets.len(),
        shorted_nets: shorted_net_list.len(),
        shorted_net_list,
        nets,
    }
}
