//! Circuit Connectivity Graph
//!
//! Builds an undirected petgraph view of a [`CircuitConfiguration`] so the
//! compatibility check can spot wiring mistakes:
//! - Components with no connection at all
//! - Connections naming a component that does not exist
//! - Missing power or ground reference

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::circuit::{CircuitComponent, CircuitConfiguration, Connection};

/// Graph of circuit components (nodes) and wires (edges).
#[derive(Debug, Clone)]
pub struct CircuitGraph<'a> {
    graph: UnGraph<&'a CircuitComponent, &'a Connection>,

    /// Index mapping: component name -> node index
    component_indices: HashMap<&'a str, NodeIndex>,

    /// Connections whose endpoints could not both be resolved
    dangling: Vec<&'a Connection>,

    has_power: bool,
    has_ground: bool,
}

impl<'a> CircuitGraph<'a> {
    pub fn build(circuit: &'a CircuitConfiguration) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut component_indices = HashMap::new();

        for component in &circuit.components {
            let idx = graph.add_node(component);
            component_indices.insert(component.name.as_str(), idx);
        }

        let mut dangling = Vec::new();
        for conn in &circuit.connections {
            let from = component_indices.get(conn.from_component.as_str());
            let to = component_indices.get(conn.to_component.as_str());
            match (from, to) {
                (Some(&a), Some(&b)) => {
                    graph.add_edge(a, b, conn);
                }
                _ => dangling.push(conn),
            }
        }

        Self {
            graph,
            component_indices,
            dangling,
            has_power: circuit.connections.iter().any(Connection::is_power),
            has_ground: circuit.connections.iter().any(Connection::is_ground),
        }
    }

    pub fn get_component(&self, name: &str) -> Option<&'a CircuitComponent> {
        self.component_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
            .copied()
    }

    /// Components that no resolved connection touches.
    pub fn floating_components(&self) -> Vec<&'a CircuitComponent> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors(idx).next().is_none())
            .filter_map(|idx| self.graph.node_weight(idx).copied())
            .collect()
    }

    /// Connections with at least one endpoint missing from the component list.
    pub fn dangling_connections(&self) -> &[&'a Connection] {
        &self.dangling
    }

    /// Names of the components wired directly to `name`.
    pub fn neighbors(&self, name: &str) -> Vec<&'a str> {
        let Some(&idx) = self.component_indices.get(name) else {
            return Vec::new();
        };

        self.graph
            .neighbors(idx)
            .filter_map(|n| self.graph.node_weight(n).copied())
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn has_power_reference(&self) -> bool {
        self.has_power
    }

    pub fn has_ground_reference(&self) -> bool {
        self.has_ground
    }

    /// Number of electrically separate islands, floating parts included.
    pub fn connected_groups(&self) -> usize {
        connected_components(&self.graph)
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats {
            component_count: self.graph.node_count(),
            connection_count: self.graph.edge_count(),
            dangling_connection_count: self.dangling.len(),
            floating_component_count: self.floating_components().len(),
            connected_groups: self.connected_groups(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStats {
    pub component_count: usize,
    pub connection_count: usize,
    pub dangling_connection_count: usize,
    pub floating_component_count: usize,
    pub connected_groups: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_circuit() -> CircuitConfiguration {
        let mut circuit = CircuitConfiguration::new("Test Circuit");
        circuit.components = vec![
            CircuitComponent::new("BAT", "Battery"),
            CircuitComponent::new("U1", "IC"),
            CircuitComponent::new("M1", "MotorDriver"),
            CircuitComponent::new("LED1", "LED"),
        ];
        circuit.connections = vec![
            Connection::new("BAT", "U1", "Power"),
            Connection::new("U1", "BAT", "Ground"),
            Connection::new("U1", "M1", "Digital"),
            Connection::new("U1", "R9", "Digital"),
        ];
        circuit
    }

    #[test]
    fn test_floating_components() {
        let circuit = create_test_circuit();
        let graph = CircuitGraph::build(&circuit);

        let floating: Vec<&str> = graph.floating_components().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(floating, vec!["LED1"]);
    }

    #[test]
    fn test_dangling_connections() {
        let circuit = create_test_circuit();
        let graph = CircuitGraph::build(&circuit);

        let dangling = graph.dangling_connections();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].to_component, "R9");
    }

    #[test]
    fn test_neighbors() {
        let circuit = create_test_circuit();
        let graph = CircuitGraph::build(&circuit);

        let mut neighbors = graph.neighbors("U1");
        neighbors.sort();
        neighbors.dedup();
        assert_eq!(neighbors, vec!["BAT", "M1"]);
        assert!(graph.neighbors("nope").is_empty());
    }

    #[test]
    fn test_references_and_stats() {
        let circuit = create_test_circuit();
        let graph = CircuitGraph::build(&circuit);

        assert!(graph.has_power_reference());
        assert!(graph.has_ground_reference());

        let stats = graph.stats();
        assert_eq!(stats.component_count, 4);
        assert_eq!(stats.connection_count, 3);
        assert_eq!(stats.dangling_connection_count, 1);
        assert_eq!(stats.floating_component_count, 1);
        // {BAT, U1, M1} and {LED1}
        assert_eq!(stats.connected_groups, 2);
    }

    #[test]
    fn test_empty_circuit() {
        let circuit = CircuitConfiguration::default();
        let graph = CircuitGraph::build(&circuit);

        assert!(graph.floating_components().is_empty());
        assert!(!graph.has_power_reference());
        assert_eq!(graph.connected_groups(), 0);
    }
}
