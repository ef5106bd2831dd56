//! Node/edge graph emitted for the renderer.

use langeval_config::LayoutConfig;
use langeval_core::{Observation, ObservationType};
use serde::{Deserialize, Serialize};

use crate::derive;
use crate::layout::{assign_positions, Position};
use crate::tree::TraceForest;

/// Display payload carried by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    /// Lowercased type tag (`"span"` when absent).
    #[serde(rename = "type")]
    pub kind: String,
    /// Seconds.
    pub duration: f64,
    pub cost: f64,
    pub original: Observation,
}

impl NodeData {
    pub fn observation_type(&self) -> ObservationType {
        ObservationType::parse(Some(&self.kind))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("e-{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Laid-out trace: nodes in start-time order, one edge per attached child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TraceGraph {
    pub fn build(observations: &[Observation], config: &LayoutConfig) -> Self {
        let forest = TraceForest::build(observations);
        let positions = assign_positions(&forest, config);

        let mut nodes = Vec::with_capacity(forest.len());
        let mut edges = Vec::with_capacity(forest.len().saturating_sub(forest.roots().len()));

        for (tree_node, position) in forest.nodes().iter().zip(positions) {
            let obs = tree_node.observation;
            if let Some(p) = tree_node.parent {
                edges.push(GraphEdge::new(&forest.node(p).observation.id, &obs.id));
            }
            nodes.push(GraphNode {
                id: obs.id.clone(),
                position,
                data: NodeData {
                    label: obs.label(),
                    kind: obs.type_label(),
                    duration: derive::duration_seconds(obs),
                    cost: derive::cost(obs),
                    original: obs.clone(),
                },
            });
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            roots = forest.roots().len(),
            "Built trace graph"
        );

        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lays out `observations` with the given spacing.
pub fn build_graph(observations: &[Observation], config: &LayoutConfig) -> TraceGraph {
    TraceGraph::build(observations, config)
}
