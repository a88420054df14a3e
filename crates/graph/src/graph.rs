use crate::error::{GraphError, Result};
use crate::store::GraphStore;
use crate::types::{GraphEdge, GraphNode, RelationshipType};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction as PetDirection;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio::fs;

/// In-memory code graph backed by petgraph
#[derive(Debug, Default)]
pub struct CodeGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    index: HashMap<String, NodeIndex>,
    edge_keys: HashSet<(NodeIndex, NodeIndex, RelationshipType)>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn edges_directed(&self, node_id: &str, direction: PetDirection) -> Vec<&GraphEdge> {
        let Some(&idx) = self.index.get(node_id) else {
            return Vec::new();
        };

        // petgraph yields adjacency lists newest-first
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|edge| edge.id());
        edges.into_iter().map(|edge| edge.weight()).collect()
    }

    /// Write the graph as pretty JSON, creating parent directories
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let snapshot = GraphSnapshot::from_graph(self);
        let data = serde_json::to_vec_pretty(&snapshot)?;
        fs::write(path, data).await?;

        log::info!(
            "Saved graph with {} nodes and {} edges to {}",
            self.node_count(),
            self.edge_count(),
            path.display()
        );
        Ok(())
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).await?;
        let snapshot: GraphSnapshot = serde_json::from_slice(&data)?;
        let graph = snapshot.into_graph()?;

        log::info!(
            "Loaded graph with {} nodes and {} edges from {}",
            graph.node_count(),
            graph.edge_count(),
            path.display()
        );
        Ok(graph)
    }
}

impl GraphStore for CodeGraph {
    fn upsert_node(&mut self, node: GraphNode) {
        match self.index.get(&node.node_id) {
            Some(&idx) => self.graph[idx] = node,
            None => {
                let id = node.node_id.clone();
                let idx = self.graph.add_node(node);
                self.index.insert(id, idx);
            }
        }
    }

    fn add_edge(&mut self, from: &str, to: &str, relationship: RelationshipType) -> Result<bool> {
        let from_idx = *self
            .index
            .get(from)
            .ok_or_else(|| GraphError::NodeNotFound(from.to_string()))?;
        let to_idx = *self
            .index
            .get(to)
            .ok_or_else(|| GraphError::NodeNotFound(to.to_string()))?;

        if !self.edge_keys.insert((from_idx, to_idx, relationship)) {
            return Ok(false);
        }

        self.graph
            .add_edge(from_idx, to_idx, GraphEdge::new(from, to, relationship));
        Ok(true)
    }

    fn node(&self, node_id: &str) -> Option<&GraphNode> {
        self.index.get(node_id).map(|&idx| &self.graph[idx])
    }

    fn outgoing_edges(&self, node_id: &str) -> Vec<&GraphEdge> {
        self.edges_directed(node_id, PetDirection::Outgoing)
    }

    fn incoming_edges(&self, node_id: &str) -> Vec<&GraphEdge> {
        self.edges_directed(node_id, PetDirection::Incoming)
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &GraphNode> + '_> {
        Box::new(self.graph.node_indices().map(move |idx| &self.graph[idx]))
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[derive(Serialize, Deserialize)]
struct GraphSnapshot {
    nodes: Vec<GraphNode>,
    edges: Vec<SnapshotEdge>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEdge {
    from: usize,
    to: usize,
    relationship: RelationshipType,
}

impl GraphSnapshot {
    fn from_graph(graph: &CodeGraph) -> Self {
        let nodes = graph
            .graph
            .node_indices()
            .map(|idx| graph.graph[idx].clone())
            .collect();
        let edges = graph
            .graph
            .edge_references()
            .map(|edge| SnapshotEdge {
                from: edge.source().index(),
                to: edge.target().index(),
                relationship: edge.weight().relationship,
            })
            .collect();

        Self { nodes, edges }
    }

    fn into_graph(self) -> Result<CodeGraph> {
        let ids: Vec<String> = self.nodes.iter().map(|node| node.node_id.clone()).collect();

        let mut graph = CodeGraph::new();
        for node in self.nodes {
            graph.upsert_node(node);
        }

        for edge in self.edges {
            let (Some(from), Some(to)) = (ids.get(edge.from), ids.get(edge.to)) else {
                return Err(GraphError::Other(format!(
                    "graph snapshot edge {} -> {} points past {} nodes",
                    edge.from,
                    edge.to,
                    ids.len()
                )));
            };
            graph.add_edge(from, to, edge.relationship)?;
        }

        Ok(graph)
    }
}
