use crate::error::Result;
use crate::types::{GraphEdge, GraphNode, RelationshipType};

/// Storage seam for the code graph.
///
/// Implementations keep nodes unique by `node_id` and edges unique by the
/// `(from, to, relationship)` triple. Traversal lives in
/// [`GraphTraversal`](crate::GraphTraversal) and works over any store.
pub trait GraphStore {
    /// Insert a node, replacing the stored one with the same id
    fn upsert_node(&mut self, node: GraphNode);

    /// Add an edge between two existing nodes.
    ///
    /// Returns `Ok(false)` when the identical edge is already present.
    fn add_edge(&mut self, from: &str, to: &str, relationship: RelationshipType) -> Result<bool>;

    fn node(&self, node_id: &str) -> Option<&GraphNode>;

    /// Outgoing edges in insertion order
    fn outgoing_edges(&self, node_id: &str) -> Vec<&GraphEdge>;

    /// Incoming edges in insertion order
    fn incoming_edges(&self, node_id: &str) -> Vec<&GraphEdge>;

    /// All nodes in insertion order
    fn nodes(&self) -> Box<dyn Iterator<Item = &GraphNode> + '_>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}
