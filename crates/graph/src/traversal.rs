use crate::store::GraphStore;
use crate::types::{Direction, GraphEdge, GraphNode, RelationshipType, TraversalKind};
use std::collections::{HashSet, VecDeque};

/// Queries and traversals available on every [`GraphStore`].
///
/// An empty `relationships` slice follows every edge; otherwise only edges
/// whose relationship is listed are followed. Filtering happens per edge, not
/// per node.
pub trait GraphTraversal: GraphStore {
    /// Node with the given name; ties break on the smallest node id
    fn find_by_name(&self, name: &str) -> Option<&GraphNode> {
        self.nodes()
            .filter(|node| node.name == name)
            .min_by(|a, b| a.node_id.cmp(&b.node_id))
    }

    /// Direct neighbors of a node, each listed once
    fn neighbors(
        &self,
        node_id: &str,
        relationship: Option<RelationshipType>,
        direction: Direction,
    ) -> Vec<&GraphNode> {
        let wanted = |edge: &GraphEdge| relationship.map_or(true, |r| edge.relationship == r);

        let mut ids: Vec<&str> = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            ids.extend(
                self.outgoing_edges(node_id)
                    .into_iter()
                    .filter(|edge| wanted(*edge))
                    .map(|edge| edge.to.as_str()),
            );
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            ids.extend(
                self.incoming_edges(node_id)
                    .into_iter()
                    .filter(|edge| wanted(*edge))
                    .map(|edge| edge.from.as_str()),
            );
        }

        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.node(id))
            .collect()
    }

    /// Breadth-first walk over outgoing edges, start node first.
    ///
    /// Nodes deeper than `max_depth` hops are not visited; an unknown start
    /// yields an empty list.
    fn traverse_bfs(
        &self,
        start: &str,
        max_depth: usize,
        relationships: &[RelationshipType],
    ) -> Vec<&GraphNode> {
        let Some(root) = self.node(start) else {
            return Vec::new();
        };

        let mut visited: HashSet<&str> = HashSet::from([root.node_id.as_str()]);
        let mut queue = VecDeque::from([(root, 0usize)]);
        let mut order = Vec::new();

        while let Some((node, depth)) = queue.pop_front() {
            order.push(node);
            if depth >= max_depth {
                continue;
            }

            for edge in self.outgoing_edges(&node.node_id) {
                if !follows(edge, relationships) || visited.contains(edge.to.as_str()) {
                    continue;
                }
                if let Some(next) = self.node(&edge.to) {
                    visited.insert(next.node_id.as_str());
                    queue.push_back((next, depth + 1));
                }
            }
        }

        order
    }

    /// Pre-order depth-first walk over outgoing edges in insertion order
    fn traverse_dfs(
        &self,
        start: &str,
        max_depth: usize,
        relationships: &[RelationshipType],
    ) -> Vec<&GraphNode> {
        let Some(root) = self.node(start) else {
            return Vec::new();
        };

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![(root, 0usize)];
        let mut order = Vec::new();

        while let Some((node, depth)) = stack.pop() {
            if !visited.insert(node.node_id.as_str()) {
                continue;
            }
            order.push(node);
            if depth >= max_depth {
                continue;
            }

            let children: Vec<_> = self
                .outgoing_edges(&node.node_id)
                .into_iter()
                .filter(|edge| follows(edge, relationships) && !visited.contains(edge.to.as_str()))
                .filter_map(|edge| self.node(&edge.to))
                .collect();
            // reversed so the first edge is popped first
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }

        order
    }

    fn traverse(
        &self,
        kind: TraversalKind,
        start: &str,
        max_depth: usize,
        relationships: &[RelationshipType],
    ) -> Vec<&GraphNode> {
        match kind {
            TraversalKind::Bfs => self.traverse_bfs(start, max_depth, relationships),
            TraversalKind::Dfs => self.traverse_dfs(start, max_depth, relationships),
        }
    }
}

impl<G: GraphStore + ?Sized> GraphTraversal for G {}

fn follows(edge: &GraphEdge, relationships: &[RelationshipType]) -> bool {
    relationships.is_empty() || relationships.contains(&edge.relationship)
}
