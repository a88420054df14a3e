//! # Code Graph
//!
//! Class, method and call relationships extracted from analyzed source files.
//!
//! ## Architecture
//!
//! ```text
//! FileAnalysis
//!     │
//!     ├──> GraphBuilder
//!     │      ├─ class nodes   "file:Class"
//!     │      ├─ method nodes  "file:Class:method"
//!     │      └─ edges         contains, calls (stub callees)
//!     │
//!     ├──> GraphStore (CodeGraph on petgraph)
//!     │      └─ unique nodes by id, unique edges by triple
//!     │
//!     └──> GraphTraversal
//!            ├─ find_by_name, neighbors
//!            └─ BFS / DFS with depth and relationship filters
//! ```
//!
//! ```
//! use semigraph_graph::{CodeGraph, GraphNode, GraphStore, GraphTraversal, NodeType, RelationshipType};
//!
//! let mut graph = CodeGraph::new();
//! graph.upsert_node(GraphNode::new("A.java:A", NodeType::Class, "A", "A.java"));
//! graph.upsert_node(GraphNode::new("A.java:A:run", NodeType::Method, "run", "A.java"));
//! graph.add_edge("A.java:A", "A.java:A:run", RelationshipType::Contains).unwrap();
//!
//! let names: Vec<_> = graph
//!     .traverse_bfs("A.java:A", 10, &[])
//!     .iter()
//!     .map(|node| node.name.as_str())
//!     .collect();
//! assert_eq!(names, ["A", "run"]);
//! ```

mod builder;
mod error;
mod graph;
mod store;
mod traversal;
mod types;

pub use builder::GraphBuilder;
pub use error::{GraphError, Result};
pub use graph::CodeGraph;
pub use store::GraphStore;
pub use traversal::GraphTraversal;
pub use types::{Direction, GraphEdge, GraphNode, NodeType, RelationshipType, TraversalKind};
