use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Class,
    Method,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Class => "class",
            NodeType::Method => "method",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of relationship between code elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// A contains B (class contains method)
    Contains,

    /// A calls B (call site in A's body)
    Calls,
}

impl RelationshipType {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Contains => "contains",
            RelationshipType::Calls => "calls",
        }
    }

    /// Parse a comma-separated filter such as `"calls, contains"`
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, GraphError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for RelationshipType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contains" => Ok(RelationshipType::Contains),
            "calls" => Ok(RelationshipType::Calls),
            other => Err(GraphError::InvalidValue(format!(
                "unknown relationship type '{other}' (expected 'contains' or 'calls')"
            ))),
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which edges of a node to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalKind {
    #[default]
    Bfs,
    Dfs,
}

impl FromStr for TraversalKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(TraversalKind::Bfs),
            "dfs" => Ok(TraversalKind::Dfs),
            other => Err(GraphError::InvalidValue(format!(
                "unknown traversal '{other}' (expected 'bfs' or 'dfs')"
            ))),
        }
    }
}

/// Node in code graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Caller-assigned, unique
    pub node_id: String,

    pub node_type: NodeType,

    pub name: String,

    /// Empty for stub nodes
    pub file_path: String,
}

impl GraphNode {
    pub fn new(
        node_id: impl Into<String>,
        node_type: NodeType,
        name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            node_type,
            name: name.into(),
            file_path: file_path.into(),
        }
    }

    /// Placeholder for a callee that has not been analyzed
    pub fn stub(node_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(node_id, NodeType::Method, name, "")
    }

    pub fn is_stub(&self) -> bool {
        self.file_path.is_empty()
    }
}

/// Edge in code graph; identity is the whole triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub relationship: RelationshipType,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, relationship: RelationshipType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship,
        }
    }
}
