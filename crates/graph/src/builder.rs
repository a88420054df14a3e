use crate::error::Result;
use crate::store::GraphStore;
use crate::types::{GraphNode, NodeType, RelationshipType};
use semigraph_analyzer::FileAnalysis;

/// Turns structural analysis into class, method and call nodes.
///
/// Node ids are `"{file}:{Class}"` for classes and `"{classId}:{method}"` for
/// methods. Callees resolve against the caller's own class only; unknown
/// callees become stub nodes that a later real declaration replaces.
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn class_node_id(file_path: &str, class_name: &str) -> String {
        format!("{file_path}:{class_name}")
    }

    pub fn method_node_id(class_id: &str, method_name: &str) -> String {
        format!("{class_id}:{method_name}")
    }

    /// Add one analyzed file to `graph`, returning the number of call edges seen
    pub fn add_file<G: GraphStore + ?Sized>(graph: &mut G, analysis: &FileAnalysis) -> Result<usize> {
        let mut call_edges = 0;

        for class in &analysis.classes {
            let class_id = Self::class_node_id(&analysis.file_path, &class.name);
            graph.upsert_node(GraphNode::new(
                &class_id,
                NodeType::Class,
                &class.name,
                &analysis.file_path,
            ));

            for method in &class.methods {
                let method_id = Self::method_node_id(&class_id, &method.name);
                graph.upsert_node(GraphNode::new(
                    &method_id,
                    NodeType::Method,
                    &method.name,
                    &analysis.file_path,
                ));
                graph.add_edge(&class_id, &method_id, RelationshipType::Contains)?;

                for callee in method.callee_names() {
                    let callee_id = Self::method_node_id(&class_id, callee);
                    if graph.node(&callee_id).is_none() {
                        graph.upsert_node(GraphNode::stub(&callee_id, callee));
                    }
                    graph.add_edge(&method_id, &callee_id, RelationshipType::Calls)?;
                    call_edges += 1;
                }
            }
        }

        log::debug!(
            "Graph: {} classes and {call_edges} call edges from {}",
            analysis.classes.len(),
            analysis.file_path
        );
        Ok(call_edges)
    }
}
