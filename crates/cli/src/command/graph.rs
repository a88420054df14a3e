use crate::config::AppConfig;
use anyhow::{Context, Result};
use clap::Args;
use semigraph_graph::{GraphNode, GraphStore, GraphTraversal, RelationshipType, TraversalKind};
use semigraph_indexer::IndexLayout;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Class or method name to start from
    pub name: String,

    /// Traversal: bfs or dfs
    #[arg(short = 't', long = "type", default_value = "bfs")]
    pub traversal: String,

    /// Maximum number of hops from the start node
    #[arg(short, long, default_value_t = 10)]
    pub depth: usize,

    /// Maximum number of nodes to print
    #[arg(short, long)]
    pub max_nodes: Option<usize>,

    /// Relationship types to follow (comma-separated: contains, calls)
    #[arg(short, long)]
    pub relationships: Option<String>,

    /// Index directory (defaults to the configured one)
    #[arg(short, long)]
    pub index_dir: Option<PathBuf>,
}

pub async fn run(args: GraphArgs, config: &AppConfig, home: &Path) -> Result<()> {
    let kind: TraversalKind = args.traversal.parse().context("Invalid --type")?;
    let relationships = match args.relationships.as_deref() {
        Some(raw) => RelationshipType::parse_list(raw).context("Invalid --relationships")?,
        None => Vec::new(),
    };

    let index_dir = args.index_dir.unwrap_or_else(|| config.index_dir(home));
    let graph = IndexLayout::new(&index_dir).load_graph().await?;

    let Some(start) = graph.find_by_name(&args.name) else {
        println!("No node named '{}'", args.name);
        return Ok(());
    };
    log::info!(
        "Starting from {} ({}) in {}",
        start.name,
        start.node_type,
        start.file_path
    );

    let mut nodes = graph.traverse(kind, &start.node_id, args.depth, &relationships);
    if let Some(max) = args.max_nodes {
        nodes.truncate(max);
    }

    for (i, node) in nodes.iter().enumerate() {
        println!("{}", format_node(i + 1, node));
    }
    println!(
        "Total nodes: {}, Total edges: {}",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}

fn format_node(rank: usize, node: &GraphNode) -> String {
    format!(
        "{rank}. {} ({}) - {}",
        node.name, node.node_type, node.file_path
    )
}
