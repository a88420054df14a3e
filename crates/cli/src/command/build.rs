use super::EmbeddingArgs;
use crate::config::AppConfig;
use anyhow::{Context, Result};
use clap::Args;
use semigraph_code_chunker::{ChunkerConfig, TokenAwareChunker};
use semigraph_indexer::{IndexLayout, ProjectIndexer, ScanOptions};
use semigraph_vector_store::create_backend;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory or file to index
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Index directory (defaults to the configured one)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File extensions to include (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Maximum directory depth below the project root
    #[arg(short, long)]
    pub depth: Option<usize>,

    #[command(flatten)]
    pub embedding: EmbeddingArgs,

    /// Chunks per embedding request
    #[arg(long)]
    pub batch_size: Option<usize>,
}

pub async fn run(args: BuildArgs, config: &AppConfig, home: &Path) -> Result<()> {
    if !args.path.exists() {
        anyhow::bail!("Path does not exist: {}", args.path.display());
    }

    let settings = args.embedding.settings(config);
    let backend = create_backend(&settings).context("Invalid embedding configuration")?;
    let chunker = TokenAwareChunker::cl100k(ChunkerConfig::default())
        .context("Failed to initialize tokenizer")?;

    let output = args.output.unwrap_or_else(|| config.index_dir(home));
    let batch_size = args.batch_size.unwrap_or(config.embedding.batch_size);
    let options = ScanOptions::default()
        .with_extensions(&args.extensions)
        .with_max_depth(args.depth);

    let indexer =
        ProjectIndexer::new(IndexLayout::new(&output), backend, chunker).with_batch_size(batch_size);
    let stats = indexer
        .index(&args.path, &options)
        .await
        .with_context(|| format!("Failed to build index for {}", args.path.display()))?;

    println!("Index built at {}", output.display());
    println!("  Files:              {} ({} whole-file)", stats.files, stats.fallback_files);
    println!("  Chunks:             {}", stats.chunks);
    println!("  Embeddings:         {}", stats.embeddings);
    println!("  Graph nodes:        {}", stats.graph_nodes);
    println!("  Graph edges:        {}", stats.graph_edges);
    println!("  Call relationships: {}", stats.call_relationships);
    for (language, count) in &stats.languages {
        println!("  {language}: {count}");
    }
    if !stats.errors.is_empty() {
        println!("  Errors:             {}", stats.errors.len());
        for error in &stats.errors {
            println!("    {error}");
        }
    }
    println!("  Time:               {} ms", stats.time_ms);

    Ok(())
}
