use super::EmbeddingArgs;
use crate::config::AppConfig;
use anyhow::{Context, Result};
use clap::Args;
use semigraph_indexer::IndexLayout;
use semigraph_vector_store::{create_backend, SearchResult};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Index directory (defaults to the configured one)
    #[arg(short, long)]
    pub index_dir: Option<PathBuf>,

    /// Maximum number of results (defaults to `search.top_k`)
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub embedding: EmbeddingArgs,
}

pub async fn run(args: SearchArgs, config: &AppConfig, home: &Path) -> Result<()> {
    let index_dir = args.index_dir.unwrap_or_else(|| config.index_dir(home));
    let store = IndexLayout::new(&index_dir).load_vectors().await?;

    let mut settings = args.embedding.settings(config);
    // the query has to match the stored vectors
    if settings.dimension.is_none() {
        settings.dimension = store.dimension();
    }
    let backend = create_backend(&settings).context("Invalid embedding configuration")?;

    let limit = args.limit.unwrap_or(config.search.top_k);
    let query = backend
        .embed(&args.query)
        .await
        .context("Failed to embed query")?;
    let results = store
        .search_similar(&query, limit)
        .context("Search failed")?;

    if results.is_empty() {
        println!("No results");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}", format_result(i + 1, result));
    }
    Ok(())
}

fn format_result(rank: usize, result: &SearchResult) -> String {
    let chunk = &result.chunk;
    format!(
        "{rank}. {} [{}.{} {}/{}] (similarity: {:.4})",
        chunk.file_path,
        chunk.class_name,
        chunk.method_name,
        chunk.chunk_index,
        chunk.chunk_count,
        result.score
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use semigraph_code_chunker::{ChunkContext, CodeChunk};

    #[test]
    fn result_line_format() {
        let mut context = ChunkContext::for_file("src/Sample.java");
        context.class_name = "Sample".to_string();
        context.method_name = "foo".to_string();
        let chunk = CodeChunk::new(&context, 1, 2, "void foo() {}");
        let result = SearchResult {
            chunk_id: chunk.chunk_id.clone(),
            chunk,
            score: 0.123_456,
        };

        assert_eq!(
            format_result(3, &result),
            "3. src/Sample.java [Sample.foo 1/2] (similarity: 0.1235)"
        );
    }
}
