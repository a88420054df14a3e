use async_trait::async_trait;
use pretty_assertions::assert_eq;
use semigraph_code_chunker::{ChunkerConfig, EstimatingTokenizer, TokenAwareChunker};
use semigraph_graph::{GraphStore, GraphTraversal};
use semigraph_indexer::{IndexLayout, IndexerError, ProjectIndexer, ScanOptions};
use semigraph_vector_store::{
    EmbeddingBackend, MockEmbeddingBackend, Result as StoreResult, VectorStoreError,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE: &str = "public class Sample {
    int value;

    void foo() {
        bar();
    }

    void bar() {
        println();
    }
}
";

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn chunker() -> TokenAwareChunker {
    TokenAwareChunker::new(ChunkerConfig::default(), EstimatingTokenizer).unwrap()
}

fn indexer(index_dir: &Path, backend: impl EmbeddingBackend + 'static) -> ProjectIndexer {
    ProjectIndexer::new(IndexLayout::new(index_dir), Box::new(backend), chunker()).with_batch_size(2)
}

#[tokio::test]
async fn indexes_java_and_falls_back_for_other_files() {
    let project = TempDir::new().unwrap();
    let root = project.path();
    write(root, "src/Sample.java", SAMPLE.as_bytes());
    write(root, "scripts/run.py", b"print('hi')\n");
    write(root, "node_modules/dep/index.js", b"module.exports = 1;\n");
    write(root, "build/Generated.java", b"class Generated {}\n");

    let out = TempDir::new().unwrap();
    let indexer = indexer(out.path(), MockEmbeddingBackend::new("mock", 16));
    let stats = indexer.index(root, &ScanOptions::default()).await.unwrap();

    assert_eq!(stats.files, 2);
    assert_eq!(stats.fallback_files, 1);
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.embeddings, 3);
    assert_eq!(stats.call_relationships, 2);
    assert_eq!(stats.graph_nodes, 4);
    assert_eq!(stats.graph_edges, 4);
    assert_eq!(stats.languages.get("java"), Some(&1));
    assert_eq!(stats.languages.get("python"), Some(&1));
    assert!(stats.errors.is_empty());

    let layout = indexer.layout();
    let graph = layout.load_graph().await.unwrap();
    let sample = graph.find_by_name("Sample").unwrap();
    assert_eq!(sample.node_id, "src/Sample.java:Sample");
    let names: Vec<_> = graph
        .traverse_bfs(&sample.node_id, 10, &[])
        .iter()
        .map(|n| n.name.clone())
        .collect();
    assert_eq!(names, vec!["Sample", "foo", "bar", "println"]);

    let store = layout.load_vectors().await.unwrap();
    assert_eq!(store.count(), 3);
    assert_eq!(store.dimension(), Some(16));
    let foo = store.get("src/sample.java::sample::foo::1/1").unwrap();
    assert_eq!(foo.chunk.fields, vec!["value".to_string()]);
    assert!(foo.chunk.content.contains("bar();"));
    let script = store.get("scripts/run.py::::::1/1").unwrap();
    assert_eq!(script.chunk.content, "print('hi')\n");
}

#[tokio::test]
async fn unreadable_file_is_skipped() {
    let project = TempDir::new().unwrap();
    let root = project.path();
    write(root, "A.java", b"class A { void a() {} }\n");
    write(root, "Broken.java", &[0xff, 0xfe, 0x00, 0x41]);

    let out = TempDir::new().unwrap();
    let stats = indexer(out.path(), MockEmbeddingBackend::new("mock", 8))
        .index(root, &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(stats.files, 1);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].starts_with("Broken.java"), "{:?}", stats.errors);
}

/// Fails for any text mentioning "boom"
struct FlakyBackend;

#[async_trait]
impl EmbeddingBackend for FlakyBackend {
    fn model_name(&self) -> &str {
        "flaky"
    }

    fn dimension(&self) -> usize {
        4
    }

    async fn embed(&self, text: &str) -> StoreResult<Vec<f32>> {
        if text.contains("boom") {
            return Err(VectorStoreError::embedding("backend unavailable"));
        }
        Ok(vec![0.5; 4])
    }
}

#[tokio::test]
async fn embedding_failure_only_drops_that_file() {
    let project = TempDir::new().unwrap();
    let root = project.path();
    write(root, "a.py", b"ok = 1\n");
    write(root, "b.py", b"boom = 2\n");
    write(root, "c.py", b"fine = 3\n");

    let out = TempDir::new().unwrap();
    let stats = indexer(out.path(), FlakyBackend)
        .index(root, &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(stats.files, 2);
    assert_eq!(stats.embeddings, 2);
    assert_eq!(stats.errors.len(), 1);
    assert!(out.path().join("vectors.json").exists());
    assert!(out.path().join("graph.json").exists());
}

#[tokio::test]
async fn extension_filter_and_single_file_root() {
    let project = TempDir::new().unwrap();
    let root = project.path();
    write(root, "Main.java", SAMPLE.as_bytes());
    write(root, "tool.py", b"x = 1\n");

    let out = TempDir::new().unwrap();
    let indexer = indexer(out.path(), MockEmbeddingBackend::new("mock", 8));

    let only_py = ScanOptions::default().with_extensions(["py"]);
    let stats = indexer.index(root, &only_py).await.unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(stats.graph_nodes, 0);

    let stats = indexer
        .index(&root.join("Main.java"), &ScanOptions::default())
        .await
        .unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(stats.chunks, 2);
    let store = indexer.layout().load_vectors().await.unwrap();
    assert!(store.get("main.java::sample::foo::1/1").is_some());
}

#[tokio::test]
async fn missing_root_is_invalid_path() {
    let out = TempDir::new().unwrap();
    let result = indexer(out.path(), MockEmbeddingBackend::default())
        .index(&out.path().join("nope"), &ScanOptions::default())
        .await;

    assert!(matches!(result, Err(IndexerError::InvalidPath(_))));
    assert!(!out.path().join("vectors.json").exists());
}
