// Integration tests for vector store persistence

use crate::common::{test_config, HashEmbedder, TestNotes};
use psearch::core::indexer::IndexingPipeline;
use psearch::core::storage::{MetadataFilter, VectorIndex};
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_store_signals_needs_indexing() {
    let dir = TempDir::new().unwrap();
    let opened = VectorIndex::open(&dir.path().join("nothing"), HashEmbedder::provider()).unwrap();
    assert!(opened.is_none());
}

#[tokio::test]
async fn test_store_survives_reopen_and_incremental_add() {
    let notes = TestNotes::with_files(&[("first.md", "alpha content here")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    // First run creates the store
    let config = test_config(notes.path(), &store_dir);
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(false)
        .await
        .unwrap();

    // Second run over a different notes dir appends to it
    let more_notes = TestNotes::with_files(&[("second.md", "beta content here")]);
    let config = test_config(more_notes.path(), &store_dir);
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(false)
        .await
        .unwrap();

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();
    assert_eq!(index.len(), 2);

    // Entries from both runs are retrievable
    let results = index.query("content", 10, None).await.unwrap();
    let filenames: Vec<_> = results
        .iter()
        .map(|(chunk, _)| chunk.metadata.filename.clone())
        .collect();
    assert!(filenames.contains(&"first.md".to_string()));
    assert!(filenames.contains(&"second.md".to_string()));
}

#[tokio::test]
async fn test_query_distances_ascend() {
    let notes = TestNotes::with_files(&[
        ("close.md", "rust borrow checker lifetimes"),
        ("far.md", "gardening tips for tomatoes"),
    ]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(notes.path(), &store_dir);
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(false)
        .await
        .unwrap();

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();
    let results = index.query("rust lifetimes", 10, None).await.unwrap();

    assert_eq!(results[0].0.metadata.filename, "close.md");
    for window in results.windows(2) {
        assert!(window[0].1 <= window[1].1);
    }
}

#[tokio::test]
async fn test_metadata_filter_restricts_by_source() {
    let notes = TestNotes::with_files(&[
        ("a.md", "shared words in both"),
        ("b.md", "shared words in both"),
    ]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(notes.path(), &store_dir);
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(false)
        .await
        .unwrap();

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();

    let filter = MetadataFilter {
        filename: Some("b.md".to_string()),
        ..MetadataFilter::default()
    };
    let results = index.query("shared words", 10, Some(&filter)).await.unwrap();

    assert!(!results.is_empty());
    assert!(results
        .iter()
        .all(|(chunk, _)| chunk.metadata.filename == "b.md"));
}
