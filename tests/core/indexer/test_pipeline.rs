// Integration tests for the indexing pipeline

use crate::common::{test_config, HashEmbedder, TestNotes};
use psearch::core::indexer::IndexingPipeline;
use psearch::core::storage::VectorIndex;
use tempfile::TempDir;

#[tokio::test]
async fn test_single_small_file_yields_one_chunk() {
    // "hello world" with chunk_size 1000 fits in exactly one chunk
    let notes = TestNotes::with_files(&[("a.md", "hello world")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(notes.path(), &store_dir);
    let pipeline = IndexingPipeline::new(&config, HashEmbedder::provider());

    let stats = pipeline.run(false).await.unwrap();

    assert_eq!(stats.files_loaded, 1);
    assert_eq!(stats.chunks_indexed, 1);

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn test_vcs_files_never_indexed() {
    let notes = TestNotes::with_files(&[
        ("keep.md", "real note about cooking"),
        (".git/config", "[core]\nbare = false"),
    ]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(notes.path(), &store_dir);
    let pipeline = IndexingPipeline::new(&config, HashEmbedder::provider());
    pipeline.run(false).await.unwrap();

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();

    // Only the real note made it into the store
    let results = index.query("cooking", 10, None).await.unwrap();
    assert!(!results.is_empty());
    for (chunk, _) in &results {
        assert!(!chunk.metadata.source.to_string_lossy().contains(".git"));
    }
}

#[tokio::test]
async fn test_chunks_carry_provenance_metadata() {
    let notes = TestNotes::with_files(&[("recipes.md", "pasta and pizza recipes")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(notes.path(), &store_dir);
    let pipeline = IndexingPipeline::new(&config, HashEmbedder::provider());
    pipeline.run(false).await.unwrap();

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();
    let results = index.query("pasta", 1, None).await.unwrap();

    let metadata = &results[0].0.metadata;
    assert_eq!(metadata.filename, "recipes.md");
    assert!(metadata.source.ends_with("recipes.md"));
    assert_eq!(metadata.content_hash.len(), 64); // SHA-256 hex
}

#[tokio::test]
async fn test_document_header_biases_filename_retrieval() {
    let notes = TestNotes::with_files(&[
        ("shopping.md", "apples and oranges"),
        ("other.md", "unrelated content entirely"),
    ]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(notes.path(), &store_dir);
    let pipeline = IndexingPipeline::new(&config, HashEmbedder::provider());
    pipeline.run(false).await.unwrap();

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();

    // The synthetic header makes the file name itself searchable
    let results = index.query("shopping", 1, None).await.unwrap();
    assert_eq!(results[0].0.metadata.filename, "shopping.md");
}

#[tokio::test]
async fn test_reindex_without_force_appends_duplicates() {
    let notes = TestNotes::with_files(&[("a.md", "hello world")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(notes.path(), &store_dir);
    let pipeline = IndexingPipeline::new(&config, HashEmbedder::provider());

    pipeline.run(false).await.unwrap();
    let stats = pipeline.run(false).await.unwrap();
    assert_eq!(stats.chunks_indexed, 1);

    // Additive by design: the same file is now stored twice
    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_force_reindex_destroys_prior_entries() {
    let old_notes = TestNotes::with_files(&[("old.md", "ancient history topic")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let config = test_config(old_notes.path(), &store_dir);
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(false)
        .await
        .unwrap();

    // Re-point the pipeline at a new batch and force
    let new_notes = TestNotes::with_files(&[("new.md", "fresh content topic")]);
    let config = test_config(new_notes.path(), &store_dir);
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(true)
        .await
        .unwrap();

    let index = VectorIndex::open(&store_dir, HashEmbedder::provider())
        .unwrap()
        .unwrap();
    assert_eq!(index.len(), 1);

    // Only documents from the new batch remain findable
    let results = index.query("topic", 10, None).await.unwrap();
    assert!(results
        .iter()
        .all(|(chunk, _)| chunk.metadata.filename == "new.md"));
}

#[tokio::test]
async fn test_larger_note_splits_into_overlapping_chunks() {
    let paragraphs: Vec<String> = (0..40)
        .map(|i| format!("Paragraph {i} talks about subject {i} in a few words."))
        .collect();
    let body = paragraphs.join("\n\n");
    let notes = TestNotes::with_files(&[("long.md", body.as_str())]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let mut config = test_config(notes.path(), &store_dir);
    config.indexing.chunk_size = 200;
    config.indexing.chunk_overlap = 40;

    let pipeline = IndexingPipeline::new(&config, HashEmbedder::provider());
    let stats = pipeline.run(false).await.unwrap();

    assert!(stats.chunks_indexed > 5);
}
