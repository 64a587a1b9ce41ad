// Integration tests for search and re-ranking

use crate::common::{test_config, HashEmbedder, ScriptedScorer, TestNotes};
use async_trait::async_trait;
use psearch::core::embedding::EmbeddingProvider;
use psearch::core::error::Result;
use psearch::core::indexer::IndexingPipeline;
use psearch::core::search::SearchEngine;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

async fn index_notes(notes: &TestNotes, store_dir: &std::path::Path) {
    let config = test_config(notes.path(), store_dir);
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_index_then_search_single_file() {
    // One file "hello world", one chunk, one result
    let notes = TestNotes::with_files(&[("a.md", "hello world")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");
    index_notes(&notes, &store_dir).await;

    let config = test_config(notes.path(), &store_dir);
    let engine = SearchEngine::open(&config, HashEmbedder::provider(), None)
        .unwrap()
        .expect("index should exist");

    let results = engine.search("hello", None).await.unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].source.ends_with("a.md"));
    assert!(results[0].content.contains("hello world"));
}

#[tokio::test]
async fn test_no_index_is_a_distinct_condition() {
    let empty = TempDir::new().unwrap();
    let config = test_config(empty.path(), &empty.path().join("index"));

    let engine = SearchEngine::open(&config, HashEmbedder::provider(), None).unwrap();
    assert!(engine.is_none());
}

#[tokio::test]
async fn test_at_most_one_result_per_source_file() {
    // A long note chunks into many pieces that all mention the
    // query word; dedup must collapse them to one result
    let body = "meeting notes about the project\n\n".repeat(30);
    let notes = TestNotes::with_files(&[("meetings.md", body.as_str()), ("other.md", "unrelated")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let mut config = test_config(notes.path(), &store_dir);
    config.indexing.chunk_size = 120;
    config.indexing.chunk_overlap = 20;
    IndexingPipeline::new(&config, HashEmbedder::provider())
        .run(false)
        .await
        .unwrap();

    let engine = SearchEngine::open(&config, HashEmbedder::provider(), None)
        .unwrap()
        .unwrap();
    let results = engine.search("meeting project", Some(10)).await.unwrap();

    let sources: Vec<_> = results.iter().map(|r| r.source.clone()).collect();
    let unique: HashSet<_> = sources.iter().cloned().collect();
    assert_eq!(sources.len(), unique.len());
}

#[tokio::test]
async fn test_without_scorer_order_is_vector_order() {
    let notes = TestNotes::with_files(&[
        ("rust.md", "rust ownership and borrowing"),
        ("cooking.md", "rust colored pans for cooking"),
        ("garden.md", "planting tomatoes in spring"),
    ]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");
    index_notes(&notes, &store_dir).await;

    let config = test_config(notes.path(), &store_dir);
    let engine = SearchEngine::open(&config, HashEmbedder::provider(), None)
        .unwrap()
        .unwrap();

    let results = engine.search("rust ownership", Some(3)).await.unwrap();

    // Scores ascend and the strongest lexical match leads
    assert_eq!(results[0].filename, "rust.md");
    for window in results.windows(2) {
        assert!(window[0].score <= window[1].score);
    }
}

/// Embedder giving every document the same vector and the query a
/// vector at exactly cosine distance 0.5 from it
struct FixedAngleEmbedder;

#[async_trait]
impl EmbeddingProvider for FixedAngleEmbedder {
    fn model(&self) -> &str {
        "fixed-angle-test"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("hello world") {
                    vec![1.0, 0.0]
                } else {
                    // cos(60°) against the document axis
                    vec![0.5, 0.866_025_4]
                }
            })
            .collect())
    }
}

#[tokio::test]
async fn test_blended_scores_follow_ratings_at_equal_distance() {
    // Both files embed identically (vector distance 0.5 from the
    // query); the scorer rates x.md 8 and y.md 2, so x.md must win
    // with 0.7*0.3 + 0.3*0.5 = 0.36 against 0.7*0.9 + 0.3*0.5 = 0.78
    let notes = TestNotes::with_files(&[("x.md", "hello world"), ("y.md", "hello world")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(FixedAngleEmbedder);
    let config = test_config(notes.path(), &store_dir);
    IndexingPipeline::new(&config, Arc::clone(&provider))
        .run(false)
        .await
        .unwrap();

    let scorer = ScriptedScorer::new(&[("x.md", "8"), ("y.md", "2")]);
    let engine = SearchEngine::open(&config, provider, Some(scorer))
        .unwrap()
        .unwrap();

    let results = engine.search("hello", Some(5)).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].filename, "x.md");
    assert!((results[0].score - 0.36).abs() < 1e-5);
    assert_eq!(results[1].filename, "y.md");
    assert!((results[1].score - 0.78).abs() < 1e-5);
}

#[tokio::test]
async fn test_scorer_failure_keeps_result_with_vector_distance() {
    let notes = TestNotes::with_files(&[("x.md", "hello world"), ("y.md", "hello world")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(FixedAngleEmbedder);
    let config = test_config(notes.path(), &store_dir);
    IndexingPipeline::new(&config, Arc::clone(&provider))
        .run(false)
        .await
        .unwrap();

    // Only y.md has a scripted reply; scoring x.md errors out and
    // falls back to its raw vector distance (0.5)
    let scorer = ScriptedScorer::new(&[("y.md", "10")]);
    let engine = SearchEngine::open(&config, provider, Some(scorer))
        .unwrap()
        .unwrap();

    let results = engine.search("hello", Some(5)).await.unwrap();

    assert_eq!(results.len(), 2);
    // y.md: 0.7*0.1 + 0.3*0.5 = 0.22 beats x.md's fallback 0.5
    assert_eq!(results[0].filename, "y.md");
    assert!((results[0].score - 0.22).abs() < 1e-5);
    assert!((results[1].score - 0.5).abs() < 1e-5);
}

#[tokio::test]
async fn test_rating_without_integer_defaults_to_neutral() {
    let notes = TestNotes::with_files(&[("x.md", "hello world")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(FixedAngleEmbedder);
    let config = test_config(notes.path(), &store_dir);
    IndexingPipeline::new(&config, Arc::clone(&provider))
        .run(false)
        .await
        .unwrap();

    let scorer = ScriptedScorer::new(&[("x.md", "seems pretty relevant to me")]);
    let engine = SearchEngine::open(&config, provider, Some(scorer))
        .unwrap()
        .unwrap();

    let results = engine.search("hello", Some(5)).await.unwrap();

    // Neutral rating 5: 0.7*0.6 + 0.3*0.5 = 0.57
    assert!((results[0].score - 0.57).abs() < 1e-5);
}

#[tokio::test]
async fn test_empty_query_is_an_error() {
    let notes = TestNotes::with_files(&[("a.md", "hello world")]);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");
    index_notes(&notes, &store_dir).await;

    let config = test_config(notes.path(), &store_dir);
    let engine = SearchEngine::open(&config, HashEmbedder::provider(), None)
        .unwrap()
        .unwrap();

    assert!(engine.search("", None).await.is_err());
    assert!(engine.search("   \t", None).await.is_err());
}

#[tokio::test]
async fn test_top_k_limits_results() {
    let files: Vec<(String, String)> = (0..8)
        .map(|i| (format!("note{i}.md"), format!("common word plus topic{i}")))
        .collect();
    let file_refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let notes = TestNotes::with_files(&file_refs);
    let index_dir = TempDir::new().unwrap();
    let store_dir = index_dir.path().join("index");
    index_notes(&notes, &store_dir).await;

    let config = test_config(notes.path(), &store_dir);
    let engine = SearchEngine::open(&config, HashEmbedder::provider(), None)
        .unwrap()
        .unwrap();

    let results = engine.search("common word", Some(3)).await.unwrap();
    assert_eq!(results.len(), 3);

    // Default comes from configuration (top_k = 5)
    let results = engine.search("common word", None).await.unwrap();
    assert_eq!(results.len(), 5);
}
