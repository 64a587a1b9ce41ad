//! Two-stage search over the vector index.
//!
//! Stage one retrieves nearest chunks by embedding distance,
//! over-fetching when a relevance scorer is available. Stage two
//! drops candidates from version-control directories, deduplicates
//! by source file and optionally re-ranks the survivors with the
//! scorer, blending its rating with the vector distance.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::core::config::{Config, SearchConfig};
use crate::core::embedding::EmbeddingProvider;
use crate::core::error::{PsearchError, Result};
use crate::core::indexer::is_under_vcs_dir;
use crate::core::scorer::RelevanceScorer;
use crate::core::search::rerank;
use crate::core::storage::VectorIndex;
use crate::core::types::{Chunk, SearchResult};

/// Widest candidate pool requested for re-ranking
const MAX_INITIAL_K: usize = 20;

/// Search service over an opened vector index
pub struct SearchEngine {
    index: VectorIndex,
    scorer: Option<Arc<dyn RelevanceScorer>>,
    default_k: usize,
    max_k: usize,
    max_query_length: usize,
}

impl SearchEngine {
    /// Open the engine for the configured index directory.
    ///
    /// `Ok(None)` means no index exists yet; the caller should
    /// prompt for indexing instead of treating this as a failure.
    pub fn open(
        config: &Config,
        provider: Arc<dyn EmbeddingProvider>,
        scorer: Option<Arc<dyn RelevanceScorer>>,
    ) -> Result<Option<Self>> {
        match VectorIndex::open(&config.storage.index_dir, provider)? {
            None => Ok(None),
            Some(index) => Ok(Some(Self::with_index(index, scorer, &config.search))),
        }
    }

    /// Build an engine around an already-opened index
    pub fn with_index(
        index: VectorIndex,
        scorer: Option<Arc<dyn RelevanceScorer>>,
        search: &SearchConfig,
    ) -> Self {
        Self {
            index,
            scorer,
            default_k: search.top_k,
            max_k: search.max_k,
            max_query_length: search.max_query_length,
        }
    }

    /// Execute a search, best results (lowest score) first.
    ///
    /// A store-level failure aborts the whole call; a scorer
    /// failure only affects the candidate it happened on.
    pub async fn search(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(PsearchError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }
        if query.len() > self.max_query_length {
            return Err(PsearchError::InvalidQuery(format!(
                "Query exceeds {} characters",
                self.max_query_length
            )));
        }

        let k = top_k.unwrap_or(self.default_k).clamp(1, self.max_k);

        // Over-fetch when re-ranking: the scorer needs a wider pool
        // than the final result count to be useful.
        let initial_k = if self.scorer.is_some() {
            (2 * k).min(MAX_INITIAL_K)
        } else {
            k
        };

        let candidates = self.index.query(query, initial_k, None).await?;

        // Drop VCS paths, then keep the best-ranked chunk per file.
        // Retrieval order is distance-ascending, so the first
        // occurrence per source is also its best.
        let mut seen = HashSet::new();
        let deduped: Vec<(Chunk, f32)> = candidates
            .into_iter()
            .filter(|(chunk, _)| !is_under_vcs_dir(&chunk.metadata.source))
            .filter(|(chunk, _)| seen.insert(chunk.metadata.source.clone()))
            .collect();

        let mut results = match &self.scorer {
            Some(scorer) => self.rerank(query, deduped, scorer).await,
            None => deduped
                .into_iter()
                .map(|(chunk, distance)| to_result(chunk, distance))
                .collect(),
        };

        // Final ordering is driven solely by the computed score;
        // equal scores keep their retrieval order.
        results.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    /// Score every candidate concurrently and blend ratings with
    /// vector distances. A failed scoring call falls back to the
    /// candidate's vector distance.
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<(Chunk, f32)>,
        scorer: &Arc<dyn RelevanceScorer>,
    ) -> Vec<SearchResult> {
        let mut join_set = JoinSet::new();

        for (position, (chunk, vector_distance)) in candidates.into_iter().enumerate() {
            let scorer = Arc::clone(scorer);
            let query = query.to_string();
            join_set.spawn(async move {
                let prompt = rerank::build_prompt(&query, &chunk.metadata.filename, &chunk.text);
                let score = match scorer.generate(&prompt).await {
                    Ok(response) => {
                        let rating = rerank::parse_rating(&response);
                        tracing::debug!(
                            "Scored {:?}: rating {} at vector distance {:.3}",
                            chunk.metadata.source,
                            rating,
                            vector_distance
                        );
                        rerank::blend(rerank::rating_to_distance(rating), vector_distance)
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Scoring failed for {:?}: {}; falling back to vector distance",
                            chunk.metadata.source,
                            e
                        );
                        vector_distance
                    }
                };
                (position, to_result(chunk, score))
            });
        }

        let mut scored = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(item) => scored.push(item),
                Err(e) => tracing::warn!("Scoring task failed: {}", e),
            }
        }

        // Restore retrieval order so the later stable sort breaks
        // score ties deterministically
        scored.sort_by_key(|(position, _)| *position);
        scored.into_iter().map(|(_, result)| result).collect()
    }
}

fn to_result(chunk: Chunk, score: f32) -> SearchResult {
    SearchResult {
        content: chunk.text,
        source: chunk.metadata.source,
        filename: chunk.metadata.filename,
        modified_at: chunk.metadata.modified_at,
        score,
    }
}
