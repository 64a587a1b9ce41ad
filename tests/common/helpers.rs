// Test helpers: stub providers and configuration builders
//
// No integration test talks to a live model. The embedder hashes
// words onto a fixed number of dimensions, which is deterministic
// and makes texts sharing words measurably closer than texts that
// don't. The scorer replies from a fixed table keyed on file name.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use psearch::core::config::Config;
use psearch::core::embedding::EmbeddingProvider;
use psearch::core::error::{PsearchError, Result};
use psearch::core::scorer::RelevanceScorer;

const DIM: usize = 64;

/// Deterministic bag-of-words embedder
pub struct HashEmbedder;

impl HashEmbedder {
    #[allow(dead_code)]
    pub fn provider() -> Arc<dyn EmbeddingProvider> {
        Arc::new(HashEmbedder)
    }
}

fn word_bucket(word: &str) -> usize {
    // FNV-1a, folded onto the vector dimensions
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIM as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn model(&self) -> &str {
        "hash-test"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0f32; DIM];
                for word in text
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|w| !w.is_empty())
                {
                    v[word_bucket(&word.to_ascii_lowercase())] += 1.0;
                }
                v
            })
            .collect())
    }
}

/// Scorer answering from a fixed (filename fragment, reply) table.
/// Prompts without a table entry produce an error, exercising the
/// per-candidate fallback path.
pub struct ScriptedScorer {
    replies: Vec<(String, String)>,
}

impl ScriptedScorer {
    #[allow(dead_code)]
    pub fn new(replies: &[(&str, &str)]) -> Arc<dyn RelevanceScorer> {
        Arc::new(Self {
            replies: replies
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}

#[async_trait]
impl RelevanceScorer for ScriptedScorer {
    fn model(&self) -> &str {
        "scripted-test"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        for (fragment, reply) in &self.replies {
            if prompt.contains(fragment) {
                return Ok(reply.clone());
            }
        }
        Err(PsearchError::ScoringFailed("no scripted reply".to_string()))
    }
}

/// Config pointing at temp directories with small chunks
#[allow(dead_code)]
pub fn test_config(notes_dir: &Path, index_dir: &Path) -> Config {
    let mut config = Config::default();
    config.notes.directory = notes_dir.to_path_buf();
    config.storage.index_dir = index_dir.to_path_buf();
    config
}
