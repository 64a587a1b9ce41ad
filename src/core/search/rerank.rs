//! Rating extraction and score blending for LLM re-ranking.
//!
//! The relevance scorer replies with free-form text; the first
//! integer found in it is the 1-10 rating. The rating is converted
//! into a distance-like quantity and blended with the raw vector
//! distance so both signals point the same way (lower = better).

use once_cell::sync::Lazy;
use regex::Regex;

/// Weight of the scorer-derived distance in the blended score
pub const LLM_WEIGHT: f32 = 0.7;

/// Weight of the raw vector distance in the blended score
pub const VECTOR_WEIGHT: f32 = 0.3;

/// Rating used when the scorer reply contains no integer
const NEUTRAL_RATING: i64 = 5;

/// Characters of chunk content shown to the scorer
const PREVIEW_CHARS: usize = 300;

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").expect("valid regex"));

/// Build the scoring prompt for one candidate
pub fn build_prompt(query: &str, filename: &str, content: &str) -> String {
    let preview: String = content.chars().take(PREVIEW_CHARS).collect();
    format!(
        "Rate how relevant this note is to the query on a scale of 1 to 10.\n\
         Query: {query}\n\
         File: {filename}\n\
         Content:\n{preview}\n\n\
         Reply with a single integer between 1 and 10."
    )
}

/// Extract the rating from a scorer reply.
///
/// The first integer literal wins; a reply without one defaults to
/// the neutral rating. The result is always clamped to [1, 10].
pub fn parse_rating(response: &str) -> i64 {
    let rating = INTEGER_RE
        .find(response)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(NEUTRAL_RATING);
    rating.clamp(1, 10)
}

/// Convert a 1-10 rating into a distance in [0.1, 1.0], so a
/// higher relevance rating yields a lower distance
pub fn rating_to_distance(rating: i64) -> f32 {
    (11 - rating) as f32 / 10.0
}

/// Blend the scorer distance with the vector distance
pub fn blend(llm_distance: f32, vector_distance: f32) -> f32 {
    LLM_WEIGHT * llm_distance + VECTOR_WEIGHT * vector_distance
}
