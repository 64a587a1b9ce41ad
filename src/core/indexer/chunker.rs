//! UTF-8 safe recursive text chunking.
//!
//! Splits document text on a separator preference list, coarsest
//! first (paragraph break, line break, space). Pieces that fit the
//! chunk size are merged back together greedily; pieces that don't
//! are re-split with the next finer separator. All sizes are
//! measured in **characters**, not bytes, so chunk boundaries never
//! land inside a multi-byte UTF-8 sequence.
//!
//! Separators stay attached to the piece they terminate, so
//! concatenating the produced chunks (with the overlap prefixes
//! removed) reproduces the input text exactly.

use crate::core::types::{Chunk, Document};

/// Separator preference list, coarsest to finest
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Recursive character chunker.
///
/// Produces fragments of at most `chunk_size` characters, each
/// chunk after the first prefixed with the trailing `overlap`
/// characters of its predecessor. A fragment that no separator can
/// split is emitted whole, never truncated.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Target maximum characters per chunk
    chunk_size: usize,

    /// Characters of trailing context repeated at the start of the
    /// next chunk
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is 0 or if `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        assert!(overlap < chunk_size, "overlap must be < chunk_size");

        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split a document into chunks, each carrying the document's
    /// provenance metadata.
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.text)
            .into_iter()
            .map(|text| Chunk {
                text,
                metadata: document.metadata.clone(),
            })
            .collect()
    }

    /// Split raw text into chunk strings.
    ///
    /// Deterministic for a given (text, chunk_size, overlap). Text
    /// no longer than `chunk_size` yields exactly one chunk; empty
    /// text yields none.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut raw = Vec::new();
        self.split_recursive(text, &SEPARATORS, &mut raw);
        let pieces = self.merge_pieces(raw);

        // Prefix each chunk after the first with trailing context
        // from the previous piece (pre-overlap, so removal of the
        // prefix reconstructs the original text).
        let mut chunks = Vec::with_capacity(pieces.len());
        let mut prev_tail = String::new();
        for (i, piece) in pieces.iter().enumerate() {
            if i == 0 || self.overlap == 0 {
                chunks.push(piece.clone());
            } else {
                chunks.push(format!("{prev_tail}{piece}"));
            }
            prev_tail = tail_chars(piece, self.overlap);
        }

        chunks
    }

    /// Split on the coarsest separator that applies; recurse into
    /// oversized parts with the finer separators. Exhausting the
    /// separator list emits the part as-is.
    fn split_recursive<'a>(&self, text: &'a str, separators: &[&str], out: &mut Vec<&'a str>) {
        if char_len(text) <= self.chunk_size {
            out.push(text);
            return;
        }

        let Some((sep, finer)) = separators.split_first() else {
            out.push(text);
            return;
        };

        let parts = split_keep_separator(text, sep);
        if parts.len() == 1 {
            // Separator not present, move on to the finer one
            self.split_recursive(text, finer, out);
            return;
        }

        for part in parts {
            if char_len(part) <= self.chunk_size {
                out.push(part);
            } else {
                self.split_recursive(part, finer, out);
            }
        }
    }

    /// Greedily recombine adjacent pieces up to `chunk_size`.
    fn merge_pieces(&self, parts: Vec<&str>) -> Vec<String> {
        let mut merged = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for part in parts {
            let part_len = char_len(part);
            if current_len > 0 && current_len + part_len > self.chunk_size {
                merged.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push_str(part);
            current_len += part_len;
        }
        if !current.is_empty() {
            merged.push(current);
        }

        merged
    }
}

/// Character count of a string slice
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` on `sep`, keeping each separator attached to the
/// piece it terminates. The concatenation of the returned pieces is
/// `text`.
fn split_keep_separator<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(sep) {
        let end = start + pos + sep.len();
        parts.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }

    parts
}

/// Last `n` characters of a string, on character boundaries
fn tail_chars(s: &str, n: usize) -> String {
    let count = char_len(s);
    if count <= n {
        s.to_string()
    } else {
        s.chars().skip(count - n).collect()
    }
}
