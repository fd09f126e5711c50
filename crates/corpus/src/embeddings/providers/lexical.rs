//! Lexical embedding provider using hashed word and trigram features.

use crate::embeddings::provider::EmbeddingProvider;
use scholar_core::AppResult;
use std::collections::HashMap;

/// Words too common to carry retrieval signal.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

/// Lexical embedding provider for local, offline operation.
///
/// Hashes word and character-trigram features into a fixed-dimension
/// vector: deterministic, dependency-free, and stable across runs.
/// Vocabulary overlap is what drives similarity here, not meaning, so
/// it ranks shared-term passages well and is the default when no
/// embedding server is available.
#[derive(Debug)]
pub struct LexicalProvider {
    dimensions: usize,
}

impl LexicalProvider {
    /// Create a new lexical provider with the given dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Generate a feature-hashed embedding for one text.
    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();

        // Count surviving terms; punctuation is trimmed so "mat." and
        // "mat" land on the same features
        let mut term_freq: HashMap<&str, u32> = HashMap::new();
        for raw in lower.split_whitespace() {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if word.len() > 2 && !STOP_WORDS.contains(&word) {
                *term_freq.entry(word).or_insert(0) += 1;
            }
        }

        for (word, freq) in &term_freq {
            // Character trigrams spread each word over several
            // dimensions, sqrt-scaled to soften frequency spikes
            let weight = (*freq as f32).sqrt();
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram_hash = window
                    .iter()
                    .fold(0u64, |acc, &c| acc.wrapping_mul(37).wrapping_add(c as u64));
                embedding[(trigram_hash as usize) % self.dimensions] += weight;
            }

            // The whole word gets a dimension of its own
            let word_hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            embedding[(word_hash as usize) % self.dimensions] += *freq as f32;
        }

        // Normalize to unit length; texts with no surviving terms stay
        // at the origin
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for LexicalProvider {
    fn provider_name(&self) -> &str {
        "lexical"
    }

    fn model_name(&self) -> &str {
        "lexical-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
