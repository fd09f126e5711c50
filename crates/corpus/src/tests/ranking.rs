//! Tests for cross-document ranking correctness.

use crate::embeddings::LexicalProvider;
use crate::registry::IndexRegistry;
use crate::retriever::{retrieve, RetrievalOptions};
use crate::types::DocumentText;

#[cfg(test)]
mod tests {
    use super::*;

    /// Repeat a phrase until the text holds exactly `n` words.
    fn repeat_words(phrase: &str, n: usize) -> String {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        (0..n).map(|i| words[i % words.len()]).collect::<Vec<_>>().join(" ")
    }

    async fn build_example_registry(provider: &LexicalProvider) -> IndexRegistry {
        // Document A: 600 words about the cat, segmenting into 2 chunks.
        // Document B: 300 words of unrelated vocabulary, 1 chunk.
        let documents = vec![
            DocumentText::new("a.txt", repeat_words("the cat sat on the mat", 600)),
            DocumentText::new("b.txt", repeat_words("quantum entanglement explained", 300)),
        ];
        IndexRegistry::build(&documents, provider, 500).await.unwrap()
    }

    #[tokio::test]
    async fn test_example_scenario_ranks_matching_document_first() {
        let provider = LexicalProvider::new(384);
        let registry = build_example_registry(&provider).await;

        assert_eq!(registry.get("a.txt").unwrap().chunks.len(), 2);
        assert_eq!(registry.get("b.txt").unwrap().chunks.len(), 1);

        let results = retrieve("cat mat", &provider, &registry, &RetrievalOptions::new(3))
            .await
            .unwrap();

        assert_eq!(results.len(), 3, "corpus holds 3 chunks in total");
        assert_eq!(results[0].document, "a.txt");
        assert_eq!(results[1].document, "a.txt");
        assert_eq!(results[2].document, "b.txt");

        for pair in results.windows(2) {
            assert!(
                pair[0].distance <= pair[1].distance,
                "distances should ascend: {} <= {}",
                pair[0].distance,
                pair[1].distance
            );
        }
    }

    #[tokio::test]
    async fn test_self_match_has_zero_distance() {
        let provider = LexicalProvider::new(384);
        let documents = vec![DocumentText::new(
            "short.txt",
            "alpha beta gamma delta epsilon zeta",
        )];
        let registry = IndexRegistry::build(&documents, &provider, 3).await.unwrap();

        let entry = registry.get("short.txt").unwrap();
        assert_eq!(entry.chunks.len(), 2);

        // Querying with a chunk's own text must find that chunk at
        // distance zero: the provider is deterministic
        let query = entry.chunks[1].clone();
        let results = retrieve(&query, &provider, &registry, &RetrievalOptions::new(1))
            .await
            .unwrap();

        assert_eq!(results[0].position, 1);
        assert_eq!(results[0].distance, 0.0);
    }

    #[tokio::test]
    async fn test_top_k_is_monotone() {
        let provider = LexicalProvider::new(384);
        let registry = build_example_registry(&provider).await;

        let one = retrieve("cat mat", &provider, &registry, &RetrievalOptions::new(1))
            .await
            .unwrap();
        let three = retrieve("cat mat", &provider, &registry, &RetrievalOptions::new(3))
            .await
            .unwrap();

        assert_eq!(one.len(), 1);
        assert_eq!(three.len(), 3);
        assert_eq!(one[0].document, three[0].document);
        assert_eq!(one[0].position, three[0].position);
        assert_eq!(one[0].distance, three[0].distance);
    }

    #[tokio::test]
    async fn test_retrieval_is_deterministic() {
        let provider = LexicalProvider::new(384);

        let first_registry = build_example_registry(&provider).await;
        let second_registry = build_example_registry(&provider).await;

        let options = RetrievalOptions::new(3);
        let first = retrieve("cat mat", &provider, &first_registry, &options)
            .await
            .unwrap();
        let second = retrieve("cat mat", &provider, &second_registry, &options)
            .await
            .unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.document, b.document);
            assert_eq!(a.position, b.position);
            assert_eq!(a.distance, b.distance);
            assert_eq!(a.text, b.text);
        }
    }

    #[tokio::test]
    async fn test_k_zero_returns_nothing() {
        let provider = LexicalProvider::new(384);
        let registry = build_example_registry(&provider).await;

        let results = retrieve("cat mat", &provider, &registry, &RetrievalOptions::new(0))
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_registry_returns_nothing() {
        let provider = LexicalProvider::new(384);
        let registry = IndexRegistry::build(&[], &provider, 500).await.unwrap();

        let results = retrieve("cat mat", &provider, &registry, &RetrievalOptions::new(3))
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_small_corpus_returns_fewer_than_k() {
        let provider = LexicalProvider::new(384);
        let documents = vec![DocumentText::new("tiny.txt", "just one chunk here")];
        let registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();

        let results = retrieve("chunk", &provider, &registry, &RetrievalOptions::new(10))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_local_k_caps_per_document_candidates() {
        let provider = LexicalProvider::new(384);
        let registry = build_example_registry(&provider).await;

        // With one candidate per document the pool holds two entries
        // even though top_k asks for three
        let options = RetrievalOptions::new(3).with_local_k(1);
        let results = retrieve("cat mat", &provider, &registry, &options)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        let from_a = results.iter().filter(|r| r.document == "a.txt").count();
        assert_eq!(from_a, 1, "local_k=1 allows one candidate per document");
    }

    #[tokio::test]
    async fn test_equal_distances_keep_registry_order() {
        let provider = LexicalProvider::new(384);

        // Identical text in both documents embeds identically, so both
        // chunks sit at the same distance from any query
        let documents = vec![
            DocumentText::new("first.txt", "identical chunk text"),
            DocumentText::new("second.txt", "identical chunk text"),
        ];
        let registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();

        let results = retrieve(
            "identical chunk text",
            &provider,
            &registry,
            &RetrievalOptions::new(2),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].distance, results[1].distance);
        assert_eq!(results[0].document, "first.txt");
        assert_eq!(results[1].document, "second.txt");
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_fails_the_query() {
        let provider = LexicalProvider::new(384);
        let registry = build_example_registry(&provider).await;

        // A provider with a different dimension breaks the shared
        // vector space; the query must fail loudly, not silently skip
        let narrow = LexicalProvider::new(16);
        let result = retrieve("cat mat", &narrow, &registry, &RetrievalOptions::new(3)).await;

        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("dimension"), "unexpected error: {}", message);
    }
}
