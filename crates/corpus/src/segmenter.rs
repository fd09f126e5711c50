//! Word-exact text segmentation.
//!
//! Documents are cut into consecutive runs of exactly `chunk_size`
//! whitespace-delimited words; the final run keeps whatever remains.
//! Chunk boundaries never look at sentences or paragraphs, so the same
//! input and size always produce the same chunks.

/// Collapse whitespace runs to single spaces and trim the ends.
///
/// Tabs, newlines, and repeated spaces all become one space, which makes
/// word counting stable across source formats.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into chunks of exactly `chunk_size` words.
///
/// Every chunk except possibly the last holds exactly `chunk_size`
/// words; the last holds the remainder. Empty or whitespace-only input
/// yields no chunks. `chunk_size` must be at least 1; the configuration
/// layer enforces this before any segmentation happens.
pub fn segment(text: &str, chunk_size: usize) -> Vec<String> {
    debug_assert!(chunk_size >= 1, "chunk_size must be at least 1");

    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(chunk_size)
        .map(|run| run.join(" "))
        .collect()
}
