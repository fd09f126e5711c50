//! Cross-module tests for the retrieval pipeline.

mod ingestion;
mod ranking;
