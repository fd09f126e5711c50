//! Source file parsing and text extraction.
//!
//! Turns article files into raw text. Plain text and markdown are read
//! directly, PDFs go through the `pdftotext` tool, and binary-looking
//! content is rejected at this boundary.

use scholar_core::{AppError, AppResult};
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    PlainText,
    Markdown,
    Pdf,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") | Some("text") => Self::PlainText,
            Some("md") | Some("markdown") => Self::Markdown,
            Some("pdf") => Self::Pdf,
            _ => Self::Unknown,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::Unknown => "unknown",
        }
    }
}

/// Whether a path carries a recognized article extension.
///
/// Directory walks and archive expansion use this to pass over build
/// artifacts and other non-article files without a diagnostic.
pub fn is_supported(path: &Path) -> bool {
    ContentType::from_path(path) != ContentType::Unknown
}

/// Extract raw text from an article file on disk.
pub fn extract_file(path: &Path) -> AppResult<String> {
    let content_type = ContentType::from_path(path);
    tracing::debug!("Extracting {:?} as {}", path, content_type.as_str());

    if content_type == ContentType::Pdf {
        return pdf_to_text(path);
    }

    let raw = std::fs::read(path)
        .map_err(|e| AppError::Corpus(format!("Failed to read {:?}: {}", path, e)))?;

    clean_payload(&String::from_utf8_lossy(&raw), content_type)
}

/// Extract raw text from an in-memory payload (archive members).
///
/// `name` determines the content type. PDF payloads are spilled to a
/// temporary file because `pdftotext` only reads from disk.
pub fn extract_bytes(name: &str, payload: &[u8]) -> AppResult<String> {
    let content_type = ContentType::from_path(Path::new(name));

    if content_type == ContentType::Pdf {
        let mut spill = tempfile::NamedTempFile::new()?;
        spill.write_all(payload)?;
        return pdf_to_text(spill.path());
    }

    clean_payload(&String::from_utf8_lossy(payload), content_type)
}

/// Run `pdftotext` and capture its stdout.
///
/// A missing tool and a broken PDF both surface as extraction errors;
/// the caller decides whether that skips the document or aborts.
fn pdf_to_text(path: &Path) -> AppResult<String> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| {
            AppError::Corpus(format!(
                "Failed to run pdftotext (is poppler-utils installed?): {}",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::Corpus(format!(
            "pdftotext failed for {:?}: {}",
            path,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Reject binary payloads, then apply per-format cleanup.
fn clean_payload(raw: &str, content_type: ContentType) -> AppResult<String> {
    if !is_likely_text(raw) {
        return Err(AppError::Corpus(
            "binary content not supported".to_string(),
        ));
    }

    match content_type {
        ContentType::Markdown => Ok(clean_markdown(raw)),
        _ => Ok(raw.to_string()),
    }
}

/// Clean markdown by removing excess formatting.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        // Remove markdown headers
        let trimmed = line.trim_start_matches('#').trim();

        // Skip horizontal rules and code fences
        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        if !trimmed.is_empty() {
            result.push_str(trimmed);
            result.push('\n');
        }
    }

    result.trim().to_string()
}

/// Check if text is likely UTF-8 text (not binary).
fn is_likely_text(data: &str) -> bool {
    // Simple heuristic: check for null bytes
    !data.contains('\0')
}
