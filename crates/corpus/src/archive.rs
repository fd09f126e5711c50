//! Archive expansion for bundled article uploads.
//!
//! A `.zip` becomes its member files, each indexed as a separate
//! document under its entry name. macOS resource-fork entries
//! (`__MACOSX/`, `._*`) and empty members carry no article content and
//! are dropped.

use scholar_core::{AppError, AppResult};
use std::io::Read;
use std::path::Path;

/// One usable file pulled out of an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Entry name, including any directory prefix inside the archive
    pub name: String,

    /// Raw member bytes
    pub payload: Vec<u8>,
}

/// Whether a path is an archive this module can expand.
pub fn is_archive(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("zip") | Some("ZIP")
    )
}

/// Expand a ZIP archive into its member files.
///
/// Directories, resource-fork metadata, and zero-byte members are
/// skipped. A corrupt archive is an error; a readable archive with only
/// skippable members yields an empty list.
pub fn expand_zip(path: &Path) -> AppResult<Vec<ArchiveEntry>> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::Corpus(format!("Failed to open archive {:?}: {}", path, e)))?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::Corpus(format!("Failed to read archive {:?}: {}", path, e)))?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut member = archive
            .by_index(i)
            .map_err(|e| AppError::Corpus(format!("Failed to read archive member: {}", e)))?;

        if member.is_dir() {
            continue;
        }

        let name = member.name().to_string();
        if is_metadata_entry(&name) {
            tracing::debug!("Skipping archive metadata entry '{}'", name);
            continue;
        }

        let mut payload = Vec::with_capacity(member.size() as usize);
        member
            .read_to_end(&mut payload)
            .map_err(|e| AppError::Corpus(format!("Failed to extract '{}': {}", name, e)))?;

        if payload.is_empty() {
            tracing::warn!("Skipping empty archive entry '{}'", name);
            continue;
        }

        entries.push(ArchiveEntry { name, payload });
    }

    tracing::debug!("Expanded {:?} into {} entries", path, entries.len());
    Ok(entries)
}

/// macOS zips ship resource forks under `__MACOSX/` and as `._`-prefixed
/// shadow files next to the real members.
fn is_metadata_entry(name: &str) -> bool {
    if name.starts_with("__MACOSX/") {
        return true;
    }
    let basename = name.rsplit('/').next().unwrap_or(name);
    basename.starts_with("._")
}
