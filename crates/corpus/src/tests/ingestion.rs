//! Tests for corpus gathering and end-to-end index builds.

use crate::embeddings::LexicalProvider;
use crate::{collect_documents, index_paths};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_index_paths_walks_a_directory() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "a.txt", b"the cat sat on the mat");
        write_file(&dir, "b.md", b"# Quantum\n\nentanglement explained");
        write_file(&dir, "ignored.log", b"not an article");
        write_file(&dir, ".hidden.txt", b"dotfiles are skipped");

        let provider = LexicalProvider::new(64);
        let registry = index_paths(&[dir.path().to_path_buf()], &provider, 500)
            .await
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("a.txt").is_some());
        assert!(registry.get("b.md").is_some());
        // Unsupported and hidden files vanish without a diagnostic
        assert!(registry.report().skipped.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_file_lands_in_the_report() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "good1.txt", b"first valid article");
        write_file(&dir, "binary.txt", b"looks\x00like\x00a\x00binary");
        write_file(&dir, "good2.txt", b"second valid article");

        let provider = LexicalProvider::new(64);
        let registry = index_paths(&[dir.path().to_path_buf()], &provider, 500)
            .await
            .unwrap();

        assert_eq!(registry.len(), 2, "valid files should still be indexed");
        assert_eq!(registry.report().skipped.len(), 1);
        assert_eq!(registry.report().skipped[0].name, "binary.txt");
        assert!(registry.report().skipped[0].reason.contains("binary"));
    }

    #[tokio::test]
    async fn test_missing_path_is_an_error() {
        let provider = LexicalProvider::new(64);
        let result = index_paths(
            &[std::path::PathBuf::from("/nonexistent/corpus")],
            &provider,
            500,
        )
        .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_file_bypasses_extension_filter() {
        let dir = TempDir::new().unwrap();
        // No recognized extension, but passed explicitly
        let path = write_file(&dir, "notes", b"plain text without an extension");

        let collected = collect_documents(&[path]).unwrap();

        assert_eq!(collected.documents.len(), 1);
        assert_eq!(collected.documents[0].name, "notes");
        assert!(collected.unreadable.is_empty());
    }

    #[test]
    fn test_zip_members_become_documents() {
        let dir = TempDir::new().unwrap();
        let zip_path = dir.path().join("bundle.zip");

        let file = std::fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        writer.start_file("one.txt", options).unwrap();
        writer.write_all(b"contents of the first member").unwrap();
        writer.start_file("papers/two.md", options).unwrap();
        writer.write_all(b"# Second\n\nmember body").unwrap();
        writer.start_file("__MACOSX/._one.txt", options).unwrap();
        writer.write_all(b"resource fork").unwrap();
        writer.start_file("skip.log", options).unwrap();
        writer.write_all(b"unsupported member").unwrap();
        writer.finish().unwrap();

        let collected = collect_documents(&[zip_path]).unwrap();

        let names: Vec<&str> = collected.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["one.txt", "papers/two.md"]);
        assert!(collected.unreadable.is_empty());
    }

    #[tokio::test]
    async fn test_zip_and_loose_files_share_one_registry() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "loose.txt", b"a loose article about cats");

        let zip_path = dir.path().join("bundle.zip");
        let file = std::fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("bundled.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"a bundled article about physics").unwrap();
        writer.finish().unwrap();

        let provider = LexicalProvider::new(64);
        let registry = index_paths(
            &[dir.path().join("loose.txt"), zip_path],
            &provider,
            500,
        )
        .await
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("loose.txt").is_some());
        assert!(registry.get("bundled.txt").is_some());
    }
}
