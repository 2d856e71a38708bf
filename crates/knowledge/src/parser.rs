//! PDF text extraction.

use orgdocs_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extract the text of each page of a PDF.
///
/// Extraction runs on a blocking thread. A panic inside the extractor is
/// reported as an error so the caller can skip the file.
pub async fn extract_pdf_pages(path: &Path) -> AppResult<Vec<String>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Index(format!("Failed to read {:?}: {}", path, e)))?;

    let display = path.display().to_string();
    let pages = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .await
        .map_err(|e| AppError::Index(format!("PDF extraction aborted for {}: {}", display, e)))?
        .map_err(|e| AppError::Index(format!("Failed to extract text from {}: {}", display, e)))?;

    tracing::debug!("Extracted {} pages from {:?}", pages.len(), path);

    Ok(pages)
}

/// Whether a path names a PDF file (case-insensitive extension).
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// List the PDFs directly inside a document directory, sorted by path.
///
/// Subdirectories are not descended into. A missing directory yields an
/// empty list.
pub fn discover_pdfs(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!("Document directory {:?} does not exist", dir);
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry under {:?}: {}", dir, err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_pdf(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::write_pdf;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("notes/q1.pdf")));
        assert!(is_pdf(Path::new("notes/Q1.PDF")));
        assert!(!is_pdf(Path::new("notes/q1.txt")));
        assert!(!is_pdf(Path::new("notes/pdf")));
    }

    #[test]
    fn test_discover_pdfs_top_level_only() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("2024")).unwrap();
        fs::write(temp.path().join("b.pdf"), b"x").unwrap();
        fs::write(temp.path().join("a.pdf"), b"x").unwrap();
        fs::write(temp.path().join("readme.txt"), b"x").unwrap();
        fs::write(temp.path().join("2024/c.pdf"), b"x").unwrap();

        let found = discover_pdfs(temp.path());
        let names: Vec<String> = found
            .iter()
            .map(|p| {
                p.strip_prefix(temp.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(discover_pdfs(&temp.path().join("nope")).is_empty());
    }

    #[tokio::test]
    async fn test_extract_pages() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.pdf");
        write_pdf(&path, &["Revenue grew 10% in Q1", "Margins held steady"]);

        let pages = extract_pdf_pages(&path).await.unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Revenue grew 10% in Q1"));
        assert!(pages[1].contains("Margins held steady"));
    }

    #[tokio::test]
    async fn test_extract_garbage_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        fs::write(&path, b"this is not a pdf").unwrap();

        assert!(matches!(
            extract_pdf_pages(&path).await,
            Err(AppError::Index(_))
        ));
    }
}
