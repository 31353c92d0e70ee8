use crate::error::{LectureSplitError, Result};
use crate::types::{section_file_stem, Section, DOCUMENT_EXTENSION};
use lopdf::Document;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub struct DocumentSplitter;

impl DocumentSplitter {
    pub async fn split(
        source: &Path,
        sections: &[Section],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        info!(
            "Splitting '{}' into {} sections",
            source.display(),
            sections.len()
        );

        if !source.is_file() {
            return Err(LectureSplitError::FileNotFound {
                path: source.display().to_string(),
            });
        }

        let document = Document::load(source)?;
        let total_pages = document.get_pages().len();

        // Check every range before writing anything
        Self::validate_ranges(sections, total_pages)?;

        Self::ensure_output_directory(output_dir).await?;

        let mut output_files = Vec::with_capacity(sections.len());
        let mut written_pages = 0;

        for (idx, section) in sections.iter().enumerate() {
            let bytes = Self::extract_range(&document, section.start_page, section.end_page)?;
            let output_file = Self::output_filename(output_dir, idx);

            fs::write(&output_file, bytes).await.map_err(|e| {
                LectureSplitError::OutputDirectory {
                    reason: format!(
                        "Failed to write section file {}: {}",
                        output_file.display(),
                        e
                    ),
                }
            })?;

            written_pages += section.page_count();
            debug!(
                "Created {} with {} pages (pages {}-{})",
                output_file.display(),
                section.page_count(),
                section.start_page,
                section.end_page
            );
            output_files.push(output_file);
        }

        info!(
            "Wrote {} section files covering {} of {} pages",
            output_files.len(),
            written_pages,
            total_pages
        );

        Ok(output_files)
    }

    fn validate_ranges(sections: &[Section], total_pages: usize) -> Result<()> {
        for (idx, section) in sections.iter().enumerate() {
            if section.start_page == 0
                || section.end_page < section.start_page
                || section.end_page > total_pages
            {
                return Err(LectureSplitError::InvalidRange {
                    section: idx + 1,
                    start_page: section.start_page,
                    end_page: section.end_page,
                    total_pages,
                });
            }
        }
        Ok(())
    }

    fn extract_range(source: &Document, start_page: usize, end_page: usize) -> Result<Vec<u8>> {
        // Pages are 1-based here, as in the plan
        let mut section_doc = source.clone();

        let unwanted: Vec<u32> = section_doc
            .get_pages()
            .keys()
            .copied()
            .filter(|&number| {
                let number = number as usize;
                number < start_page || number > end_page
            })
            .collect();

        section_doc.delete_pages(&unwanted);
        // Drop fonts and images only the deleted pages used
        section_doc.prune_objects();
        section_doc.renumber_objects();

        let mut bytes = Vec::new();
        section_doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    async fn ensure_output_directory(output_dir: &Path) -> Result<()> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).await.map_err(|e| {
                LectureSplitError::OutputDirectory {
                    reason: format!("Failed to create output directory: {}", e),
                }
            })?;
            info!("Created output directory: {}", output_dir.display());
        }
        Ok(())
    }

    pub fn output_filename(output_dir: &Path, index: usize) -> PathBuf {
        output_dir.join(format!("{}.{}", section_file_stem(index), DOCUMENT_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{numbered_pages, page_count, write_pdf};
    use tempfile::TempDir;

    fn section(start_page: usize, end_page: usize) -> Section {
        Section {
            title: format!("Pages {}-{}", start_page, end_page),
            start_page,
            end_page,
            summary: String::new(),
        }
    }

    fn source_pdf(dir: &TempDir, pages: usize) -> PathBuf {
        let texts = numbered_pages(pages);
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        write_pdf(dir.path(), "lecture.pdf", &refs)
    }

    #[tokio::test]
    async fn test_split_page_counts_and_names() {
        let dir = TempDir::new().unwrap();
        let source = source_pdf(&dir, 6);
        let output_dir = dir.path().join("sections");
        let sections = vec![section(1, 2), section(3, 5), section(6, 6)];

        let outputs = DocumentSplitter::split(&source, &sections, &output_dir)
            .await
            .unwrap();

        let names: Vec<String> = outputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["section-01.pdf", "section-02.pdf", "section-03.pdf"]);

        let counts: Vec<usize> = outputs.iter().map(|p| page_count(p)).collect();
        assert_eq!(counts, vec![2, 3, 1]);
        assert_eq!(counts.iter().sum::<usize>(), 6);
    }

    #[tokio::test]
    async fn test_split_preserves_page_order() {
        let dir = TempDir::new().unwrap();
        let source = source_pdf(&dir, 4);
        let output_dir = dir.path().join("out");

        let outputs = DocumentSplitter::split(&source, &[section(1, 1), section(2, 4)], &output_dir)
            .await
            .unwrap();

        let doc = Document::load(&outputs[1]).unwrap();
        let first = doc.extract_text(&[1]).unwrap();
        let last = doc.extract_text(&[3]).unwrap();
        assert!(first.contains("Slide 2"));
        assert!(last.contains("Slide 4"));
    }

    #[tokio::test]
    async fn test_split_creates_nested_output_directory() {
        let dir = TempDir::new().unwrap();
        let source = source_pdf(&dir, 2);
        let output_dir = dir.path().join("a").join("b").join("c");

        let outputs = DocumentSplitter::split(&source, &[section(1, 2)], &output_dir)
            .await
            .unwrap();

        assert!(output_dir.is_dir());
        assert_eq!(outputs, vec![output_dir.join("section-01.pdf")]);
    }

    #[tokio::test]
    async fn test_split_rejects_range_past_end() {
        let dir = TempDir::new().unwrap();
        let source = source_pdf(&dir, 3);
        let output_dir = dir.path().join("out");

        let result =
            DocumentSplitter::split(&source, &[section(1, 2), section(3, 4)], &output_dir).await;

        match result {
            Err(LectureSplitError::InvalidRange {
                section,
                end_page,
                total_pages,
                ..
            }) => {
                assert_eq!(section, 2);
                assert_eq!(end_page, 4);
                assert_eq!(total_pages, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!output_dir.join("section-01.pdf").exists());
    }

    #[tokio::test]
    async fn test_split_rejects_zero_and_inverted_ranges() {
        let dir = TempDir::new().unwrap();
        let source = source_pdf(&dir, 3);
        let output_dir = dir.path().join("out");

        for sections in [vec![section(0, 3)], vec![section(3, 2)]] {
            let result = DocumentSplitter::split(&source, &sections, &output_dir).await;
            assert!(matches!(result, Err(LectureSplitError::InvalidRange { .. })));
        }
    }

    #[tokio::test]
    async fn test_split_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = DocumentSplitter::split(
            &dir.path().join("gone.pdf"),
            &[section(1, 1)],
            &dir.path().join("out"),
        )
        .await;
        assert!(matches!(result, Err(LectureSplitError::FileNotFound { .. })));
    }
}
