use crate::error::{LectureSplitError, Result};
use crate::services::{ContextGenerator, DocumentSplitter, PageExtractor, SectionDetector};
use crate::types::{
    section_file_stem, LecturePlan, PipelineConfig, PipelineOutput, MANIFEST_FILENAME,
    PLAN_FILENAME, PREAMBLE_EXTENSION,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct LecturePipeline;

impl LecturePipeline {
    pub async fn run(
        config: &PipelineConfig,
        detector: &SectionDetector,
    ) -> Result<PipelineOutput> {
        Self::check_output_directory(&config.output_dir, config.force)?;

        let pages = PageExtractor::extract(&config.source)?;
        info!("Found {} pages", pages.len());

        let plan = detector.detect(&pages, &config.model).await?;
        info!(
            "Identified {} sections in \"{}\"",
            plan.sections.len(),
            plan.lecture_title
        );

        // Files written before a failing step are left in place
        let document_paths =
            DocumentSplitter::split(&config.source, &plan.sections, &config.output_dir).await?;

        let preambles = ContextGenerator::generate_all(&plan);
        let mut preamble_paths = Vec::with_capacity(preambles.len());
        for (idx, preamble) in preambles.iter().enumerate() {
            let path = Self::preamble_filename(&config.output_dir, idx);
            Self::write_file(&path, preamble).await?;
            preamble_paths.push(path);
        }

        let manifest = ContextGenerator::generate_manifest(&plan);
        let manifest_path = config.output_dir.join(MANIFEST_FILENAME);
        Self::write_file(&manifest_path, &manifest).await?;

        let plan_path = if config.write_plan_json {
            let path = config.output_dir.join(PLAN_FILENAME);
            Self::write_plan_file(&path, &config.source, pages.len(), &plan).await?;
            Some(path)
        } else {
            None
        };

        Ok(PipelineOutput {
            page_count: pages.len(),
            plan,
            document_paths,
            preamble_paths,
            preambles,
            manifest,
            manifest_path,
            plan_path,
        })
    }

    /// Refuses to reuse a non-empty output directory unless `force` is set,
    /// since section files from another plan would collide by name.
    pub fn check_output_directory(output_dir: &Path, force: bool) -> Result<()> {
        if !output_dir.exists() || force {
            return Ok(());
        }

        let mut entries = std::fs::read_dir(output_dir).map_err(|e| {
            LectureSplitError::OutputDirectory {
                reason: format!("Cannot read output directory: {}", e),
            }
        })?;

        if entries.next().is_some() {
            return Err(LectureSplitError::OutputDirectory {
                reason: format!(
                    "{} is not empty. Use --force to overwrite.",
                    output_dir.display()
                ),
            });
        }
        Ok(())
    }

    /// `<dir>/<stem>_sections` next to the source document.
    pub fn default_output_dir(source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("lecture");
        let parent = source.parent().unwrap_or_else(|| Path::new(""));
        parent.join(format!("{}_sections", stem))
    }

    pub fn preamble_filename(output_dir: &Path, index: usize) -> PathBuf {
        output_dir.join(format!("{}.{}", section_file_stem(index), PREAMBLE_EXTENSION))
    }

    async fn write_file(path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).await.map_err(|e| {
            LectureSplitError::OutputDirectory {
                reason: format!("Failed to write {}: {}", path.display(), e),
            }
        })
    }

    async fn write_plan_file(
        path: &Path,
        source: &Path,
        page_count: usize,
        plan: &LecturePlan,
    ) -> Result<()> {
        let metadata = serde_json::json!({
            "source": source.display().to_string(),
            "page_count": page_count,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "plan": plan,
        });

        let json_content = serde_json::to_string_pretty(&metadata)?;
        Self::write_file(path, &json_content).await?;

        info!("Generated plan file: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ReasoningEngine;
    use crate::test_support::{numbered_pages, page_count, write_pdf};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    const RESPONSE: &str = r#"```json
{
  "lecture_title": "CS229: Machine Learning - Lecture 5",
  "sections": [
    {"title": "Introduction & Review", "start_page": 1, "end_page": 4, "summary": "Course intro and review of linear regression."},
    {"title": "Logistic Regression", "start_page": 5, "end_page": 7, "summary": "Sigmoid function and decision boundaries."},
    {"title": "Gradient Descent Variants", "start_page": 8, "end_page": 10, "summary": "Batch, stochastic, and mini-batch approaches."},
    {"title": "Regularization & Summary", "start_page": 11, "end_page": 12, "summary": "L1/L2 regularization and recap."}
  ]
}
```"#;

    struct FixedEngine(&'static str);

    #[async_trait]
    impl ReasoningEngine for FixedEngine {
        async fn run(&self, _instructions: &str, _input: &str, _model: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn config(dir: &TempDir, pages: usize) -> PipelineConfig {
        let texts = numbered_pages(pages);
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        PipelineConfig {
            source: write_pdf(dir.path(), "cs229_lecture5.pdf", &refs),
            output_dir: dir.path().join("sections"),
            model: "sonnet".to_string(),
            force: false,
            write_plan_json: true,
        }
    }

    fn detector(response: &'static str) -> SectionDetector {
        SectionDetector::new(Arc::new(FixedEngine(response))).unwrap()
    }

    #[tokio::test]
    async fn test_full_pipeline_writes_every_output() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, 12);

        let output = LecturePipeline::run(&config, &detector(RESPONSE)).await.unwrap();

        assert_eq!(output.page_count, 12);
        assert_eq!(output.section_count(), 4);
        assert_eq!(output.lecture_title(), "CS229: Machine Learning - Lecture 5");

        let counts: Vec<usize> = output.document_paths.iter().map(|p| page_count(p)).collect();
        assert_eq!(counts, vec![4, 3, 3, 2]);
        assert_eq!(counts.iter().sum::<usize>(), 12);

        for (idx, path) in output.preamble_paths.iter().enumerate() {
            let written = std::fs::read_to_string(path).unwrap();
            assert_eq!(written, output.preambles[idx]);
        }
        assert_eq!(
            output.preamble_paths[2],
            config.output_dir.join("section-03.md")
        );

        let third = &output.preambles[2];
        assert!(third.contains("Section 3 of 4"));
        assert!(third.contains("Introduction & Review"));
        assert!(third.contains("Logistic Regression"));

        let manifest = std::fs::read_to_string(config.output_dir.join("manifest.md")).unwrap();
        assert_eq!(manifest, output.manifest);
        assert!(manifest.contains("CS229"));

        let plan_json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output.plan_path.unwrap()).unwrap())
                .unwrap();
        assert_eq!(plan_json["page_count"], 12);
        assert_eq!(plan_json["plan"]["sections"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_pipeline_stops_on_invalid_plan() {
        let dir = TempDir::new().unwrap();
        // The fixed response covers 12 pages.
        let config = config(&dir, 10);

        let result = LecturePipeline::run(&config, &detector(RESPONSE)).await;

        assert!(matches!(result, Err(LectureSplitError::InvalidPlan { .. })));
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_pipeline_refuses_non_empty_output_without_force() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir, 12);
        std::fs::create_dir_all(&config.output_dir).unwrap();
        std::fs::write(config.output_dir.join("section-01.pdf"), b"stale").unwrap();

        let result = LecturePipeline::run(&config, &detector(RESPONSE)).await;
        assert!(matches!(result, Err(LectureSplitError::OutputDirectory { .. })));

        config.force = true;
        let output = LecturePipeline::run(&config, &detector(RESPONSE)).await.unwrap();
        assert_eq!(page_count(&output.document_paths[0]), 4);
    }

    #[test]
    fn test_check_output_directory_accepts_missing_or_empty() {
        let dir = TempDir::new().unwrap();
        assert!(LecturePipeline::check_output_directory(&dir.path().join("new"), false).is_ok());
        assert!(LecturePipeline::check_output_directory(dir.path(), false).is_ok());
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            LecturePipeline::default_output_dir(Path::new("/tmp/slides/week3.pdf")),
            PathBuf::from("/tmp/slides/week3_sections")
        );
        assert_eq!(
            LecturePipeline::default_output_dir(Path::new("deck.pdf")),
            PathBuf::from("deck_sections")
        );
    }
}
