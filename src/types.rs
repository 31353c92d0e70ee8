use crate::error::{LectureSplitError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File extension of the split section documents.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// File extension of the per-section preambles.
pub const PREAMBLE_EXTENSION: &str = "md";

pub const MANIFEST_FILENAME: &str = "manifest.md";
pub const PLAN_FILENAME: &str = "plan.json";

/// Text of one source page, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub start_page: usize,
    pub end_page: usize,
    pub summary: String,
}

impl Section {
    pub fn page_count(&self) -> usize {
        if self.end_page < self.start_page {
            0
        } else {
            (self.end_page - self.start_page).saturating_add(1)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturePlan {
    pub lecture_title: String,
    pub sections: Vec<Section>,
}

impl LecturePlan {
    /// Number of pages the plan claims to cover.
    pub fn total_pages(&self) -> usize {
        self.sections
            .iter()
            .map(Section::page_count)
            .fold(0, usize::saturating_add)
    }

    /// Checks that the sections form a contiguous partition of `1..=total_pages`.
    pub fn validate(&self, total_pages: usize) -> Result<()> {
        let invalid = |reason: String| Err(LectureSplitError::InvalidPlan { reason });

        let (first, last) = match (self.sections.first(), self.sections.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return invalid("plan contains no sections".to_string()),
        };

        if first.start_page != 1 {
            return invalid(format!(
                "first section '{}' starts at page {} instead of 1",
                first.title, first.start_page
            ));
        }

        for (idx, section) in self.sections.iter().enumerate() {
            if section.end_page < section.start_page {
                return invalid(format!(
                    "section {} '{}' has an empty range {}-{}",
                    idx + 1,
                    section.title,
                    section.start_page,
                    section.end_page
                ));
            }
            // Engine-supplied bounds; reject before any arithmetic on them.
            if section.end_page > total_pages {
                return invalid(format!(
                    "section {} '{}' ends at page {} but the document has {} pages",
                    idx + 1,
                    section.title,
                    section.end_page,
                    total_pages
                ));
            }
        }

        for (idx, pair) in self.sections.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.end_page.checked_add(1) != Some(next.start_page) {
                return invalid(format!(
                    "section {} starts at page {} but section {} ends at page {}",
                    idx + 2,
                    next.start_page,
                    idx + 1,
                    prev.end_page
                ));
            }
        }

        if last.end_page != total_pages {
            return invalid(format!(
                "last section '{}' ends at page {} but the document has {} pages",
                last.title, last.end_page, total_pages
            ));
        }

        Ok(())
    }
}

/// File stem shared by a section's split document and its preamble,
/// e.g. `section-03` for the third section.
pub fn section_file_stem(index: usize) -> String {
    format!("section-{:02}", index + 1)
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub model: String,
    pub force: bool,
    pub write_plan_json: bool,
}

/// Everything a caller needs to report on a finished run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub page_count: usize,
    pub plan: LecturePlan,
    pub document_paths: Vec<PathBuf>,
    pub preamble_paths: Vec<PathBuf>,
    pub preambles: Vec<String>,
    pub manifest: String,
    pub manifest_path: PathBuf,
    pub plan_path: Option<PathBuf>,
}

impl PipelineOutput {
    pub fn lecture_title(&self) -> &str {
        &self.plan.lecture_title
    }

    pub fn section_count(&self) -> usize {
        self.plan.sections.len()
    }
}
