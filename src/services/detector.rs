use crate::error::{LectureSplitError, Result};
use crate::services::engine::ReasoningEngine;
use crate::types::{LecturePlan, PageText};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

pub const SYSTEM_PROMPT: &str = r#"You are an expert at analyzing lecture slides. Given the text content of each slide, identify logical section boundaries and return a structured JSON response.

You must return ONLY valid JSON with this exact schema:
{
  "lecture_title": "string - the overall lecture title/topic",
  "sections": [
    {
      "title": "string - section title",
      "start_page": int,
      "end_page": int,
      "summary": "string - 1-2 sentence summary of what this section covers"
    }
  ]
}

Rules:
- Every slide page must belong to exactly one section (no gaps, no overlaps)
- Sections must be contiguous (start_page of section N+1 = end_page of section N + 1)
- Group slides by conceptual topic, not by individual slide
- Aim for 3-8 sections for a typical lecture
- The first section's start_page must be 1
- The last section's end_page must equal the total number of slides"#;

/// Asks a reasoning engine to partition slide pages into titled sections.
pub struct SectionDetector {
    engine: Arc<dyn ReasoningEngine>,
    fence_pattern: Regex,
}

impl SectionDetector {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Result<Self> {
        let fence_pattern = Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n```").map_err(|e| {
            LectureSplitError::MalformedResponse {
                reason: format!("invalid fence pattern: {}", e),
            }
        })?;

        Ok(Self {
            engine,
            fence_pattern,
        })
    }

    pub async fn detect(&self, pages: &[PageText], model: &str) -> Result<LecturePlan> {
        // Fail before the engine is ever invoked.
        if pages.is_empty() {
            return Err(LectureSplitError::EmptyInput);
        }

        info!("Detecting sections across {} pages", pages.len());

        let input = Self::build_task_input(pages);
        let raw = self.engine.run(SYSTEM_PROMPT, &input, model).await?;

        let plan = self.parse_response(&raw)?;

        // Structural parse alone does not guarantee a partition.
        plan.validate(pages.len())?;

        debug!(
            "Engine proposed {} sections for '{}'",
            plan.sections.len(),
            plan.lecture_title
        );
        Ok(plan)
    }

    pub fn build_task_input(pages: &[PageText]) -> String {
        let body = pages
            .iter()
            .map(|page| {
                // NUL is not valid in the engine transport.
                let text = page.text.replace('\0', "");
                format!("--- SLIDE {} ---\n{}", page.page_number, text)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "Analyze these {} lecture slides and identify logical sections:\n\n{}",
            pages.len(),
            body
        )
    }

    pub fn parse_response(&self, raw: &str) -> Result<LecturePlan> {
        // The engine may wrap its JSON in a ``` or ```json fence
        let payload = self.strip_fence(raw.trim());

        serde_json::from_str(payload).map_err(|e| LectureSplitError::MalformedResponse {
            reason: e.to_string(),
        })
    }

    fn strip_fence<'a>(&self, raw: &'a str) -> &'a str {
        self.fence_pattern
            .captures(raw)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(raw)
    }
}
