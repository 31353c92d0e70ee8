use crate::error::{LectureSplitError, Result};
use crate::types::{section_file_stem, LecturePlan, Section, DOCUMENT_EXTENSION, PREAMBLE_EXTENSION};

pub const TEACHING_PROMPT: &str = "\
You are a tutor helping me work through a lecture, one section at a time. \
I will give you context about where we are in the lecture and attach the \
corresponding slides as a PDF. Your job is to teach me this section.

**Teaching style:**
- Assume high mathematical and technical sophistication. Don't explain basics unless I ask.
- Prioritize conceptual understanding and intuition over restating slide bullet points. I can read the slides myself—your job is to make me *understand* them.
- Use concrete examples or analogies when a concept is abstract or non-obvious.
- Flag common misconceptions or subtle points the slides gloss over.
- If the slides contain errors or imprecise statements, call them out.";

pub const FIRST_SECTION_MARKER: &str = "This is the first section of the lecture.";
pub const PREVIOUS_SECTIONS_HEADING: &str = "### Previous sections covered";
pub const CURRENT_MARKER: &str = "\u{2190} YOU ARE HERE";
pub const COVERED_MARKER: &str = "\u{2713} covered";

/// Renders study preambles and the manifest from a lecture plan. Output is a
/// pure function of its inputs.
pub struct ContextGenerator;

impl ContextGenerator {
    pub fn generate_preamble(plan: &LecturePlan, index: usize) -> Result<String> {
        let current = plan
            .sections
            .get(index)
            .ok_or(LectureSplitError::SectionIndex {
                index,
                total: plan.sections.len(),
            })?;
        Ok(Self::render_preamble(plan, index, current))
    }

    pub fn generate_all(plan: &LecturePlan) -> Vec<String> {
        plan.sections
            .iter()
            .enumerate()
            .map(|(index, current)| Self::render_preamble(plan, index, current))
            .collect()
    }

    pub fn generate_manifest(plan: &LecturePlan) -> String {
        let mut lines = vec![
            format!("# {}", plan.lecture_title),
            String::new(),
            "## System Prompt".to_string(),
            String::new(),
            TEACHING_PROMPT.to_string(),
            String::new(),
            "## Lecture Outline".to_string(),
            String::new(),
        ];

        for (idx, section) in plan.sections.iter().enumerate() {
            lines.push(format!(
                "{}. **{}** ({}): {}",
                idx + 1,
                section.title,
                Self::slide_range(section),
                section.summary
            ));
        }

        lines.push(String::new());
        lines.push("## Files".to_string());
        lines.push(String::new());

        for (idx, section) in plan.sections.iter().enumerate() {
            let stem = section_file_stem(idx);
            lines.push(format!(
                "- `{stem}.{DOCUMENT_EXTENSION}` + `{stem}.{PREAMBLE_EXTENSION}` \u{2014} {}",
                section.title
            ));
        }

        lines.join("\n")
    }

    fn render_preamble(plan: &LecturePlan, index: usize, current: &Section) -> String {
        let mut lines = vec![
            TEACHING_PROMPT.to_string(),
            String::new(),
            "---".to_string(),
            String::new(),
            format!("# Lecture: {}", plan.lecture_title),
            format!(
                "## Section {} of {}: {}",
                index + 1,
                plan.sections.len(),
                current.title
            ),
            format!(
                "### Slides {}\u{2013}{}",
                current.start_page, current.end_page
            ),
            String::new(),
            "### Full Lecture Outline".to_string(),
        ];

        for (idx, section) in plan.sections.iter().enumerate() {
            let range = format!("({})", Self::slide_range(section));
            let line = match idx.cmp(&index) {
                std::cmp::Ordering::Less => {
                    format!("{}. {} {} {}", idx + 1, section.title, range, COVERED_MARKER)
                }
                std::cmp::Ordering::Equal => {
                    format!("{}. **{} {} {}**", idx + 1, section.title, range, CURRENT_MARKER)
                }
                std::cmp::Ordering::Greater => format!("{}. {} {}", idx + 1, section.title, range),
            };
            lines.push(line);
        }
        lines.push(String::new());

        if index == 0 {
            lines.push(FIRST_SECTION_MARKER.to_string());
        } else {
            lines.push(PREVIOUS_SECTIONS_HEADING.to_string());
            for previous in &plan.sections[..index] {
                lines.push(format!("- **{}**: {}", previous.title, previous.summary));
            }
        }
        lines.push(String::new());

        lines.push("### This section covers".to_string());
        lines.push(current.summary.clone());
        lines.push(String::new());
        lines.push(format!(
            "### Attach the corresponding {}.{} when prompting.",
            section_file_stem(index),
            DOCUMENT_EXTENSION
        ));

        lines.join("\n")
    }

    fn slide_range(section: &Section) -> String {
        format!("slides {}\u{2013}{}", section.start_page, section.end_page)
    }
}
