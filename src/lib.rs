//! # Lecture Split Library
//!
//! Splits a lecture slide PDF into topical sections. Page text is extracted,
//! a reasoning engine proposes a contiguous section plan, and each section is
//! written out as its own PDF together with a study preamble and a manifest.
//!
//! ## Example Usage
//!
//! ```no_run
//! use lecture_split::{ClaudeCliEngine, LecturePipeline, PipelineConfig, SectionDetector};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let detector = SectionDetector::new(Arc::new(ClaudeCliEngine::default()))?;
//!
//!     let config = PipelineConfig {
//!         source: PathBuf::from("lecture.pdf"),
//!         output_dir: PathBuf::from("./lecture_sections"),
//!         model: "sonnet".to_string(),
//!         force: false,
//!         write_plan_json: false,
//!     };
//!
//!     let output = LecturePipeline::run(&config, &detector).await?;
//!
//!     println!("Created {} section files", output.document_paths.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::{LectureSplitError, Result};
pub use services::{
    AnthropicApiEngine, ClaudeCliEngine, ContextGenerator, DocumentSplitter, LecturePipeline,
    PageExtractor, ReasoningEngine, SectionDetector,
};
pub use types::{
    section_file_stem, LecturePlan, PageText, PipelineConfig, PipelineOutput, Section,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
