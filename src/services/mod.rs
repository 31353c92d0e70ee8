pub mod context;
pub mod detector;
pub mod engine;
pub mod extractor;
pub mod pipeline;
pub mod splitter;

pub use context::ContextGenerator;
pub use detector::SectionDetector;
pub use engine::{AnthropicApiEngine, ClaudeCliEngine, ReasoningEngine};
pub use extractor::PageExtractor;
pub use pipeline::LecturePipeline;
pub use splitter::DocumentSplitter;
