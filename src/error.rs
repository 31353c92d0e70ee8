use thiserror::Error;

#[derive(Error, Debug)]
pub enum LectureSplitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot detect sections from an empty page list")]
    EmptyInput,

    #[error("Reasoning engine failed: {reason}")]
    Engine { reason: String },

    #[error("Malformed engine response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Invalid lecture plan: {reason}")]
    InvalidPlan { reason: String },

    #[error(
        "Section {section} covers pages {start_page}-{end_page}, but the document has {total_pages} pages"
    )]
    InvalidRange {
        section: usize,
        start_page: usize,
        end_page: usize,
        total_pages: usize,
    },

    #[error("Section index {index} out of range for a plan with {total} sections")]
    SectionIndex { index: usize, total: usize },

    #[error("Output directory error: {reason}")]
    OutputDirectory { reason: String },
}

pub type Result<T> = std::result::Result<T, LectureSplitError>;
