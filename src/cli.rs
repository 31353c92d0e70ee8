use clap::{Args, Parser, Subcommand, ValueEnum};
use lecture_split::services::engine::{DEFAULT_API_BASE_URL, DEFAULT_CLAUDE_PROGRAM};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lecture-split")]
#[command(about = "Split lecture slide PDFs into topical sections with study context")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect sections and write section PDFs, preambles and a manifest
    Split(SplitArgs),

    /// Show extracted page statistics without calling a model
    Analyze(AnalyzeArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Run the `claude` command line tool
    Cli,
    /// Call the Anthropic Messages API
    Api,
}

#[derive(Args)]
pub struct SplitArgs {
    /// Lecture slide PDF
    #[arg(value_name = "PDF")]
    pub pdf_path: PathBuf,

    /// Output directory (default: <pdf_name>_sections/ next to the PDF)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Model alias or full name (e.g. 'sonnet', 'opus', 'haiku')
    #[arg(short, long, default_value = "sonnet")]
    pub model: String,

    /// Reasoning engine used for section detection
    #[arg(long, value_enum, default_value_t = EngineKind::Cli)]
    pub engine: EngineKind,

    /// Path or name of the claude executable
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_CLAUDE_PROGRAM)]
    pub claude_bin: String,

    /// API key for the api engine
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL for the api engine
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Also write plan.json with the detected plan
    #[arg(long)]
    pub plan_json: bool,

    /// Write into a non-empty output directory
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Lecture slide PDF
    #[arg(value_name = "PDF")]
    pub pdf_path: PathBuf,

    /// Output analysis to JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Show per-page text previews
    #[arg(long)]
    pub detailed: bool,
}
