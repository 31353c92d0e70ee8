mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, EngineKind, SplitArgs};
use lecture_split::{
    AnthropicApiEngine, ClaudeCliEngine, LecturePipeline, LectureSplitError, PageExtractor,
    PipelineConfig, ReasoningEngine, Result, SectionDetector,
};
use std::sync::Arc;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Split(args) => handle_split_command(args).await,
        Commands::Analyze(args) => handle_analyze_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn build_engine(args: &SplitArgs) -> Result<Arc<dyn ReasoningEngine>> {
    match args.engine {
        EngineKind::Cli => Ok(Arc::new(ClaudeCliEngine::new(args.claude_bin.clone()))),
        EngineKind::Api => {
            let api_key = args
                .api_key
                .clone()
                .ok_or_else(|| LectureSplitError::Engine {
                    reason: "the api engine needs --api-key or ANTHROPIC_API_KEY".to_string(),
                })?;
            Ok(Arc::new(AnthropicApiEngine::new(api_key, &args.api_base_url)?))
        }
    }
}

async fn handle_split_command(args: &SplitArgs) -> anyhow::Result<()> {
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| LecturePipeline::default_output_dir(&args.pdf_path));

    let config = PipelineConfig {
        source: args.pdf_path.clone(),
        output_dir,
        model: args.model.clone(),
        force: args.force,
        write_plan_json: args.plan_json,
    };

    info!(
        "Splitting {} with model '{}'",
        config.source.display(),
        config.model
    );

    let detector = SectionDetector::new(build_engine(args)?)?;
    let output = LecturePipeline::run(&config, &detector)
        .await
        .with_context(|| format!("Failed to split {}", config.source.display()))?;

    for (idx, section) in output.plan.sections.iter().enumerate() {
        info!(
            "  Section {}: {} (pages {}-{})",
            idx + 1,
            section.title,
            section.start_page,
            section.end_page
        );
    }

    println!("\nDone! Output written to {}/", config.output_dir.display());
    println!("  {} pages in \"{}\"", output.page_count, output.lecture_title());
    println!("  {} section PDFs", output.document_paths.len());
    println!("  {} context preambles", output.preambles.len());
    println!("  1 manifest.md");
    if let Some(plan_path) = &output.plan_path {
        println!("  {}", plan_path.display());
    }
    println!("\nUsage: paste section-XX.md into your AI chat, then attach section-XX.pdf");

    Ok(())
}

async fn handle_analyze_command(args: &AnalyzeArgs) -> anyhow::Result<()> {
    info!("Analyzing: {}", args.pdf_path.display());

    let pages = PageExtractor::extract(&args.pdf_path)?;
    let stats = PageExtractor::page_stats(&pages);

    println!("\n=== Analysis for '{}' ===", args.pdf_path.display());
    println!("Total pages: {}", pages.len());

    if let Some(empty) = stats.get("empty_pages") {
        println!("Pages without text: {}", empty.as_u64().unwrap_or(0));
    }

    if let Some(avg_chars) = stats.get("avg_chars_per_page") {
        println!("Average characters per page: {:.1}", avg_chars.as_f64().unwrap_or(0.0));
    }

    if args.detailed {
        println!("\nPage Details:");
        for page in &pages {
            let preview: String = page
                .text
                .lines()
                .next()
                .unwrap_or("")
                .chars()
                .take(60)
                .collect();
            println!(
                "  Page {}: {} chars | {}",
                page.page_number,
                page.text.chars().count(),
                preview
            );
        }
    }

    if let Some(json_path) = &args.json_output {
        let analysis = serde_json::json!({
            "source": args.pdf_path.display().to_string(),
            "pages": pages,
            "stats": stats,
        });
        let json_content = serde_json::to_string_pretty(&analysis)
            .context("Failed to serialize analysis results")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON analysis file")?;

        info!("Analysis results written to: {}", json_path.display());
    }

    Ok(())
}
