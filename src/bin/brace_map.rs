//! Brace Map Command Line Interface
//!
//! Runs the completion → graph pipeline over a saved model response.
//!
//! # Usage
//!
//! ```bash
//! # Lay out a saved completion (LR by default)
//! brace_map render --file response.txt
//!
//! # Top-to-bottom, with a config file
//! cat response.txt | brace_map render --direction TB --config layout.yaml
//!
//! # Only check that a response parses
//! brace_map check --file response.txt
//!
//! # Print the prompt that would be sent for an idea
//! brace_map prompt "A booking app for airport transfers"
//! ```

use anyhow::{anyhow, Context, Result};
use brace_map::{
    build_prompt, palette, sanitize, Direction, GeneratedMap, MapPipeline, ParseError,
    PipelineConfig, ProviderKind,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "brace_map")]
#[command(version)]
#[command(about = "Turn model completions into laid-out idea maps")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json or text
    #[arg(long, short = 'o', global = true, default_value = "json", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize, validate, flatten, and lay out a completion
    Render {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Layout direction: LR or TB (overrides the config file)
        #[arg(short, long)]
        direction: Option<Direction>,

        /// Pipeline config (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Provider name recorded in diagnostics (default: detected from API keys)
        #[arg(short, long, env = "BRACE_MAP_PROVIDER")]
        provider: Option<String>,
    },

    /// Sanitize and validate only
    Check {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Pipeline config (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the generation prompt for an idea
    Prompt {
        /// The idea to map
        idea: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brace_map=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            file,
            direction,
            config,
            provider,
        } => cmd_render(file, direction, config, provider, cli.format),
        Commands::Check { file, config } => cmd_check(file, config, cli.format),
        Commands::Prompt { idea } => cmd_prompt(&idea),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_render(
    file: Option<PathBuf>,
    direction: Option<Direction>,
    config: Option<PathBuf>,
    provider: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let raw = read_input(file)?;
    let mut config = load_config(config)?;
    if let Some(direction) = direction {
        config.layout.direction = direction;
    }
    let provider = provider_name(provider);

    let pipeline = MapPipeline::new(config);
    let map = pipeline
        .parse(&raw, &provider)
        .map_err(|e| report_parse_error(e, format))?;
    let graph = pipeline.graph(&map)?;
    let generated = GeneratedMap { map, graph };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&generated)?),
        OutputFormat::Text => print_summary(&generated),
    }
    Ok(())
}

fn cmd_check(file: Option<PathBuf>, config: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let raw = read_input(file)?;
    let pipeline = MapPipeline::new(load_config(config)?);
    let provider = provider_name(None);

    let map = pipeline
        .parse(&raw, &provider)
        .map_err(|e| report_parse_error(e, format))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "valid": true,
                "nodes": map.root.node_count(),
                "levels": map.root.height(),
                "complexity": map.complexity,
            })
        ),
        OutputFormat::Text => println!(
            "valid: {} nodes, {} levels, complexity {}",
            map.root.node_count(),
            map.root.height(),
            map.complexity
        ),
    }
    Ok(())
}

fn cmd_prompt(idea: &str) -> Result<()> {
    if idea.trim().is_empty() {
        return Err(anyhow!("Idea is required"));
    }
    println!("{}", build_prompt(idea));
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            if io::stdin().is_terminal() {
                return Err(anyhow!(
                    "No input provided. Use --file or pipe input via stdin."
                ));
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(&path),
        None => Ok(PipelineConfig::default()),
    }
}

fn provider_name(explicit: Option<String>) -> String {
    explicit
        .or_else(|| ProviderKind::detect().map(|k| k.name().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Print the diagnostic for a rejected completion and turn it into the exit error.
fn report_parse_error(e: ParseError, format: OutputFormat) -> anyhow::Error {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "error": "Failed to parse AI response as JSON",
                "kind": e.code(),
                "detail": e.detail,
                "provider": e.provider,
                "raw": e.raw,
            })
        ),
        OutputFormat::Text => {
            eprintln!("--- raw response ---");
            eprintln!("{}", e.raw);
            eprintln!("--- sanitized ---");
            eprintln!("{}", sanitize(&e.raw));
        }
    }
    anyhow::Error::new(e)
}

fn print_summary(generated: &GeneratedMap) {
    let graph = &generated.graph;
    let bounds = graph.bounds();
    println!(
        "{} nodes, {} edges, complexity {}, direction {}, canvas {:.0} x {:.0}",
        graph.len(),
        graph.edges().len(),
        generated.map.complexity,
        graph.direction(),
        bounds.width,
        bounds.height
    );
    for node in graph.nodes() {
        let color = palette::node_style(node.branch_index).border;
        let first_line = node.label.lines().next().unwrap_or("");
        println!(
            "{:indent$}{} [{}] rank {} order {} at ({:.0}, {:.0}) {}",
            "",
            node.id,
            color,
            node.rank,
            node.order,
            node.position.x,
            node.position.y,
            first_line,
            indent = node.depth * 2
        );
    }
}
