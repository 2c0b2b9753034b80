//! Scripture CLI - one-shot search over a scripture document feed
//!
//! Loads a JSON document feed produced by the acquisition
//! collaborator, builds the corpus in memory, and runs a single
//! query or prints corpus statistics. Use this for scripting and
//! manual checks; it is deliberately not an interactive loop.
//!
//! # Examples
//!
//! ```bash
//! # Search a corpus feed
//! scripture search "mindfulness of breathing" --corpus suttas.json -k 5
//!
//! # Corpus statistics as JSON
//! scripture stats --corpus suttas.json --format json
//! ```

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use scripture_search::{Config, Document, Result, ScriptureError, SearchEngine};

/// Scripture Search - BM25 search over scripture passages
#[derive(Parser, Debug)]
#[command(name = "scripture")]
#[command(version)]
#[command(about = "BM25 search over scripture passages", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: OutputFormat,

    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "SCRIPTURE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the corpus with BM25 ranking
    Search(SearchArgs),

    /// Show corpus build statistics
    Stats(StatsArgs),
}

/// Arguments for the search command
#[derive(Args, Debug)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Path to the JSON document feed
    #[arg(long, short = 'c')]
    corpus: PathBuf,

    /// Maximum number of results
    #[arg(long, short = 'k')]
    limit: Option<usize>,
}

/// Arguments for the stats command
#[derive(Args, Debug)]
struct StatsArgs {
    /// Path to the JSON document feed
    #[arg(long, short = 'c')]
    corpus: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.merge_env();
            config.validate()?;
            config
        }
        None => Config::load()?,
    };

    match cli.command {
        Commands::Search(args) => search(args, config, cli.format),
        Commands::Stats(args) => stats(args, config, cli.format),
    }
}

/// Load the document feed and build the engine
fn build_engine(corpus: &Path, config: Config) -> Result<(SearchEngine, scripture_search::BuildReport)> {
    let contents = fs::read_to_string(corpus)?;
    let documents: Vec<Document> = serde_json::from_str(&contents)?;

    if documents.is_empty() {
        return Err(ScriptureError::EmptyCorpus(format!(
            "no documents in feed {}",
            corpus.display()
        )));
    }

    let mut engine = SearchEngine::new(config)?;
    let report = engine.build_corpus(documents)?;
    Ok((engine, report))
}

fn search(args: SearchArgs, config: Config, format: OutputFormat) -> Result<()> {
    let (engine, _report) = build_engine(&args.corpus, config)?;
    let response = engine.search(&args.query, args.limit)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Human => {
            if response.results.is_empty() {
                println!("No results found for '{}'", args.query.bold());
                return Ok(());
            }

            println!(
                "Found {} result(s) for '{}':\n",
                response.count.to_string().green(),
                args.query.bold()
            );
            for (rank, result) in response.results.iter().enumerate() {
                println!(
                    "[{}] {} {} (score {:.3})",
                    rank + 1,
                    result.collection.cyan(),
                    result.title.bold(),
                    result.score
                );
                println!("    {}", result.source_url.dimmed());
                println!("    {}\n", result.text);
            }
        }
    }

    Ok(())
}

fn stats(args: StatsArgs, config: Config, format: OutputFormat) -> Result<()> {
    let (engine, report) = build_engine(&args.corpus, config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => {
            println!("Corpus: {}", args.corpus.display().to_string().bold());
            println!("  Documents ingested:  {}", report.documents_ingested);
            println!("  Documents skipped:   {}", report.documents_skipped.len());
            for skipped in &report.documents_skipped {
                println!(
                    "    - position {}: {}",
                    skipped.position,
                    skipped.reason.yellow()
                );
            }
            println!("  Duplicates dropped:  {}", report.duplicates_dropped);
            println!("  Chunks created:      {}", report.chunks_created);
            println!("  Chunk size/overlap:  {}/{}", engine.config().chunking.chunk_size, engine.config().chunking.overlap);
            println!("  Build time:          {}ms", report.duration_ms);
        }
    }

    Ok(())
}
