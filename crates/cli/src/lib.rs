use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use context_code_compressor::{CompressionStats, Compressor, CompressorConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod ingest;
mod limits;
mod render;
mod walk;

pub use ingest::{FileEntry, FileIngestor, FormatOptions, Ingested, LanguageCompressor};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "context-compress")]
#[command(about = "Pack source files into LLM context, optionally compressed", long_about = None)]
#[command(version)]
struct Cli {
    /// Files or directories to include
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Keep declarations and signatures, replace function bodies with placeholders
    #[arg(short, long)]
    compress: bool,

    /// Prefix lines of uncompressed files with line numbers
    #[arg(short = 'l', long)]
    line_number: bool,

    /// Do not wrap uncompressed files in fenced code blocks
    #[arg(long)]
    no_codeblock: bool,

    /// Output a JSON array instead of markdown
    #[arg(long)]
    json: bool,

    /// Follow symbolic links while walking directories
    #[arg(long)]
    follow_symlinks: bool,

    /// Files processed in parallel (overrides CONTEXT_COMPRESS_JOBS)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Compressor configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let compressor = if cli.compress {
        Some(build_compressor(cli.config.as_deref())?)
    } else {
        None
    };

    let files = walk::collect_files(&cli.paths, cli.follow_symlinks)?;
    let jobs = limits::resolve_jobs(cli.jobs);
    log::debug!("Ingesting {} files with {jobs} parallel jobs", files.len());

    let ingestor = Arc::new(FileIngestor::new(
        compressor,
        FormatOptions {
            line_numbers: cli.line_number,
            code_block: !cli.no_codeblock,
        },
    ));
    let ingested = ingestor.ingest_all(files, jobs).await?;
    log_summary(&ingested);

    let entries: Vec<FileEntry> = ingested.into_iter().map(|item| item.entry).collect();
    let output = if cli.json {
        render::render_json(&entries)?
    } else {
        render::render_markdown(&entries)
    };
    print_stdout(&output)
}

fn build_compressor(config_path: Option<&Path>) -> Result<Compressor> {
    let config = match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            CompressorConfig::from_toml_str(&raw)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => CompressorConfig::default(),
    };
    Compressor::new(config).context("Failed to create compressor")
}

fn log_summary(ingested: &[Ingested]) {
    let mut total = CompressionStats::default();
    let mut compressed = 0usize;
    for stats in ingested.iter().filter_map(|item| item.stats) {
        total.add(stats);
        compressed += 1;
    }
    if compressed == 0 {
        return;
    }
    log::info!(
        "Compressed {compressed} of {} files: {} -> {} bytes ({:.1}%)",
        ingested.len(),
        total.original_bytes,
        total.compressed_bytes,
        total.ratio() * 100.0
    );
}
