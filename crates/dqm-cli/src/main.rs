//! dqmcmp: compare a DQM run against a reference run.

use anyhow::{Context, Result};
use clap::Parser;
use dqm_compare::{CompareContext, DqmConfig, RunId, pipeline, select};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dqmcmp")]
#[command(about = "Compare DQM histograms of a run against a reference run")]
#[command(version)]
struct Cli {
    /// Current run DQM file (run id taken from the last 6 characters before `.root`)
    current: PathBuf,

    /// Reference run DQM file
    reference: PathBuf,

    /// YAML configuration (selection, output, plot)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Figure output directory; wiped at start. Overrides the config.
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// KS score table (pretty JSON). Overrides the config.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Current run id, instead of deriving it from the file name
    #[arg(long)]
    run_id: Option<String>,

    /// Reference run id, instead of deriving it from the file name
    #[arg(long)]
    ref_run_id: Option<String>,

    /// Skip figures; compute KS scores only
    #[arg(long)]
    no_plots: bool,

    /// Threads (0 = auto). Use 1 for sequential processing.
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.threads > 0 {
        // Best-effort; if a global pool already exists, keep going.
        let _ = rayon::ThreadPoolBuilder::new().num_threads(cli.threads).build_global();
    }

    let mut config = match &cli.config {
        Some(path) => DqmConfig::load(path)?,
        None => DqmConfig::default(),
    };
    if let Some(dir) = &cli.images_dir {
        config.output.images_dir = dir.clone();
    }
    if let Some(out) = &cli.output {
        config.output.scores_file = out.clone();
    }

    let run = cli.run_id.as_deref().map(RunId::parse).transpose()?;
    let ref_run = cli.ref_run_id.as_deref().map(RunId::parse).transpose()?;

    let mut ctx = CompareContext::open(&cli.current, &cli.reference, run, ref_run, &config)
        .context("failed to open input files")?;
    if cli.no_plots {
        ctx = ctx.without_plots();
    } else {
        reset_dir(&ctx.images_dir)?;
    }

    let paths = select::select(&ctx.current, &config.selection);
    let table = pipeline::run(&ctx, &paths);

    let json = table.to_json_pretty()?;
    println!("{json}");
    table.write_json(&config.output.scores_file)?;
    tracing::info!(
        path = %config.output.scores_file.display(),
        entries = table.len(),
        "scores written"
    );
    Ok(())
}

/// Remove `dir` with everything under it, then create it empty.
fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}
