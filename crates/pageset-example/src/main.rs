//! pageset-demo - serve pageset templates from stdin.
//!
//! Loads a template configuration, registers the templates, then reads one
//! address per line from stdin and writes each rendered result to stdout.
//! With `reload: always` every request recompiles the templates first, so
//! edits on disk show up on the next line.
//!
//! ```text
//! $ printf 'templates/pages/home.html\nfooter\n' | pageset-demo --data data.json
//! ```

mod server;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pageset_render::{ReloadMode, TemplateConfig};
use tracing_subscriber::EnvFilter;

use server::Server;

/// Serve pageset templates, one address per stdin line.
#[derive(Parser)]
#[command(name = "pageset-demo", version, about)]
struct Cli {
    /// Template configuration file.
    #[arg(short, long, default_value = "pageset.yaml")]
    config: PathBuf,

    /// JSON file with the data passed to every render.
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Override the configured reload policy.
    #[arg(long, value_enum)]
    reload: Option<ReloadArg>,

    /// Enable info-level logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReloadArg {
    Always,
    Never,
}

impl From<ReloadArg> for ReloadMode {
    fn from(arg: ReloadArg) -> Self {
        match arg {
            ReloadArg::Always => ReloadMode::Always,
            ReloadArg::Never => ReloadMode::Never,
        }
    }
}

fn load_data(path: Option<&Path>) -> anyhow::Result<serde_json::Value> {
    let Some(path) = path else {
        return Ok(serde_json::json!({}));
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = TemplateConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(reload) = cli.reload {
        config.reload = reload.into();
    }
    let data = load_data(cli.data.as_deref())?;

    let start = Instant::now();
    let server = Server::from_config(&config, data)?;
    tracing::info!(
        pages = %config.pages,
        reload = ?config.reload,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Templates ready"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let summary = server.serve(stdin.lock(), &mut stdout)?;
    tracing::info!(
        served = summary.served,
        failed = summary.failed,
        "Input exhausted"
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
