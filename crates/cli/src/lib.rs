use anyhow::{Context as AnyhowContext, Result};
use bom_graph::Contribution;
use bom_table::{rollup_table, RollupConfig, Table};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Picked up from the working directory when `--config` is not given
const DEFAULT_CONFIG_FILE: &str = "rollup.toml";

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
#[command(name = "bom-rollup")]
#[command(about = "Roll bill-of-materials costs up their parent links", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON array of row records ("-" or absent reads stdin)
    input: Option<PathBuf>,

    /// TOML config file (default: ./rollup.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Column holding the node id
    #[arg(long, env = "BOM_ROLLUP_ID_COLUMN")]
    id_column: Option<String>,

    /// Column holding the parent id
    #[arg(long, env = "BOM_ROLLUP_PARENT_COLUMN")]
    parent_column: Option<String>,

    /// Column holding the cost to roll up
    #[arg(long, env = "BOM_ROLLUP_COST_COLUMN")]
    cost_column: Option<String>,

    /// Parent value that marks a root
    #[arg(long, env = "BOM_ROLLUP_ROOT_SENTINEL", allow_hyphen_values = true)]
    root_sentinel: Option<i64>,

    /// Emit {"records": [...], "contributions": [...]} instead of bare records
    #[arg(long)]
    trace: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Serialize)]
struct TracedOutput {
    records: Vec<Value>,
    contributions: Vec<Contribution<i64, f64>>,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON only, logs go to stderr
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    log::debug!(
        "Columns: id={} parent={} cost={} (root sentinel {})",
        config.id_column,
        config.parent_column,
        config.cost_column,
        config.root_sentinel
    );

    let raw = read_input(cli.input.as_deref())?;
    let mut table = Table::from_json_str(&raw).context("Failed to parse row records")?;
    let contributions = rollup_table(&mut table, &config).context("Cost rollup failed")?;

    let records = table.to_records();
    let rendered = if cli.trace {
        let output = TracedOutput {
            records,
            contributions,
        };
        render(&output, cli.pretty)?
    } else {
        render(&records, cli.pretty)?
    };

    print_stdout(&rendered)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Defaults, then the config file, then env vars and flags (clap merges those two).
fn resolve_config(cli: &Cli) -> Result<RollupConfig> {
    let mut config = match &cli.config {
        Some(path) => RollupConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                RollupConfig::load(path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?
            } else {
                RollupConfig::default()
            }
        }
    };

    if let Some(column) = &cli.id_column {
        config.id_column = column.clone();
    }
    if let Some(column) = &cli.parent_column {
        config.parent_column = column.clone();
    }
    if let Some(column) = &cli.cost_column {
        config.cost_column = column.clone();
    }
    if let Some(sentinel) = cli.root_sentinel {
        config.root_sentinel = sentinel;
    }

    config.validate().context("Invalid rollup configuration")?;
    Ok(config)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    let buffer = match input.filter(|path| *path != Path::new("-")) {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read records from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read records from stdin")?;
            buffer
        }
    };

    if buffer.trim().is_empty() {
        anyhow::bail!("Input is empty. Provide a file or pipe JSON records via stdin.");
    }

    Ok(buffer)
}
