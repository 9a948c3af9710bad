use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lat_core::{
    config::Config, diagnose, export, Aggregation, ExportFormat, Projection, RawRecord,
};
use lat_sources::{SourceCache, SourceOptions};

#[derive(Parser)]
#[command(name = "lat", about = "Log Analysis Tool — latency statistics per application context")]
struct Cli {
    /// Write debug logs to /tmp/lat-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of ~/.config/lat/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// CSV exports or zip archives of CSV exports.
    #[arg(required = true, value_name = "SOURCE")]
    sources: Vec<PathBuf>,

    /// Context depth (defaults to `analysis.default_depth`, capped at
    /// `analysis.max_depth`).
    #[arg(long)]
    depth: Option<usize>,

    /// Keep only records whose URL path lies under this application context.
    #[arg(long, value_name = "CONTEXT")]
    context: Option<String>,

    /// Keep only records whose URL contains this literal text.
    #[arg(long, value_name = "TEXT")]
    url_contains: Option<String>,

    /// Keep only records whose URL is exactly this.
    #[arg(long, value_name = "URL")]
    exact_url: Option<String>,

    /// Print the chosen table to stdout instead of starting the TUI.
    #[arg(long)]
    headless: bool,

    /// Which table to print in headless mode.
    #[arg(long, value_enum, default_value_t = Output::Records)]
    output: Output,

    /// Headless output format: csv or jsonl.
    #[arg(long, default_value = "csv")]
    format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// One row per extracted record.
    Records,
    /// One row per application context.
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load config; using defaults");
            Config::defaults()
        }),
    };

    let options = SourceOptions::new(config.analysis.exclude_message_patterns.clone());
    let records = load_sources(&cli.sources, &options)?;
    if let Some(warning) = diagnose(&records) {
        tracing::warn!(%warning, records = records.len(), "suspicious input");
    }

    let projection = initial_projection(&cli, &config);

    if cli.headless {
        headless(&records, &projection, cli.output, cli.format)
    } else {
        lat_tui::run(records, config, projection)
    }
}

/// Projection requested on the command line, with config fallbacks.
fn initial_projection(cli: &Cli, config: &Config) -> Projection {
    let max = config.analysis.max_depth;
    let depth = cli.depth.unwrap_or(config.analysis.default_depth);
    if depth > max {
        tracing::warn!(depth, max_depth = max, "depth exceeds max_depth; clamping");
    }
    Projection {
        depth: depth.min(max),
        context: cli.context.clone(),
        url_contains: cli.url_contains.clone(),
        exact_url: cli.exact_url.clone(),
    }
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/lat-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("lat debug log started — tail -f /tmp/lat-debug.log");
    } else if cli.headless {
        // stdout carries the table; diagnostics go to stderr.
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}

/// Load every source once and concatenate their records in argument order.
fn load_sources(paths: &[PathBuf], options: &SourceOptions) -> anyhow::Result<Vec<RawRecord>> {
    let mut cache = SourceCache::new();
    let mut records = Vec::new();
    for path in paths {
        let before = cache.len();
        let dataset = cache
            .get_or_load(path, options)
            .with_context(|| format!("loading {}", path.display()))?;
        if cache.len() == before {
            tracing::warn!(path = %path.display(), "source listed twice; ignoring repeat");
            continue;
        }
        tracing::info!(
            origin = %dataset.origin.display(),
            records = dataset.records.len(),
            excluded = dataset.excluded,
            malformed = dataset.malformed,
            "loaded source"
        );
        records.extend(dataset.records.iter().cloned());
    }
    Ok(records)
}

fn headless(
    records: &[RawRecord],
    projection: &Projection,
    output: Output,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let text = match output {
        Output::Records => export(&projection.project(records), format)?,
        Output::Stats => {
            let stats = Aggregation::from_records(&projection.project_for_stats(records)).finish();
            export(stats.values(), format)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn headless_flags_parse() {
        let cli = Cli::try_parse_from([
            "lat",
            "logs.csv",
            "more.zip",
            "--headless",
            "--output",
            "stats",
            "--format",
            "jsonl",
            "--depth",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.sources.len(), 2);
        assert_eq!(cli.output, Output::Stats);
        assert_eq!(cli.format, ExportFormat::Jsonl);
        assert_eq!(cli.depth, Some(2));
    }

    #[test]
    fn depth_is_capped_at_max_depth() {
        let config = Config::defaults();
        let max = config.analysis.max_depth;

        let deep = Cli::try_parse_from(["lat", "a.csv", "--depth", "500"]).unwrap();
        assert_eq!(initial_projection(&deep, &config).depth, max);

        let plain = Cli::try_parse_from(["lat", "a.csv", "--context", "erp"]).unwrap();
        let projection = initial_projection(&plain, &config);
        assert_eq!(projection.depth, config.analysis.default_depth);
        assert_eq!(projection.context.as_deref(), Some("erp"));
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["lat", "--headless"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["lat", "a.csv", "--format", "xml"]).is_err());
    }

    #[test]
    fn repeated_source_is_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, "@timestamp,message\nt1,http://gw/erp/x Time Taken in ms= 5\n")
            .unwrap();
        let records =
            load_sources(&[path.clone(), path], &SourceOptions::keep_all()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_source_is_an_error() {
        let missing = PathBuf::from("/nonexistent/a.csv");
        let err = load_sources(&[missing], &SourceOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/a.csv"));
    }
}
