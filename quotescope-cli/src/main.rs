//! QuoteScope CLI: headless runs of the same query session the TUI uses.
//!
//! Commands:
//! - `fetch`: query one identifier, print notices and a summary, write the
//!   spreadsheet when dividends exist, optionally dump prices as CSV
//! - `config`: print the effective configuration as TOML

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use quotescope_core::{
    AppConfig, DataProvider, Frequency, InputSelection, Locale, PriceSeries, QueryReport,
    QuerySession, Span, SpreadsheetExporter, StaticProvider, YahooProvider,
};

#[derive(Parser)]
#[command(
    name = "quotescope",
    about = "QuoteScope CLI: price, volume and dividend lookup"
)]
struct Cli {
    /// Path to a quotescope.toml. Defaults to ./quotescope.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch history and dividends for one identifier.
    Fetch {
        /// Ticker, index, rate or pair as Yahoo Finance lists it (e.g. AAPL, ^GSPC).
        identifier: String,

        /// daily, weekly or monthly (or 1d, 1wk, 1mo). Defaults to the config value.
        #[arg(long)]
        frequency: Option<Frequency>,

        /// 1d, 1mo, 3mo, 6mo, 1y, 5y or max. Defaults to the config value.
        #[arg(long)]
        span: Option<Span>,

        /// Directory the spreadsheet is written to. Defaults to the config value.
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Dump the price table as CSV to stdout (notices go to stderr).
        #[arg(long, default_value_t = false)]
        csv: bool,

        /// en or es. Defaults to the config value.
        #[arg(long)]
        locale: Option<Locale>,

        /// Offline mode: built-in fixtures, no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Print the effective configuration.
    Config,
}

/// Everything `fetch` needs once flags and config are merged.
struct FetchOptions {
    selection: InputSelection,
    export_dir: PathBuf,
    locale: Locale,
    csv: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log.level)?;

    match cli.command {
        Commands::Fetch {
            identifier,
            frequency,
            span,
            export_dir,
            csv,
            locale,
            offline,
        } => {
            let opts = FetchOptions {
                selection: InputSelection::new(
                    identifier,
                    frequency.unwrap_or(config.query.frequency),
                    span.unwrap_or(config.query.span),
                ),
                export_dir: export_dir.unwrap_or_else(|| config.export.dir.clone()),
                locale: locale.unwrap_or(config.locale),
                csv,
            };
            let provider: Box<dyn DataProvider> = if offline {
                Box::new(StaticProvider::demo())
            } else {
                Box::new(YahooProvider::new(&config.provider)?)
            };
            let stdout = std::io::stdout();
            let stderr = std::io::stderr();
            run_fetch(&*provider, &opts, &mut stdout.lock(), &mut stderr.lock())
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn init_tracing(config_level: &str) -> Result<()> {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| config_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid log filter '{filter}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Run one query. A failed request is returned as an error so the process
/// exits non-zero.
fn run_fetch(
    provider: &dyn DataProvider,
    opts: &FetchOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    let exporter = SpreadsheetExporter::new(&opts.export_dir, opts.locale);
    let session = QuerySession::new(provider, &exporter, opts.locale);
    let report = session.run(&opts.selection)?;

    // With --csv, stdout carries only the table.
    if opts.csv {
        print_notices(&report, err)?;
        write_csv(&report.prices, out)?;
    } else {
        print_notices(&report, out)?;
        print_summary(&report, out)?;
    }
    info!(identifier = %opts.selection.identifier, "fetch finished");
    Ok(())
}

fn print_notices(report: &QueryReport, w: &mut dyn Write) -> Result<()> {
    for notice in &report.notices {
        writeln!(w, "[{:?}] {}", notice.level, notice.message)?;
    }
    Ok(())
}

fn print_summary(report: &QueryReport, w: &mut dyn Write) -> Result<()> {
    let prices = &report.prices;
    let (Some(first), Some(last)) = (prices.rows().first(), prices.rows().last()) else {
        return Ok(());
    };
    writeln!(w)?;
    writeln!(
        w,
        "{} {} / {}: {} rows",
        report.selection.identifier,
        report.selection.frequency.code(),
        report.selection.span.code(),
        prices.len()
    )?;
    writeln!(
        w,
        "  {:<17} close {:>12.4}",
        first.timestamp.format("%Y-%m-%d %H:%M"),
        first.close
    )?;
    writeln!(
        w,
        "  {:<17} close {:>12.4}",
        last.timestamp.format("%Y-%m-%d %H:%M"),
        last.close
    )?;
    if report.volume_chart.is_some() {
        writeln!(w, "  total volume {}", prices.total_volume())?;
    }
    if let Some(dividends) = &report.dividend_table {
        writeln!(
            w,
            "  {} dividends, {:.4} paid in total",
            dividends.len(),
            dividends.total_paid()
        )?;
    }
    if let Some(export) = &report.export {
        writeln!(w, "  spreadsheet: {}", export.path.display())?;
    }
    Ok(())
}

fn write_csv(prices: &PriceSeries, w: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    writer.write_record(["timestamp", "close", "volume"])?;
    for row in prices.rows() {
        writer.write_record([
            row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.close.to_string(),
            row.volume.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn opts(identifier: &str, dir: &std::path::Path, csv: bool) -> FetchOptions {
        FetchOptions {
            selection: InputSelection::new(identifier, Frequency::Daily, Span::OneMonth),
            export_dir: dir.to_path_buf(),
            locale: Locale::English,
            csv,
        }
    }

    fn run(identifier: &str, csv: bool) -> (tempfile::TempDir, Result<()>, String, String) {
        let dir = tempfile::tempdir().unwrap();
        let provider = StaticProvider::demo();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = run_fetch(&provider, &opts(identifier, dir.path(), csv), &mut out, &mut err);
        (
            dir,
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fetch_flags() {
        let cli = Cli::try_parse_from([
            "quotescope", "fetch", "MSFT", "--frequency", "weekly", "--span", "5y", "--csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Fetch {
                identifier,
                frequency,
                span,
                csv,
                ..
            } => {
                assert_eq!(identifier, "MSFT");
                assert_eq!(frequency, Some(Frequency::Weekly));
                assert_eq!(span, Some(Span::FiveYears));
                assert!(csv);
            }
            Commands::Config => panic!("expected fetch"),
        }
    }

    #[test]
    fn rejects_unknown_span() {
        assert!(Cli::try_parse_from(["quotescope", "fetch", "MSFT", "--span", "2w"]).is_err());
    }

    #[test]
    fn dividend_payer_writes_export_and_summary() {
        let (dir, result, out, _) = run("AAPL", false);
        result.unwrap();
        assert!(out.contains("Data retrieved for AAPL"));
        assert!(out.contains("21 rows"));
        assert!(out.contains("4 dividends"));
        assert!(dir.path().join("AAPL_full_data.xlsx").exists());
    }

    #[test]
    fn csv_goes_to_stdout_and_notices_to_stderr() {
        let (_dir, result, out, err) = run("TSLA", true);
        result.unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("timestamp,close,volume"));
        assert_eq!(lines.count(), 21);
        assert!(err.contains("No dividends found"));
    }

    #[test]
    fn failure_is_an_error() {
        let (_dir, result, out, _) = run("FAIL", false);
        let e = result.unwrap_err();
        assert!(e.to_string().starts_with("request failed"));
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_identifier_prints_warning_only() {
        let (dir, result, out, _) = run("NOPE", false);
        result.unwrap();
        assert!(out.contains("[Warning]"));
        assert!(!out.contains("rows"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
