use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canslim_core::domain::report::ChecklistReport;
use canslim_core::domain::snapshot::StockSnapshot;
use canslim_core::ingest::provider::{HttpJsonSnapshotProvider, SnapshotProvider};
use canslim_core::ChecklistOptions;

#[derive(Debug, Parser)]
#[command(name = "canslim_worker")]
struct Args {
    /// Ticker to fetch and evaluate. Repeat for several tickers.
    #[arg(long = "ticker", value_name = "SYMBOL", required_unless_present = "snapshot")]
    tickers: Vec<String>,

    /// Evaluate a snapshot JSON file instead of fetching.
    #[arg(long, conflicts_with = "tickers")]
    snapshot: Option<PathBuf>,

    /// Pretty-print the reports.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = canslim_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let options = ChecklistOptions::from_env()?;

    if let Some(path) = &args.snapshot {
        let snapshot = load_snapshot(path).await?;
        let report = canslim_core::evaluate(&snapshot, &options)?;
        println!("{}", render(&report, args.pretty)?);
        return Ok(());
    }

    let provider = HttpJsonSnapshotProvider::from_settings(&settings)?;

    let mut failed = 0usize;
    for ticker in &args.tickers {
        match run_ticker(&provider, ticker, &options).await {
            Ok(report) => {
                tracing::info!(
                    ticker = %report.ticker,
                    passed = report.passed_count(),
                    no_verdict = report.no_verdict_count(),
                    "checklist done"
                );
                println!("{}", render(&report, args.pretty)?);
            }
            Err(err) => {
                failed += 1;
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(%ticker, error = %format!("{err:#}"), "checklist run failed");
            }
        }
    }

    anyhow::ensure!(
        failed == 0,
        "{failed} of {} tickers failed",
        args.tickers.len()
    );
    Ok(())
}

async fn run_ticker(
    provider: &dyn SnapshotProvider,
    ticker: &str,
    options: &ChecklistOptions,
) -> anyhow::Result<ChecklistReport> {
    let snapshot = provider
        .fetch_snapshot(ticker)
        .await
        .with_context(|| format!("fetch snapshot for {ticker} via {}", provider.provider_name()))?;
    Ok(canslim_core::evaluate(&snapshot, options)?)
}

async fn load_snapshot(path: &Path) -> anyhow::Result<StockSnapshot> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read snapshot file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse snapshot file {}", path.display()))
}

fn render(report: &ChecklistReport, pretty: bool) -> anyhow::Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(out)
}

fn init_sentry(settings: &canslim_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
