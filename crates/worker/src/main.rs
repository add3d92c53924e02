use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yjyg_core::domain::forecast::{rank_by_growth, ForecastReport};
use yjyg_core::ingest::eastmoney::EastmoneyClient;

#[derive(Debug, Parser)]
#[command(name = "yjyg_worker")]
struct Args {
    /// Reporting period (YYYY-MM-DD quarter end). Defaults to the latest
    /// period for today's CST date.
    #[arg(long)]
    report_date: Option<String>,

    /// Output HTML path.
    #[arg(long, default_value = "docs/index.html")]
    output: std::path::PathBuf,

    /// Records per page when fetching.
    #[arg(long)]
    page_size: Option<usize>,

    /// Fetch and rank but skip writing the output file.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = yjyg_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(&settings, &args).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn run(settings: &yjyg_core::config::Settings, args: &Args) -> anyhow::Result<()> {
    let report_date = yjyg_core::time::report_period::resolve_report_date(
        args.report_date.as_deref(),
        chrono::Utc::now(),
    )?;

    tracing::info!(%report_date, "fetching earnings forecast disclosures");

    let mut client =
        EastmoneyClient::from_settings(settings).context("failed to build eastmoney client")?;
    if let Some(page_size) = args.page_size {
        client = client.with_page_size(page_size);
    }

    let mut records = client.fetch_forecasts(report_date).await;
    tracing::info!(%report_date, records = records.len(), "fetch complete");

    rank_by_growth(&mut records);

    let report = ForecastReport {
        report_date,
        generated_at: chrono::Utc::now(),
        records,
    };

    if args.dry_run {
        tracing::info!(
            %report_date,
            dry_run = true,
            records = report.records.len(),
            "dry-run: skipping report write"
        );
        return Ok(());
    }

    yjyg_core::render::html::write_report(&report, &args.output)?;

    tracing::info!(
        %report_date,
        records = report.records.len(),
        path = %args.output.display(),
        "report written"
    );
    Ok(())
}

fn init_sentry(settings: &yjyg_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
