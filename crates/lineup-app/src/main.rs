// Lineup optimizer entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout carries the report)
// 2. Load config (copying defaults on first run)
// 3. Build the data provider from configured paths
// 4. Fan out data loads and run the assignment
// 5. Print the report

use lineup_app::app;
use lineup_app::config;
use lineup_app::provider::CsvProvider;
use lineup_app::report;

use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Lineup optimizer starting up");

    // 2. Load config
    let base_dir = std::env::current_dir().context("failed to resolve working directory")?;
    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={} ({}), season {}, week {:?}, {} scoring, {} slots",
        config.league.name,
        config.league.league_id,
        config.league.season,
        config.league.week,
        config.league.scoring,
        config.slots.len()
    );

    // 3. Build the data provider
    let provider = CsvProvider::from_config(&config, &base_dir);

    // 4. Load and assign
    let output = app::run(&config, &provider).await?;

    // 5. Report
    print!(
        "{}",
        report::render(&output.result, &output.players, config.display.precision)
    );

    info!("Lineup optimizer finished");
    Ok(())
}

/// Initialize tracing to log to a file so the report on stdout stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("lineup.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lineup_app=info,lineup_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
