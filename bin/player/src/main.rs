use chrono::Local;
use clap::Parser;
use marquee_player::config::PlayerConfig;
use marquee_player::headless::HeadlessPlayer;
use marquee_player::show::Show;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Plays a schedule of presentation events on a shared display.
#[derive(Debug, Parser)]
#[command(name = "marquee", version, about)]
struct Cli {
    /// YAML settings file describing the display and its events.
    settings: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,

    /// Load and validate the settings, then exit without playing.
    #[arg(long)]
    check: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match PlayerConfig::load(&cli.settings) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %cli.settings.display(), error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(path = %cli.settings.display(), events = config.events.len(), "loaded configuration");

    let mut show = Show::build(config, HeadlessPlayer::factory(), Local::now().naive_local());

    if cli.check {
        for skipped in show.skipped() {
            warn!(event = %skipped.name, error = %skipped.error, "invalid event");
        }
        info!(
            loaded = show.programme().len(),
            skipped = show.skipped().len(),
            "settings checked"
        );
        return if show.skipped().is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    show.initialize_all();
    show.run(shutdown_signal()).await;
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
