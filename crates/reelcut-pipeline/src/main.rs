//! reelcut binary: highlight clip extraction CLI.

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelcut_media::{check_ffmpeg, FfmpegExtractor};
use reelcut_pipeline::{run, PipelineConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reelcut=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let config = PipelineConfig::parse();

    // Not fatal here: every row would fail with the same error and the run
    // still produces its report, but say so before starting work.
    match check_ffmpeg() {
        Ok(path) => info!("Using ffmpeg at {}", path.display()),
        Err(e) => warn!("{e}; all extractions will fail"),
    }

    // Ctrl-C flips the cancellation flag; in-flight ffmpeg children are
    // killed and their rows reported as failures.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal, cancelling in-flight extractions");
        let _ = cancel_tx.send(true);
    });

    let mut extractor = FfmpegExtractor::new().with_cancel(cancel_rx);
    if let Some(secs) = config.clip_timeout_secs {
        extractor = extractor.with_timeout(secs);
    }

    match run(&config, &extractor).await {
        Ok(report) => {
            if config.report_json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => error!("Failed to serialize report: {e}"),
                }
            }
            if !report.is_clean() {
                std::process::exit(2);
            }
        }
        Err(e) => {
            error!("Pipeline failed: {e}");
            std::process::exit(1);
        }
    }
}
