use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use drive_mirror::config::Args;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);
    info!("{}", args.settings());

    let cancel = CancellationToken::new();
    tokio::spawn(end_program_signal_awaiter(cancel.clone()));

    match drive_mirror::mirror_drive(&args, cancel).await {
        Ok(summary) if summary.has_failures() => {
            for failure in &summary.failures {
                error!("{}: {}", failure.path, failure.error);
            }
            error!("finished with failures: {}", summary);
            ExitCode::FAILURE
        }
        Ok(summary) => {
            info!("finished: {}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("mirror aborted: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    tracing::debug!("tracing initialized");
}

async fn end_program_signal_awaiter(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            warn!("received ctrl-c, finishing the files in flight");
            cancel.cancel();
        }
        Err(e) => error!("could not listen for ctrl-c: {}", e),
    }
}
