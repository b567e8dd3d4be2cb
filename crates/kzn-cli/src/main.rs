use kzn_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; the terminal stays free for progress output.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    // Parse CLI and dispatch. Download failures are reported in the results
    // table; only setup errors end up here.
    if let Err(err) = Cli::run_from_args().await {
        eprintln!("kzn error: {:#}", err);
        std::process::exit(1);
    }
}
