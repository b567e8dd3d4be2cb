//! CLI for the kzn downloader.

mod gid;
mod progress;
mod report;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use kzn_core::config;
use kzn_core::{dispatch, DownloadRequest, FetchContext};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use gid::Gid;
use progress::TerminalProgress;

/// Top-level CLI for the kzn downloader.
#[derive(Debug, Parser)]
#[command(name = "kzn")]
#[command(about = "Download a URL, magnet link, .torrent or .metalink file", long_about = None)]
#[command(override_usage = "kzn <URL|magnet|.torrent|.metalink> [output]")]
pub struct Cli {
    /// HTTP/HTTPS URL, magnet link, or path to a .torrent / .metalink file.
    #[arg(value_name = "URI")]
    pub uri: String,

    /// Output path for direct URLs (default: last segment of the URL path).
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn into_request(self) -> DownloadRequest {
        DownloadRequest::new(self.uri, self.output)
    }

    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let work_dir = std::env::current_dir().context("failed to resolve working directory")?;

        let request = cli.into_request();
        let mut rng = StdRng::from_os_rng();
        let gid = Gid::generate(&mut rng);

        let cancel = CancellationToken::new();
        spawn_interrupt_handler(cancel.clone());

        let ctx = FetchContext {
            config: cfg,
            work_dir,
            progress: Arc::new(TerminalProgress::new()),
            cancel,
        };

        println!("{}", report::start_notice(Local::now().naive_local(), 1));
        let result = dispatch(&request, &ctx).await;
        if let Some(err) = &result.error {
            eprintln!("Error: {err}");
        }
        println!(
            "{}",
            report::complete_notice(Local::now().naive_local(), &result.path)
        );
        println!();
        print!("{}", report::results_table(&gid, &result));
        Ok(())
    }
}

/// Ctrl-C cancels the running download; the summary is still printed.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling download");
            cancel.cancel();
        }
    });
}

#[cfg(test)]
mod tests;
