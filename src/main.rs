use anyhow::{Context, Result, bail};
use clap::Parser;
use photostage::config::{Config, setup_logging};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = photostage::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        bail!("Couldn't set up logging");
    }

    let config = Config::from_cli(&cli).context("Invalid configuration")?;

    let report = match photostage::stage::run(&config).await {
        Ok(report) => report,
        Err(err) => {
            error!("Run failed: {}", err);
            return Err(err.into());
        }
    };

    for failed in &report.downloads.failed {
        error!(
            "Photo {} was not saved as image{}.jpg: {}",
            failed.photo_id, failed.index, failed.error
        );
    }
    if report.selected > 0 && report.downloads.saved.is_empty() {
        bail!("None of the {} selected photos could be saved", report.selected);
    }
    Ok(())
}
