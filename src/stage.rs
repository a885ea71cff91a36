//! A whole staging run: search, pick, download.

use tracing::{info, warn};

use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::download::{DownloadReport, download_all};
use crate::error::StageError;
use crate::fetch::fetch_photos;
use crate::select::select_random;

/// What a run did.
#[derive(Debug)]
pub struct RunReport {
    /// Photos returned by the searches
    pub fetched: usize,
    /// Photos picked for download
    pub selected: usize,
    /// Per-photo download results
    pub downloads: DownloadReport,
}

/// Builds the HTTP client shared by every request in a run.
pub fn build_client(config: &Config) -> Result<reqwest::Client, StageError> {
    // no single request should outlive the longer of the two phases
    let request_timeout = config.fetch_timeout.max(config.download_timeout);
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(request_timeout)
        .build()?;
    Ok(client)
}

/// Runs the search phase, picks photos, then downloads them.
///
/// Anything going wrong while searching fails the run. Download failures are
/// per photo and end up in [`RunReport::downloads`].
pub async fn run(config: &Config) -> Result<RunReport, StageError> {
    config.validate()?;
    let client = build_client(config)?;

    let mut photos = fetch_photos(&client, config).await?;
    let fetched = photos.len();

    let selection = select_random(&mut photos, config.count);
    if selection.exhausted {
        warn!(
            "Only {} photos available, wanted {}",
            selection.photos.len(),
            config.count
        );
    }
    let selected = selection.photos.len();
    info!("Selected {} of {} photos", selected, fetched);

    let downloads = download_all(&client, config, selection.photos).await?;
    info!(
        "Saved {} photos to {}, skipped {}",
        downloads.saved.len(),
        config.output_dir.display(),
        downloads.failed.len()
    );

    Ok(RunReport {
        fetched,
        selected,
        downloads,
    })
}
