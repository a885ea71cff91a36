//! Photo downloader, one task per selected photo.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::constants::SIZE_SUFFIX;
use crate::error::StageError;
use crate::flickr::Photo;
use crate::reorient::prepare_image;

/// A photo that made it to disk.
#[derive(Debug)]
pub struct SavedPhoto {
    /// The `N` in `image{N}.jpg`
    pub index: usize,
    /// Flickr photo id
    pub photo_id: String,
    /// Where it was written
    pub path: PathBuf,
    /// Whether it was padded to landscape
    pub reoriented: bool,
}

/// A photo we gave up on.
#[derive(Debug)]
pub struct FailedPhoto {
    /// The `N` it would have been written as
    pub index: usize,
    /// Flickr photo id
    pub photo_id: String,
    /// The last error seen
    pub error: StageError,
}

/// Outcome of the download phase.
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Photos written, sorted by index
    pub saved: Vec<SavedPhoto>,
    /// Photos skipped, sorted by index
    pub failed: Vec<FailedPhoto>,
}

/// `{image_endpoint}/{server}/{id}_{secret}_b.jpg`
pub fn image_url(base: &Url, photo: &Photo) -> Result<Url, StageError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| StageError::Config(format!("image endpoint {base} can't have paths")))?
        .pop_if_empty()
        .push(&photo.server)
        .push(&format!("{}_{}_{}.jpg", photo.id, photo.secret, SIZE_SUFFIX));
    Ok(url)
}

/// `{output_dir}/image{index}.jpg`
pub fn output_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("image{index}.jpg"))
}

/// Downloads one photo, pads it if needed, and writes it out. One attempt only.
#[instrument(level = "debug", skip(client, config, photo), fields(photo_id = %photo.id))]
pub async fn save_photo(
    client: &reqwest::Client,
    config: &Config,
    photo: &Photo,
    index: usize,
) -> Result<SavedPhoto, StageError> {
    let url = image_url(&config.image_endpoint, photo)?;
    let resp = client.get(url.clone()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(StageError::Status {
            url: url.to_string(),
            status,
        });
    }
    let bytes = resp.bytes().await?;
    debug!("Downloaded {} bytes from {}", bytes.len(), url);

    let prepared = prepare_image(&bytes)?;

    let path = output_path(&config.output_dir, index);
    tokio::fs::write(&path, &prepared.bytes).await?;
    info!(
        "Saved photo {} ({}x{}) to {}",
        photo.id,
        prepared.width,
        prepared.height,
        path.display()
    );
    Ok(SavedPhoto {
        index,
        photo_id: photo.id.clone(),
        path,
        reoriented: prepared.reoriented,
    })
}

/// Calls [`save_photo`] until it works, the attempts run out, or the error
/// isn't worth retrying.
pub async fn save_with_retries(
    client: &reqwest::Client,
    config: &Config,
    photo: &Photo,
    index: usize,
) -> Result<SavedPhoto, StageError> {
    let mut attempt = 1;
    loop {
        match save_photo(client, config, photo, index).await {
            Ok(saved) => return Ok(saved),
            Err(err) if err.is_transient() && attempt < config.max_attempts => {
                warn!(
                    "Attempt {}/{} for photo {} failed: {}",
                    attempt, config.max_attempts, photo.id, err
                );
                attempt += 1;
                sleep(config.retry_delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Downloads every photo concurrently, numbering the files from 1.
///
/// A photo that keeps failing, or that is still going when the deadline hits, is
/// reported in [`DownloadReport::failed`] and doesn't hold up the others.
pub async fn download_all(
    client: &reqwest::Client,
    config: &Config,
    photos: Vec<Photo>,
) -> Result<DownloadReport, StageError> {
    tokio::fs::create_dir_all(&config.output_dir).await?;

    let deadline = Instant::now() + config.download_timeout;
    let mut workers = JoinSet::new();
    for (offset, photo) in photos.into_iter().enumerate() {
        let index = offset + 1;
        let client = client.clone();
        let config = config.clone();
        workers.spawn(async move {
            let result = timeout_at(deadline, save_with_retries(&client, &config, &photo, index))
                .await
                .unwrap_or_else(|_| {
                    Err(StageError::Timeout {
                        phase: "download",
                        after: config.download_timeout,
                    })
                });
            (index, photo.id, result)
        });
    }

    let mut report = DownloadReport::default();
    while let Some(joined) = workers.join_next().await {
        let (index, photo_id, result) = joined?;
        match result {
            Ok(saved) => report.saved.push(saved),
            Err(error) => {
                warn!("Skipping photo {} (image{}.jpg): {}", photo_id, index, error);
                report.failed.push(FailedPhoto {
                    index,
                    photo_id,
                    error,
                });
            }
        }
    }
    report.saved.sort_by_key(|saved| saved.index);
    report.failed.sort_by_key(|failed| failed.index);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> Photo {
        Photo {
            id: "53001234567".to_string(),
            owner: "1234@N00".to_string(),
            secret: "a1b2c3d4e5".to_string(),
            server: "65535".to_string(),
            farm: 66,
            title: "Harbour".to_string(),
            ispublic: 1,
            isfriend: 0,
            isfamily: 0,
        }
    }

    #[test]
    fn test_image_url() {
        let base = Url::parse("https://live.staticflickr.com").expect("url");
        let url = image_url(&base, &photo()).expect("image url");
        assert_eq!(
            url.as_str(),
            "https://live.staticflickr.com/65535/53001234567_a1b2c3d4e5_b.jpg"
        );

        let base = Url::parse("http://127.0.0.1:8080/static/").expect("url");
        let url = image_url(&base, &photo()).expect("image url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/static/65535/53001234567_a1b2c3d4e5_b.jpg"
        );
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("./data"), 2),
            PathBuf::from("./data/image2.jpg")
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_gives_up() {
        use crate::config::setup_logging;
        let _ = setup_logging(true);

        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config::new("key", "1234@N00").expect("config");
        // nothing listens on port 9 locally
        config.image_endpoint = Url::parse("http://127.0.0.1:9").expect("url");
        config.output_dir = dir.path().join("out");
        config.retry_delay = std::time::Duration::from_millis(10);

        let client = reqwest::Client::new();
        let report = download_all(&client, &config, vec![photo()])
            .await
            .expect("download phase");
        assert!(report.saved.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].index, 1);
        assert!(!output_path(&config.output_dir, 1).exists());
        assert!(config.output_dir.is_dir());
    }
}
