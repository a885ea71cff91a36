//! Fetch coordinator: pulls every search page concurrently under one deadline.

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::StageError;
use crate::flickr::{Photo, PhotoPage};
use crate::search::fetch_page;

/// What a page worker hands back to the coordinator.
type PageResult = (u32, Result<PhotoPage, StageError>);

/// Fetches pages `1..=config.pages` and concatenates their photos in page order.
///
/// The first failing page aborts the run, as does missing the deadline. Workers
/// still in flight are aborted when the task set is dropped.
pub async fn fetch_photos(
    client: &reqwest::Client,
    config: &Config,
) -> Result<Vec<Photo>, StageError> {
    let deadline = Instant::now() + config.fetch_timeout;
    let expected = config.pages as usize;
    let (tx, mut rx) = mpsc::channel::<PageResult>(expected.max(1));

    let mut workers = JoinSet::new();
    for page in 1..=config.pages {
        let tx = tx.clone();
        let client = client.clone();
        let config = config.clone();
        workers.spawn(async move {
            let result = fetch_page(&client, &config, page).await;
            // the receiver only goes away once the run has already failed
            let _ = tx.send((page, result)).await;
        });
    }
    drop(tx);

    let mut pages: Vec<(u32, PhotoPage)> = Vec::with_capacity(expected);
    while pages.len() < expected {
        let received = timeout_at(deadline, rx.recv()).await.map_err(|_| {
            error!("Search phase missed its {:?} deadline", config.fetch_timeout);
            StageError::Timeout {
                phase: "search",
                after: config.fetch_timeout,
            }
        })?;
        match received {
            Some((page, Ok(photo_page))) => {
                debug!(
                    "Page {} of {}: {} photos",
                    page,
                    photo_page.pages,
                    photo_page.photos.len()
                );
                pages.push((page, photo_page));
            }
            Some((page, Err(err))) => {
                error!("Search page {} failed: {}", page, err);
                return Err(err);
            }
            None => break,
        }
    }

    // every sender is gone but some pages never arrived, so a worker died
    if pages.len() < expected {
        while let Some(joined) = workers.join_next().await {
            joined?;
        }
        return Err(StageError::Task(format!(
            "only {} of {} search pages came back",
            pages.len(),
            expected
        )));
    }

    let photos = combine_pages(pages);
    if photos.is_empty() {
        return Err(StageError::EmptyResults);
    }
    info!("Fetched {} photos from {} pages", photos.len(), expected);
    Ok(photos)
}

/// Concatenates pages in page order, whatever order they arrived in.
pub fn combine_pages(mut pages: Vec<(u32, PhotoPage)>) -> Vec<Photo> {
    pages.sort_by_key(|(page, _)| *page);
    pages
        .into_iter()
        .flat_map(|(_, photo_page)| photo_page.photos)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(page: u32, ids: &[&str]) -> (u32, PhotoPage) {
        let photos = ids
            .iter()
            .map(|id| Photo {
                id: id.to_string(),
                owner: "1234@N00".to_string(),
                secret: "s".to_string(),
                server: "1".to_string(),
                farm: 1,
                title: String::new(),
                ispublic: 1,
                isfriend: 0,
                isfamily: 0,
            })
            .collect();
        (
            page,
            PhotoPage {
                page,
                pages: 2,
                perpage: ids.len() as u32,
                total: 0,
                photos,
            },
        )
    }

    #[test]
    fn test_combine_pages_ignores_arrival_order() {
        let in_order = combine_pages(vec![page_of(1, &["a", "b"]), page_of(2, &["c"])]);
        let reversed = combine_pages(vec![page_of(2, &["c"]), page_of(1, &["a", "b"])]);
        assert_eq!(in_order, reversed);
        let ids: Vec<&str> = in_order.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_combine_pages_length_is_sum() {
        let combined = combine_pages(vec![
            page_of(1, &["a", "b", "c"]),
            page_of(2, &[]),
            page_of(3, &["d", "e"]),
        ]);
        assert_eq!(combined.len(), 5);
    }
}
