//! Search fetcher, one GET per result page.

use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::StageError;
use crate::flickr::{PhotoPage, SearchResponse};

/// Builds the search URL for one (1-based) result page.
pub fn search_url(config: &Config, page: u32) -> Url {
    let mut url = config.search_endpoint.clone();
    url.query_pairs_mut()
        .append_pair("method", &config.search_method)
        .append_pair("api_key", &config.api_key)
        .append_pair("user_id", &config.user_id)
        .append_pair("page", &page.to_string())
        .append_pair("format", "json")
        .append_pair("nojsoncallback", "1");
    url
}

/// Fetches and decodes one page of search results. No retries here.
#[instrument(level = "debug", skip(client, config))]
pub async fn fetch_page(
    client: &reqwest::Client,
    config: &Config,
    page: u32,
) -> Result<PhotoPage, StageError> {
    let url = search_url(config, page);
    let resp = client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        // don't log the query string, it carries the API key
        return Err(StageError::Status {
            url: config.search_endpoint.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().await?;
    debug!("Search page {} returned {} bytes", page, bytes.len());

    let response: SearchResponse = serde_json::from_slice(&bytes)?;
    let photo_page = response.into_page()?;
    if photo_page.photos.is_empty() {
        warn!("Search page {} has no photos", page);
    }
    Ok(photo_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let config = Config::new("my-key", "1234@N00").expect("config");
        let url = search_url(&config, 2);
        assert_eq!(url.host_str(), Some("www.flickr.com"));
        assert_eq!(url.path(), "/services/rest/");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("method".to_string(), "flickr.photos.search".to_string()),
                ("api_key".to_string(), "my-key".to_string()),
                ("user_id".to_string(), "1234@N00".to_string()),
                ("page".to_string(), "2".to_string()),
                ("format".to_string(), "json".to_string()),
                ("nojsoncallback".to_string(), "1".to_string()),
            ]
        );
    }
}
