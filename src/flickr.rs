//! Flickr REST wire types.

use serde::Deserialize;

use crate::error::StageError;

/// One photo from a search result page.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Photo {
    /// Photo id
    pub id: String,
    /// Owner NSID
    pub owner: String,
    /// Secret used in static image URLs
    pub secret: String,
    /// Server shard the image lives on
    pub server: String,
    /// Farm id, legacy CDN routing
    #[serde(default)]
    pub farm: u32,
    /// Photo title
    #[serde(default)]
    pub title: String,
    /// 1 when public
    #[serde(default)]
    pub ispublic: u8,
    /// 1 when visible to friends
    #[serde(default)]
    pub isfriend: u8,
    /// 1 when visible to family
    #[serde(default)]
    pub isfamily: u8,
}

/// The `photos` object of a search response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PhotoPage {
    /// This page's number
    #[serde(default)]
    pub page: u32,
    /// Total number of pages
    #[serde(default)]
    pub pages: u32,
    /// Photos per page
    #[serde(default)]
    pub perpage: u32,
    /// Total photos across all pages
    #[serde(default)]
    pub total: u64,
    /// The photos on this page
    #[serde(default, rename = "photo")]
    pub photos: Vec<Photo>,
}

/// Response envelope for `flickr.photos.search`.
///
/// Failures come back as `{"stat": "fail", "code": 100, "message": "..."}` with a
/// 200 status, so `photos` is optional here and checked in [`SearchResponse::into_page`].
#[derive(Clone, Debug, Deserialize)]
pub struct SearchResponse {
    /// The page of results, absent on failure
    #[serde(default)]
    pub photos: Option<PhotoPage>,
    /// "ok" or "fail"
    pub stat: String,
    /// Error code on failure
    #[serde(default)]
    pub code: Option<u32>,
    /// Error message on failure
    #[serde(default)]
    pub message: Option<String>,
}

impl SearchResponse {
    /// Returns the page of results if Flickr says the call worked.
    pub fn into_page(self) -> Result<PhotoPage, StageError> {
        if self.stat != "ok" {
            let message = match (self.code, self.message) {
                (Some(code), Some(message)) => format!("{message} (code {code})"),
                (None, Some(message)) => message,
                (Some(code), None) => format!("code {code}"),
                (None, None) => "no message".to_string(),
            };
            return Err(StageError::Api {
                stat: self.stat,
                message,
            });
        }
        Ok(self.photos.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let raw = r#"{
            "photos": {
                "page": 1, "pages": 4, "perpage": 2, "total": 8,
                "photo": [
                    {"id": "53001", "owner": "1234@N00", "secret": "abc123", "server": "65535",
                     "farm": 66, "title": "Sunset", "ispublic": 1, "isfriend": 0, "isfamily": 0},
                    {"id": "53002", "owner": "1234@N00", "secret": "def456", "server": "65535",
                     "farm": 66, "title": "", "ispublic": 1, "isfriend": 0, "isfamily": 1}
                ]
            },
            "stat": "ok"
        }"#;
        let response: SearchResponse = serde_json::from_str(raw).expect("parse response");
        let page = response.into_page().expect("stat ok");
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 4);
        assert_eq!(page.total, 8);
        assert_eq!(page.photos.len(), 2);
        assert_eq!(page.photos[0].secret, "abc123");
        assert_eq!(page.photos[1].isfamily, 1);
    }

    #[test]
    fn test_failed_stat() {
        let raw = r#"{"stat": "fail", "code": 100, "message": "Invalid API Key (Key has invalid format)"}"#;
        let response: SearchResponse = serde_json::from_str(raw).expect("parse response");
        let err = response.into_page().expect_err("stat fail");
        assert!(
            matches!(&err, StageError::Api { stat, message }
                if stat == "fail" && message.contains("Invalid API Key") && message.contains("code 100")),
            "unexpected error {err:?}"
        );
    }
}
