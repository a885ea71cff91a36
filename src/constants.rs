//! Shared constants/defaults for things
//!

use std::time::Duration;

/// Flickr REST endpoint used for photo searches
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.flickr.com/services/rest/";

/// The search method we call on the REST endpoint
pub const DEFAULT_SEARCH_METHOD: &str = "flickr.photos.search";

/// Base URL images are served from
pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://live.staticflickr.com";

/// The default place we put images
pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Size suffix for the "large" (1024px) variant
pub const SIZE_SUFFIX: &str = "b";

/// How many search pages to pull per run.
pub const DEFAULT_PAGES: u32 = 2;

/// How many photos to stage per run.
pub const DEFAULT_COUNT: usize = 3;

/// Deadline for the whole search phase.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Deadline for the whole download phase.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Attempts per photo before giving up on it.
pub const MAX_DOWNLOAD_ATTEMPTS: u32 = 3;

/// Pause between download attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Portrait images are padded to `height / LANDSCAPE_RATIO` wide, ie 10:7.
pub const LANDSCAPE_RATIO: f64 = 0.7;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
