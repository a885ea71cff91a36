//! Config handling

use std::path::PathBuf;
use std::time::Duration;

use tracing::log::LevelFilter;
use url::Url;

use crate::cli::CliOptions;
use crate::constants::{
    DEFAULT_COUNT, DEFAULT_IMAGE_ENDPOINT, DEFAULT_OUTPUT_DIR, DEFAULT_PAGES,
    DEFAULT_SEARCH_ENDPOINT, DEFAULT_SEARCH_METHOD, DOWNLOAD_TIMEOUT, FETCH_TIMEOUT,
    MAX_DOWNLOAD_ATTEMPTS, RETRY_DELAY,
};
use crate::error::StageError;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Everything a run needs, built once at startup and passed down by reference.
#[derive(Clone, Debug)]
pub struct Config {
    /// Flickr API key
    pub api_key: String,
    /// Account whose photos are searched
    pub user_id: String,
    /// REST endpoint for searches
    pub search_endpoint: Url,
    /// REST method name for searches
    pub search_method: String,
    /// Base URL for image downloads
    pub image_endpoint: Url,
    /// Where `image{N}.jpg` files go
    pub output_dir: PathBuf,
    /// Search pages to pull, starting from 1
    pub pages: u32,
    /// Photos to stage
    pub count: usize,
    /// Deadline for the search phase
    pub fetch_timeout: Duration,
    /// Deadline for the download phase
    pub download_timeout: Duration,
    /// Attempts per photo before it is skipped
    pub max_attempts: u32,
    /// Pause between attempts
    pub retry_delay: Duration,
}

impl Config {
    /// Builds a config with the default endpoints and limits.
    pub fn new(api_key: &str, user_id: &str) -> Result<Self, StageError> {
        let config = Self {
            api_key: api_key.trim().to_string(),
            user_id: user_id.trim().to_string(),
            search_endpoint: Url::parse(DEFAULT_SEARCH_ENDPOINT)?,
            search_method: DEFAULT_SEARCH_METHOD.to_string(),
            image_endpoint: Url::parse(DEFAULT_IMAGE_ENDPOINT)?,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            pages: DEFAULT_PAGES,
            count: DEFAULT_COUNT,
            fetch_timeout: FETCH_TIMEOUT,
            download_timeout: DOWNLOAD_TIMEOUT,
            max_attempts: MAX_DOWNLOAD_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builds the config from parsed command line/environment options.
    pub fn from_cli(cli: &CliOptions) -> Result<Self, StageError> {
        let mut config = Self::new(&cli.api_key, &cli.user_id)?;
        config.search_endpoint = parse_endpoint("search endpoint", &cli.search_endpoint)?;
        config.search_method = cli.search_method.trim().to_string();
        config.image_endpoint = parse_endpoint("image endpoint", &cli.image_endpoint)?;
        config.output_dir = cli.output_dir.clone();
        config.pages = cli.pages.get();
        config.count = cli.count;
        config.validate()?;
        Ok(config)
    }

    /// Checks the things we can check without talking to anyone.
    pub fn validate(&self) -> Result<(), StageError> {
        if self.api_key.is_empty() {
            return Err(StageError::Config("API_KEY is not set".to_string()));
        }
        if self.user_id.is_empty() {
            return Err(StageError::Config("USER_ID is not set".to_string()));
        }
        if self.search_method.is_empty() {
            return Err(StageError::Config("search method is empty".to_string()));
        }
        if self.pages == 0 {
            return Err(StageError::Config(
                "at least one search page is required".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(StageError::Config(
                "at least one download attempt is required".to_string(),
            ));
        }
        if self.image_endpoint.cannot_be_a_base() {
            return Err(StageError::Config(format!(
                "image endpoint {} can't have paths appended",
                self.image_endpoint
            )));
        }
        Ok(())
    }
}

fn parse_endpoint(name: &str, value: &str) -> Result<Url, StageError> {
    let url = Url::parse(value.trim())
        .map_err(|err| StageError::Config(format!("invalid {name} {value:?}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(StageError::Config(format!(
            "{name} must be http or https, got {other}"
        ))),
    }
}
