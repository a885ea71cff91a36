//! CLI parser
use clap::Parser;
use std::num::NonZeroU32;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_IMAGE_ENDPOINT, DEFAULT_OUTPUT_DIR, DEFAULT_SEARCH_ENDPOINT, DEFAULT_SEARCH_METHOD,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "PHOTOSTAGE_DEBUG")]
    /// Enable debug logging. Env: PHOTOSTAGE_DEBUG
    pub debug: bool,

    #[clap(long, env = "API_KEY", hide_env_values = true)]
    /// Flickr API key.
    /// Env: API_KEY
    pub api_key: String,

    #[clap(long, env = "USER_ID")]
    /// Flickr account whose photos are searched, eg `12345678@N00`.
    /// Env: USER_ID
    pub user_id: String,

    #[clap(long, short, default_value = DEFAULT_OUTPUT_DIR, env = "PHOTOSTAGE_OUTPUT_DIR")]
    /// Where `image{N}.jpg` files are written, defaults to `./data`.
    /// Env: PHOTOSTAGE_OUTPUT_DIR
    pub output_dir: PathBuf,

    #[clap(long, short, default_value = "3", env = "PHOTOSTAGE_COUNT")]
    /// Number of photos to stage.
    /// Env: PHOTOSTAGE_COUNT
    pub count: usize,

    #[clap(long, default_value = "2", env = "PHOTOSTAGE_PAGES")]
    /// Number of search pages to pull, starting at page 1.
    /// Env: PHOTOSTAGE_PAGES
    pub pages: NonZeroU32,

    #[clap(long, default_value = DEFAULT_SEARCH_ENDPOINT, env = "PHOTOSTAGE_SEARCH_ENDPOINT")]
    /// REST endpoint for searches.
    /// Env: PHOTOSTAGE_SEARCH_ENDPOINT
    pub search_endpoint: String,

    #[clap(long, default_value = DEFAULT_SEARCH_METHOD, env = "PHOTOSTAGE_SEARCH_METHOD")]
    /// REST method called for searches, defaults to `flickr.photos.search`.
    /// Env: PHOTOSTAGE_SEARCH_METHOD
    pub search_method: String,

    #[clap(long, default_value = DEFAULT_IMAGE_ENDPOINT, env = "PHOTOSTAGE_IMAGE_ENDPOINT")]
    /// Base URL for image downloads.
    /// Env: PHOTOSTAGE_IMAGE_ENDPOINT
    pub image_endpoint: String,
}
