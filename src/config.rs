use clap::Parser;
use url::Url;

use crate::api::{models::DEFAULT_SERVER, ApiConfig};

/// Pick a format for a video URL and have the server download it.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Address of the format/download server
    #[arg(long, env = "VIDEO_FORMAT_DOWNLOADER_SERVER", default_value = DEFAULT_SERVER)]
    pub server: Url,

    /// Video URL to prefill the input field with
    #[arg(long)]
    pub url: Option<String>,
}

impl Args {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.server.clone(),
        }
    }
}
