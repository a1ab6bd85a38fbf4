use serde::{Deserialize, Serialize};
use url::Url;

/// Body of `POST /formats`
#[derive(Debug, Clone, Serialize)]
pub struct FormatsRequest<'a> {
    pub url: &'a str,
}

/// Body of `POST /download`
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest<'a> {
    pub url: &'a str,
    pub format_id: &'a str,
    pub format_type: &'a str,
}

/// One downloadable encoding as listed by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Format {
    pub id: String,
    pub resolution: String,
    pub ext: String,
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Success body of `POST /formats`
#[derive(Debug, Clone, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<Format>,
}

/// Success body of `POST /download`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadResult {
    pub filename: String,
}

/// Error body shared by every endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
}

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000/";

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_SERVER).expect("default server address is a valid URL"),
        }
    }
}
