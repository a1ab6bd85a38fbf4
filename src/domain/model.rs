use std::fmt;

use url::Url;

use crate::api::Format;

/// One entry of the selectable format list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOption {
    /// Position in the list the server returned
    pub index: usize,
    pub label: String,
    pub id: String,
    pub format_type: String,
}

impl FormatOption {
    pub fn new(index: usize, format: &Format) -> Self {
        Self {
            index,
            label: format!(
                "{} ({}) - {} [ID: {}]",
                format.resolution, format.ext, format.format_type, format.id
            ),
            id: format.id.clone(),
            format_type: format.format_type.clone(),
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            id: self.id.clone(),
            format_type: self.format_type.clone(),
        }
    }
}

impl fmt::Display for FormatOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Identifiers of the highlighted format, read at download time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: String,
    pub format_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    FetchingFormats,
    FormatsShown,
    FetchError,
    Downloading,
    DownloadComplete,
    DownloadError,
}

/// Content of the status region; always replaced, never appended to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Text(String),
    DownloadReady { filename: String, href: Url },
}

impl StatusMessage {
    pub const READY_TEXT: &'static str = "Download complete!";
    pub const LINK_TEXT: &'static str = "Click here to download";

    pub fn text(message: impl Into<String>) -> Self {
        Self::Text(message.into())
    }

    /// The plain text shown in the status region
    pub fn headline(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::DownloadReady { .. } => Self::READY_TEXT,
        }
    }
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::text("Paste a video URL and fetch its formats")
    }
}
