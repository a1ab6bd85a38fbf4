use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::{api::ApiClient, domain::AppError, utils::sanitize_filename};

/// Saves a file the server has produced to the local disk
#[derive(Clone)]
pub struct FileRetriever {
    api_client: ApiClient,
}

impl FileRetriever {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    pub async fn choose_save_path(&self, filename: &str) -> Option<PathBuf> {
        let suggested = sanitize_filename(filename);
        rfd::AsyncFileDialog::new()
            .set_file_name(suggested.trim_matches(|c| c == '.' || c == ' '))
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    /// Stream `/download_file/<filename>` into `path`
    pub async fn save(&self, filename: &str, path: &Path) -> Result<PathBuf, AppError> {
        let (total, stream) = self.api_client.download_file_stream(filename).await?;
        let mut stream = std::pin::pin!(stream);
        tracing::info!(filename, path = %path.display(), ?total, "saving produced file");

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create file: {}", e)))?;

        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Io(format!("Write error: {}", e)))?;
            written += chunk.len() as u64;
        }

        file.sync_all()
            .await
            .map_err(|e| AppError::Io(format!("Failed to sync file: {}", e)))?;

        tracing::debug!(written, "file saved");
        Ok(path.to_path_buf())
    }
}
