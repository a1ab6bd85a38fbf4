use crate::{
    api::ApiClient,
    domain::{AppError, DownloadPhase, Selection, StatusMessage},
    state::{StateStore, Ticket},
};

const DOWNLOADING: &str = "Downloading video, please wait...";
const REJECTED: &str = "Download failed.";
const TRANSPORT: &str = "Error downloading video.";

/// Asks the server to produce the selected format
#[derive(Clone)]
pub struct DownloadTrigger {
    api_client: ApiClient,
    store: StateStore,
}

pub struct PendingDownload {
    api_client: ApiClient,
    store: StateStore,
    ticket: Ticket,
    url: String,
    selection: Selection,
}

impl DownloadTrigger {
    pub fn new(api_client: ApiClient, store: StateStore) -> Self {
        Self { api_client, store }
    }

    /// Read the URL and selection and mark the download as in progress.
    ///
    /// Without a selection nothing is sent; the status explains why.
    pub fn begin(&self) -> Result<PendingDownload, AppError> {
        let state = self.store.snapshot();
        let Some(selection) = state.selection() else {
            let err = AppError::NoSelection;
            self.store
                .reject(DownloadPhase::DownloadError, StatusMessage::text(err.to_string()));
            return Err(err);
        };

        let ticket = self
            .store
            .begin(DownloadPhase::Downloading, StatusMessage::text(DOWNLOADING));

        Ok(PendingDownload {
            api_client: self.api_client.clone(),
            store: self.store.clone(),
            ticket,
            url: state.url.trim().to_string(),
            selection,
        })
    }
}

impl PendingDownload {
    /// Wait for the server to finish and publish the retrieval link.
    /// Returns the produced filename.
    pub async fn run(self) -> Result<String, AppError> {
        let result = self
            .api_client
            .request_download(&self.url, &self.selection.id, &self.selection.format_type)
            .await
            .map_err(AppError::from)
            .and_then(|result| {
                let href = self
                    .api_client
                    .retrieval_url(&result.filename)
                    .map_err(AppError::from)?;
                Ok((result.filename, href))
            });

        match result {
            Ok((filename, href)) => {
                tracing::info!(%filename, %href, "download ready");
                self.store.settle(self.ticket, |state| {
                    state.phase = DownloadPhase::DownloadComplete;
                    state.save_notice = None;
                    state.status = StatusMessage::DownloadReady {
                        filename: filename.clone(),
                        href,
                    };
                });
                Ok(filename)
            }
            Err(err) => {
                tracing::warn!(
                    url = %self.url,
                    format_id = %self.selection.id,
                    error = %err,
                    "download failed"
                );
                let status = err.status_text(REJECTED, TRANSPORT);
                self.store.settle(self.ticket, |state| {
                    state.phase = DownloadPhase::DownloadError;
                    state.status = StatusMessage::Text(status);
                });
                Err(err)
            }
        }
    }
}
