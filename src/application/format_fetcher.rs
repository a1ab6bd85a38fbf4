use crate::{
    api::ApiClient,
    domain::{AppError, DownloadPhase, FormatOption, StatusMessage},
    state::{StateStore, Ticket},
};

const FETCHING: &str = "Fetching formats...";
const PROMPT: &str = "Select a format and click Download.";
const REJECTED: &str = "Failed to fetch formats.";
const TRANSPORT: &str = "Error fetching formats.";

/// Lists the formats available for the URL in the input field
#[derive(Clone)]
pub struct FormatFetcher {
    api_client: ApiClient,
    store: StateStore,
}

/// A format request that has been started but not yet sent
pub struct PendingFetch {
    api_client: ApiClient,
    store: StateStore,
    ticket: Ticket,
    url: String,
}

impl FormatFetcher {
    pub fn new(api_client: ApiClient, store: StateStore) -> Self {
        Self { api_client, store }
    }

    /// Validate the URL field and mark the fetch as in progress.
    pub fn begin(&self) -> Result<PendingFetch, AppError> {
        let url = self.store.snapshot().url.trim().to_string();
        if url.is_empty() {
            let err = AppError::EmptyUrl;
            self.store
                .reject(DownloadPhase::FetchError, StatusMessage::text(err.to_string()));
            return Err(err);
        }

        let ticket = self
            .store
            .begin(DownloadPhase::FetchingFormats, StatusMessage::text(FETCHING));

        Ok(PendingFetch {
            api_client: self.api_client.clone(),
            store: self.store.clone(),
            ticket,
            url,
        })
    }
}

impl PendingFetch {
    /// Send the request and publish its outcome.
    /// Returns the number of formats listed.
    pub async fn run(self) -> Result<usize, AppError> {
        let result = self.api_client.list_formats(&self.url).await;

        match result {
            Ok(formats) => {
                let options: Vec<_> = formats
                    .iter()
                    .enumerate()
                    .map(|(index, format)| FormatOption::new(index, format))
                    .collect();
                let count = options.len();

                self.store.settle(self.ticket, |state| {
                    state.replace_formats(options);
                    state.phase = DownloadPhase::FormatsShown;
                    state.status = StatusMessage::text(PROMPT);
                });
                Ok(count)
            }
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!(url = %self.url, error = %err, "fetching formats failed");

                let status = err.status_text(REJECTED, TRANSPORT);
                self.store.settle(self.ticket, |state| {
                    state.phase = DownloadPhase::FetchError;
                    state.status = StatusMessage::Text(status);
                });
                Err(err)
            }
        }
    }
}
