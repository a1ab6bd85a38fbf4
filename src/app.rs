use crate::api::ApiClient;
use crate::application::{DownloadTrigger, FileRetriever, FormatFetcher};
use crate::config::Args;
use crate::domain::AppError;
use crate::state::{StateStore, UiState};
use crate::ui::{self, DownloadMessage};
use iced::Task;
use std::path::PathBuf;

pub struct DownloadApp {
    store: StateStore,
    fetcher: FormatFetcher,
    trigger: DownloadTrigger,
    retriever: FileRetriever,
    // Rendered copy of the store, refreshed after every message
    snapshot: UiState,
}

impl DownloadApp {
    pub fn new(args: &Args) -> Self {
        let api_client = ApiClient::new(args.api_config());
        let store = StateStore::new();
        if let Some(url) = &args.url {
            store.set_url(url.clone());
        }

        Self {
            fetcher: FormatFetcher::new(api_client.clone(), store.clone()),
            trigger: DownloadTrigger::new(api_client.clone(), store.clone()),
            retriever: FileRetriever::new(api_client),
            snapshot: store.snapshot(),
            store,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Number of formats listed
    FormatsSettled(Result<usize, AppError>),
    /// Filename produced by the server
    DownloadSettled(Result<String, AppError>),
    /// (Selected Path, Filename)
    SavePathSelected(Option<PathBuf>, String),
    SaveCompleted(Result<PathBuf, AppError>),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    let task = match message {
        Message::UiMessage(ui_msg) => handle_ui(app, ui_msg),
        Message::FormatsSettled(result) => {
            if let Err(e) = result {
                tracing::debug!(error = %e, "format fetch settled with error");
            }
            Task::none()
        }
        Message::DownloadSettled(result) => {
            if let Err(e) = result {
                tracing::debug!(error = %e, "download settled with error");
            }
            Task::none()
        }
        Message::SavePathSelected(path_opt, filename) => match path_opt {
            Some(path) => {
                app.store
                    .set_save_notice(Some(format!("Saving to: {}", path.display())));
                let retriever = app.retriever.clone();
                Task::perform(
                    async move { retriever.save(&filename, &path).await },
                    Message::SaveCompleted,
                )
            }
            None => {
                // User cancelled dialog
                app.store.set_save_notice(Some("Save cancelled".to_string()));
                Task::none()
            }
        },
        Message::SaveCompleted(result) => {
            let notice = match result {
                Ok(path) => format!("Saved: {}", path.display()),
                Err(e) => format!("Save failed: {}", e),
            };
            app.store.set_save_notice(Some(notice));
            Task::none()
        }
    };

    app.snapshot = app.store.snapshot();
    task
}

fn handle_ui(app: &mut DownloadApp, message: DownloadMessage) -> Task<Message> {
    match message {
        DownloadMessage::UrlChanged(url) => {
            app.store.set_url(url);
            Task::none()
        }
        DownloadMessage::FetchPressed => match app.fetcher.begin() {
            Ok(pending) => Task::perform(pending.run(), Message::FormatsSettled),
            Err(_) => Task::none(),
        },
        DownloadMessage::FormatSelected(option) => {
            if !app.store.select(option.index) {
                tracing::debug!(index = option.index, "ignoring selection outside current list");
            }
            Task::none()
        }
        DownloadMessage::DownloadPressed => match app.trigger.begin() {
            Ok(pending) => Task::perform(pending.run(), Message::DownloadSettled),
            Err(_) => Task::none(),
        },
        DownloadMessage::SavePressed(filename) => {
            let retriever = app.retriever.clone();
            Task::perform(
                async move {
                    let path = retriever.choose_save_path(&filename).await;
                    (path, filename)
                },
                |(path, filename)| Message::SavePathSelected(path, filename),
            )
        }
    }
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    ui::view(&app.snapshot).map(Message::UiMessage)
}
