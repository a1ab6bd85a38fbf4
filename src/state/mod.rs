use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{DownloadPhase, FormatOption, Selection, StatusMessage};

/// Everything the window shows
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub url: String,
    pub status: StatusMessage,
    pub phase: DownloadPhase,
    pub formats: Vec<FormatOption>,
    pub selected: Option<usize>,
    pub formats_visible: bool,
    /// Outcome of saving the produced file locally
    pub save_notice: Option<String>,
    latest_ticket: u64,
}

impl UiState {
    pub fn selected_option(&self) -> Option<&FormatOption> {
        self.selected.and_then(|index| self.formats.get(index))
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selected_option().map(FormatOption::selection)
    }

    /// Replace the list; the first entry becomes the selection
    pub fn replace_formats(&mut self, formats: Vec<FormatOption>) {
        self.selected = if formats.is_empty() { None } else { Some(0) };
        self.formats = formats;
        self.formats_visible = true;
    }
}

/// Identifies one user-initiated operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Shared, observable UI state
///
/// Each operation takes a [`Ticket`] when it starts; its outcome is only
/// applied if no other operation has started since.
#[derive(Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<UiState>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UiState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> UiState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.tx.subscribe()
    }

    pub fn set_url(&self, url: String) {
        self.tx.send_modify(|state| state.url = url);
    }

    /// Highlight a list entry; refused when `index` is not in the current list
    pub fn select(&self, index: usize) -> bool {
        self.tx.send_if_modified(|state| {
            if index < state.formats.len() {
                state.selected = Some(index);
                true
            } else {
                false
            }
        })
    }

    /// Start an operation: supersede any in-flight one and show its status
    pub fn begin(&self, phase: DownloadPhase, status: StatusMessage) -> Ticket {
        let mut ticket = Ticket(0);
        self.tx.send_modify(|state| {
            state.latest_ticket += 1;
            ticket = Ticket(state.latest_ticket);
            state.phase = phase;
            state.status = status;
        });
        tracing::debug!(ticket = ticket.0, ?phase, "operation started");
        ticket
    }

    /// An operation that ends immediately, e.g. on local validation
    pub fn reject(&self, phase: DownloadPhase, status: StatusMessage) {
        let ticket = self.begin(phase, status);
        tracing::debug!(ticket = ticket.0, "operation rejected locally");
    }

    /// Apply an operation's outcome unless a newer operation has started
    pub fn settle(&self, ticket: Ticket, apply: impl FnOnce(&mut UiState)) -> bool {
        let applied = self.tx.send_if_modified(|state| {
            if state.latest_ticket != ticket.0 {
                return false;
            }
            apply(state);
            true
        });
        if !applied {
            tracing::debug!(ticket = ticket.0, "discarding superseded outcome");
        }
        applied
    }

    pub fn set_save_notice(&self, notice: Option<String>) {
        self.tx.send_modify(|state| state.save_notice = notice);
    }
}
