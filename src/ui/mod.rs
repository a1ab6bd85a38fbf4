use iced::{
    widget::{button, column, pick_list, row, text, text_input, Column, Space},
    Element, Length,
};

use crate::domain::{FormatOption, StatusMessage};
use crate::state::UiState;

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    FetchPressed,
    FormatSelected(FormatOption),
    DownloadPressed,
    /// The link in the status region; carries the produced filename
    SavePressed(String),
}

pub fn view(state: &UiState) -> Element<'_, DownloadMessage> {
    let mut content: Column<'_, DownloadMessage> = column![
        text("Video Downloader").size(32),
        Space::new().height(Length::Fixed(20.0)),
        text("Video URL:").size(16),
        row![
            text_input("Paste a video URL...", &state.url)
                .on_input(DownloadMessage::UrlChanged)
                .on_submit(DownloadMessage::FetchPressed)
                .padding(10),
            button("Fetch Formats")
                .on_press(DownloadMessage::FetchPressed)
                .padding([10, 20]),
        ]
        .spacing(10),
        Space::new().height(Length::Fixed(10.0)),
    ]
    .padding(20)
    .spacing(10);

    if state.formats_visible {
        content = content.push(
            column![
                text("Available formats:").size(16),
                pick_list(
                    state.formats.as_slice(),
                    state.selected_option(),
                    DownloadMessage::FormatSelected,
                )
                .placeholder("No formats available")
                .width(Length::Fill),
                button("Download")
                    .on_press(DownloadMessage::DownloadPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
        );
    }

    content = content.push(status_view(&state.status));

    if let Some(notice) = &state.save_notice {
        content = content.push(text(notice).size(14));
    }

    content.into()
}

fn status_view(status: &StatusMessage) -> Element<'_, DownloadMessage> {
    match status {
        StatusMessage::Text(message) => text(message).size(14).into(),
        StatusMessage::DownloadReady { filename, href } => column![
            text(StatusMessage::READY_TEXT).size(14),
            button(StatusMessage::LINK_TEXT)
                .style(button::text)
                .on_press(DownloadMessage::SavePressed(filename.clone())),
            text(href.as_str()).size(12),
        ]
        .spacing(4)
        .into(),
    }
}
