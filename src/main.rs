mod api;
mod app;
mod application;
mod config;
mod domain;
mod logging;
mod state;
mod ui;
mod utils;

use clap::Parser;

fn main() -> iced::Result {
    let args = config::Args::parse();
    logging::init_logging();
    tracing::info!(server = %args.server, "starting video format downloader");

    iced::application(
        move || app::DownloadApp::new(&args),
        app::update,
        app::view,
    )
    .title("Video Format Downloader")
    .run()
}
