pub mod download_trigger;
pub mod file_retriever;
pub mod format_fetcher;

pub use download_trigger::DownloadTrigger;
pub use file_retriever::FileRetriever;
pub use format_fetcher::FormatFetcher;
