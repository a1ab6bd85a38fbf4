use futures::Stream;
use futures::TryStreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::models::{
    ApiConfig, DownloadRequest, DownloadResult, ErrorBody, Format, FormatsRequest,
    FormatsResponse,
};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-2xx answer; carries the server's `error` text when it sent one
    #[error("Server rejected the request: {}", .message.as_deref().unwrap_or("no reason given"))]
    Rejected { message: Option<String> },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Server address cannot hold a path: {0}")]
    InvalidBaseUrl(Url),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Decode a JSON answer: parse failure first, then status, then shape.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_value::<ErrorBody>(body)
                .unwrap_or_default()
                .error;
            tracing::warn!(%status, ?message, "server rejected request");
            return Err(ApiError::Rejected { message });
        }

        serde_json::from_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("unexpected body: {}", e)))
    }

    /// `POST /formats`
    pub async fn list_formats(&self, video_url: &str) -> Result<Vec<Format>> {
        let endpoint = self.endpoint(&["formats"])?;
        tracing::debug!(%endpoint, video_url, "requesting format list");

        let response = self
            .http
            .post(endpoint)
            .json(&FormatsRequest { url: video_url })
            .send()
            .await?;

        let body: FormatsResponse = Self::decode(response).await?;
        tracing::info!(count = body.formats.len(), "received format list");
        Ok(body.formats)
    }

    /// `POST /download`; resolves once the server has produced the file
    pub async fn request_download(
        &self,
        video_url: &str,
        format_id: &str,
        format_type: &str,
    ) -> Result<DownloadResult> {
        let endpoint = self.endpoint(&["download"])?;
        tracing::debug!(%endpoint, video_url, format_id, format_type, "requesting download");

        let response = self
            .http
            .post(endpoint)
            .json(&DownloadRequest {
                url: video_url,
                format_id,
                format_type,
            })
            .send()
            .await?;

        let result: DownloadResult = Self::decode(response).await?;
        tracing::info!(filename = %result.filename, "server finished download");
        Ok(result)
    }

    /// Where the server serves a produced file
    pub fn retrieval_url(&self, filename: &str) -> Result<Url> {
        self.endpoint(&["download_file", filename])
    }

    /// Fetch a produced file as a byte stream
    /// Returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        filename: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let url = self.retrieval_url(filename)?;
        tracing::debug!(%url, "fetching produced file");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            tracing::warn!(%status, ?message, "file retrieval rejected");
            return Err(ApiError::Rejected { message });
        }

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: Url::parse(&server.url()).unwrap(),
        })
    }

    #[test]
    fn test_retrieval_url_percent_encodes_filename() {
        let client = ApiClient::new(ApiConfig::default());
        let url = client.retrieval_url("video 1.mp4").unwrap();
        assert_eq!(url.path(), "/download_file/video%201.mp4");

        let url = client.retrieval_url("a/b 100%.mp4").unwrap();
        assert_eq!(url.path(), "/download_file/a%2Fb%20100%25.mp4");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = ApiClient::new(ApiConfig {
            base_url: Url::parse("http://example.com/yt/").unwrap(),
        });
        assert_eq!(
            client.endpoint(&["formats"]).unwrap().as_str(),
            "http://example.com/yt/formats"
        );
    }

    #[tokio::test]
    async fn test_list_formats_sends_url_and_keeps_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/formats")
            .match_body(Matcher::Json(json!({"url": "https://youtu.be/abc"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"formats": [
                    {"id": "18", "resolution": "640x360", "ext": "mp4", "type": "Video+Audio"},
                    {"id": "140", "resolution": "audio", "ext": "m4a", "type": "Audio Only"}
                ]})
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let formats = client_for(&server)
            .list_formats("https://youtu.be/abc")
            .await
            .unwrap();

        mock.assert_async().await;
        let ids: Vec<_> = formats.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["18", "140"]);
    }

    #[tokio::test]
    async fn test_list_formats_surfaces_server_error_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/formats")
            .with_status(404)
            .with_body(r#"{"error": "No formats found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).list_formats("x").await.unwrap_err();
        match err {
            ApiError::Rejected { message } => assert_eq!(message.as_deref(), Some("No formats found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejection_without_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/download")
            .with_status(500)
            .with_body("{}")
            .create_async()
            .await;

        let err = client_for(&server)
            .request_download("x", "22", "Video+Audio")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { message: None }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/formats")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let err = client_for(&server).list_formats("x").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_success_without_expected_field_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/download")
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .request_download("x", "22", "Video+Audio")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_request_download_body_and_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/download")
            .match_body(Matcher::Json(json!({
                "url": "https://youtu.be/abc",
                "format_id": "137",
                "format_type": "Video Only"
            })))
            .with_status(200)
            .with_body(r#"{"filename": "video 1.mp4"}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .request_download("https://youtu.be/abc", "137", "Video Only")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.filename, "video 1.mp4");
    }

    #[tokio::test]
    async fn test_download_file_stream_yields_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/download_file/video%201.mp4")
            .with_status(200)
            .with_body("0123456789")
            .create_async()
            .await;

        let (total, stream) = client_for(&server)
            .download_file_stream("video 1.mp4")
            .await
            .unwrap();
        assert_eq!(total, Some(10));

        let chunks: Vec<_> = stream.collect().await;
        let bytes: Vec<u8> = chunks
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect();
        assert_eq!(bytes, b"0123456789");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let client = ApiClient::new(ApiConfig {
            base_url: Url::parse("http://127.0.0.1:1/").unwrap(),
        });
        let err = client.list_formats("x").await.unwrap_err();
        assert!(matches!(err, ApiError::RequestError(_)));
    }
}
