//! Client for the external media host. The service takes a file and hands
//! back a public URL; nothing about the stored bytes is validated here.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::MediaConfig;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upload rejected with status {0}")]
    Status(u16),

    #[error("upload response missing url")]
    BadResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    pub url: String,
}

/// Upload collaborator seam. Handlers depend on this trait so tests can
/// substitute a stub without a network.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<UploadedMedia, MediaError>;
}

/// HTTP implementation against the configured upload endpoint.
pub struct HttpMediaClient {
    http: reqwest::Client,
    upload_url: String,
    api_key: Option<String>,
}

impl HttpMediaClient {
    pub fn from_config(config: &MediaConfig) -> Result<Self, MediaError> {
        // The timeout is the whole point: a stalled collaborator must not
        // hang a request handler.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl MediaUploader for HttpMediaClient {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<UploadedMedia, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.http.post(&self.upload_url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MediaError::Status(response.status().as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        let url = body
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or(MediaError::BadResponse)?;

        Ok(UploadedMedia { url: url.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpMediaClient {
        HttpMediaClient::from_config(&MediaConfig {
            upload_url: format!("{}/upload", server.uri()),
            api_key: None,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn upload_returns_hosted_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "url": "https://cdn.example.com/abc.jpg" })),
            )
            .mount(&server)
            .await;

        let media = client_for(&server)
            .upload(b"jpeg bytes".to_vec(), "photo.jpg")
            .await
            .unwrap();
        assert_eq!(media.url, "https://cdn.example.com/abc.jpg");
    }

    #[tokio::test]
    async fn upload_surfaces_collaborator_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(b"jpeg bytes".to_vec(), "photo.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Status(503)));
    }

    #[tokio::test]
    async fn upload_rejects_payload_without_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(b"jpeg bytes".to_vec(), "photo.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::BadResponse));
    }
}
