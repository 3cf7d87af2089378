//! Grok image API client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::dto::{ApiResponse, EditPayload, GROK_IMAGE_MODEL, GenerationPayload};
use super::executor::RequestExecutor;
use super::transport::TransportManager;
use crate::domain::entities::{AspectRatio, ImageRequest, ImageSource, Resolution, SavedImage};
use crate::domain::errors::ImageError;
use crate::domain::ports::ImageGenerationPort;
use crate::infrastructure::config::ClientConfig;
use crate::infrastructure::image::{ImageSaver, normalize};

const GENERATIONS_ENDPOINT: &str = "/images/generations";
const EDITS_ENDPOINT: &str = "/images/edits";

/// Client for the Grok image generation/editing API.
///
/// Composes the input normalizer, transport manager, request executor, and
/// result materializer linearly per request. Each call is bounded by the
/// configured end-to-end deadline, which takes precedence over the
/// per-attempt transport timeouts.
pub struct GrokImageClient {
    config: ClientConfig,
    executor: RequestExecutor,
    saver: ImageSaver,
    transport: Arc<TransportManager>,
}

impl GrokImageClient {
    /// Creates a client from configuration, creating the save directory
    /// (including parents) if absent.
    ///
    /// # Errors
    /// Returns `Persistence` if the save directory cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ImageError> {
        let transport = Arc::new(TransportManager::new(
            config.proxy().map(str::to_string),
        ));
        Self::with_transport(config, transport)
    }

    /// Creates a client over an existing transport manager (useful for
    /// testing with shortened timeouts).
    ///
    /// # Errors
    /// Returns `Persistence` if the save directory cannot be created.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<TransportManager>,
    ) -> Result<Self, ImageError> {
        let save_directory = config.effective_save_directory();
        std::fs::create_dir_all(&save_directory).map_err(|e| {
            ImageError::persistence(format!(
                "failed to create save directory {}: {e}",
                save_directory.display()
            ))
        })?;

        if config.has_api_key() {
            info!(
                save_directory = %save_directory.display(),
                proxy = config.proxy().unwrap_or("none"),
                "Grok image client ready"
            );
        } else {
            warn!("No Grok API key configured; image operations are disabled");
        }

        let executor = RequestExecutor::new(
            transport.clone(),
            config.api_key.clone(),
            config.base_url.clone(),
            config.advanced.max_retries,
        );
        let saver = ImageSaver::new(
            transport.clone(),
            save_directory,
            config.storage.filename_prefix.clone(),
        );

        Ok(Self {
            config,
            executor,
            saver,
            transport,
        })
    }

    fn ensure_api_key(&self) -> Result<(), ImageError> {
        if self.config.has_api_key() {
            Ok(())
        } else {
            Err(ImageError::configuration("no Grok API key configured"))
        }
    }

    /// Coerces an aspect ratio string to the enumerated set, falling back
    /// to the configured default for anything invalid.
    fn effective_aspect_ratio(&self, value: Option<&str>) -> AspectRatio {
        match value {
            None => self.config.default_aspect_ratio,
            Some(raw) => AspectRatio::parse(raw).unwrap_or_else(|| {
                warn!(value = raw, "Invalid aspect ratio, using configured default");
                self.config.default_aspect_ratio
            }),
        }
    }

    fn effective_resolution(&self, value: Option<&str>) -> Resolution {
        match value {
            None => self.config.default_resolution,
            Some(raw) => Resolution::parse(raw).unwrap_or_else(|| {
                warn!(value = raw, "Invalid resolution, using configured default");
                self.config.default_resolution
            }),
        }
    }

    /// Runs the executor under the configured end-to-end deadline and
    /// extracts the first image URL from the response.
    async fn call_api(
        &self,
        endpoint: &str,
        payload: serde_json::Value,
    ) -> Result<String, ImageError> {
        let deadline = Duration::from_secs(self.config.advanced.request_timeout_secs);

        let value = tokio::time::timeout(deadline, self.executor.execute(endpoint, &payload))
            .await
            .map_err(|_| ImageError::Timeout {
                seconds: deadline.as_secs(),
            })??;

        let response: ApiResponse = serde_json::from_value(value)
            .map_err(|e| ImageError::malformed(format!("unexpected response shape: {e}")))?;

        response
            .first_url()
            .map(str::to_string)
            .ok_or_else(|| ImageError::malformed("empty data array".to_string()))
    }
}

#[async_trait]
impl ImageGenerationPort for GrokImageClient {
    async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: Option<&str>,
        resolution: Option<&str>,
    ) -> Result<SavedImage, ImageError> {
        self.ensure_api_key()?;

        let request = ImageRequest::generation(
            prompt,
            self.effective_aspect_ratio(aspect_ratio),
            self.effective_resolution(resolution),
        )
        .ok_or_else(|| ImageError::validation("prompt must not be empty"))?;

        let payload = GenerationPayload {
            model: GROK_IMAGE_MODEL,
            prompt: &request.prompt,
            aspect_ratio: request.aspect_ratio,
            resolution: request.resolution,
        };
        let payload = serde_json::to_value(&payload)
            .map_err(|e| ImageError::unexpected(format!("failed to encode payload: {e}")))?;

        let url = self.call_api(GENERATIONS_ENDPOINT, payload).await?;
        self.saver.fetch_and_save(&url).await
    }

    async fn edit(&self, prompt: &str, image_source: &str) -> Result<SavedImage, ImageError> {
        self.ensure_api_key()?;

        let source = ImageSource::classify(image_source.trim());
        let request = ImageRequest::edit(prompt, source.clone())
            .ok_or_else(|| ImageError::validation("prompt must not be empty"))?;

        let image = normalize(&source).await?;

        let payload = EditPayload {
            model: GROK_IMAGE_MODEL,
            prompt: &request.prompt,
            image,
        };
        let payload = serde_json::to_value(&payload)
            .map_err(|e| ImageError::unexpected(format!("failed to encode payload: {e}")))?;

        let url = self.call_api(EDITS_ENDPOINT, payload).await?;
        self.saver.fetch_and_save(&url).await
    }

    async fn shutdown(&self) {
        self.transport.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn config_for(server: &MockServer, temp: &TempDir) -> ClientConfig {
        let mut config = ClientConfig {
            api_key: "xai-test".to_string(),
            base_url: server.uri(),
            ..ClientConfig::default()
        };
        config.storage.save_directory = Some(temp.path().to_path_buf());
        config
    }

    async fn mount_download(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(PNG_BYTES)
                    .insert_header("content-type", "image/png"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn generate_saves_a_png_under_the_save_directory() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        let image_url = format!("{}/img.png", server.uri());

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(body_partial_json(json!({
                "model": "grok-imagine-image",
                "prompt": "a red fox",
                "aspect_ratio": "1:1",
                "resolution": "1k",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": image_url}]})),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_download(&server).await;

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        let saved = client
            .generate("a red fox", Some("1:1"), Some("1k"))
            .await
            .unwrap();

        assert!(saved.path.extension().is_some_and(|e| e == "png"));
        assert!(
            saved
                .path
                .starts_with(std::fs::canonicalize(temp.path()).unwrap())
        );
        assert_eq!(std::fs::read(&saved.path).unwrap(), PNG_BYTES);
    }

    #[tokio::test]
    async fn invalid_aspect_ratio_is_coerced_to_the_default() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        let image_url = format!("{}/img.png", server.uri());

        // The mock only matches the configured default, never "7:3".
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(body_partial_json(
                json!({"aspect_ratio": "1:1", "resolution": "1k"}),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": image_url}]})),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_download(&server).await;

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        let result = client.generate("a red fox", Some("7:3"), Some("9k")).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn empty_prompt_makes_no_network_calls() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        let err = client.generate("   ", None, None).await.unwrap_err();

        assert!(matches!(err, ImageError::Validation { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_makes_no_network_calls() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();

        let mut config = config_for(&server, &temp);
        config.api_key = String::new();

        let client = GrokImageClient::new(config).unwrap();
        let err = client.generate("a red fox", None, None).await.unwrap_err();

        assert!(matches!(err, ImageError::Configuration { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_with_missing_local_file_makes_no_network_calls() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        let err = client
            .edit("make it night", "/nonexistent/cat.png")
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::InputSource { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_500_fails_immediately_with_one_attempt() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        let err = client.generate("a red fox", None, None).await.unwrap_err();

        assert!(matches!(err, ImageError::Api { status: 500, .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn response_without_url_is_malformed() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();

        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        let err = client.generate("a red fox", None, None).await.unwrap_err();

        assert!(matches!(err, ImageError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn edit_embeds_a_local_file_as_data_uri() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        let image_url = format!("{}/img.png", server.uri());

        let source = temp.path().join("source.png");
        tokio::fs::write(&source, PNG_BYTES).await.unwrap();

        Mock::given(method("POST"))
            .and(path("/images/edits"))
            .and(body_partial_json(json!({
                "model": "grok-imagine-image",
                "prompt": "make it night",
                "image": {"type": "image_url"},
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": image_url}]})),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_download(&server).await;

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        let saved = client
            .edit("make it night", source.to_str().unwrap())
            .await
            .unwrap();

        assert!(saved.path.extension().is_some_and(|e| e == "png"));

        let requests = server.received_requests().await.unwrap();
        let edit_request = requests
            .iter()
            .find(|r| r.url.path() == "/images/edits")
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&edit_request.body).unwrap();
        let url = body["image"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn shutdown_releases_the_session_and_is_repeatable() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();

        let client = GrokImageClient::new(config_for(&server, &temp)).unwrap();
        client.shutdown().await;
        client.shutdown().await;
    }
}
