//! Result materialization: download a generated image and persist it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{StatusCode, header};
use tokio::fs;
use tracing::{debug, info};

use crate::domain::entities::{SavedImage, unique_filename};
use crate::domain::errors::ImageError;
use crate::infrastructure::grok::TransportManager;

/// Fixed download deadline, independent of the generation request timeout.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads result images through the shared transport and writes them
/// to the save directory. Single attempt per download, no retries.
pub struct ImageSaver {
    transport: Arc<TransportManager>,
    save_directory: PathBuf,
    filename_prefix: String,
}

impl ImageSaver {
    /// Creates a saver. The save directory must already exist.
    #[must_use]
    pub fn new(
        transport: Arc<TransportManager>,
        save_directory: PathBuf,
        filename_prefix: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            save_directory,
            filename_prefix: filename_prefix.into(),
        }
    }

    /// Downloads `url` and writes it under the save directory with a
    /// synthesized unique filename.
    ///
    /// # Errors
    /// Returns `DownloadFailed` on a non-200 response, `Timeout` when the
    /// 60s deadline elapses, and `Persistence` on write failure.
    pub async fn fetch_and_save(&self, url: &str) -> Result<SavedImage, ImageError> {
        let session = self.transport.acquire().await?;

        debug!(
            proxy = session.proxy.as_deref().unwrap_or("none"),
            "Downloading generated image"
        );

        let download = async {
            let response = session.client.get(url).send().await.map_err(|e| {
                ImageError::transport(format!("image download failed for {url}: {e}"))
            })?;

            let status = response.status();
            if status != StatusCode::OK {
                return Err(ImageError::DownloadFailed {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            let bytes = response.bytes().await.map_err(|e| {
                ImageError::transport(format!("failed to read image body from {url}: {e}"))
            })?;

            Ok::<(String, Bytes), ImageError>((content_type, bytes))
        };

        let (content_type, bytes) = tokio::time::timeout(DOWNLOAD_TIMEOUT, download)
            .await
            .map_err(|_| ImageError::Timeout {
                seconds: DOWNLOAD_TIMEOUT.as_secs(),
            })??;

        let ext = extension_for_content_type(&content_type);
        let filename = unique_filename(&self.filename_prefix, ext);
        let path = self.save_directory.join(filename);

        fs::write(&path, &bytes).await.map_err(|e| {
            ImageError::persistence(format!(
                "failed to write {} (from {url}): {e}",
                path.display()
            ))
        })?;

        let abs_path = fs::canonicalize(&path).await.unwrap_or(path);

        info!(path = %abs_path.display(), size = bytes.len(), "Image saved");

        Ok(SavedImage::new(abs_path, url))
    }
}

/// Maps a Content-Type header value to a file extension (with dot).
///
/// Anything unrecognized defaults to `.jpg`.
#[must_use]
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    if content_type.contains("image/jpeg") || content_type.contains("image/jpg") {
        ".jpg"
    } else if content_type.contains("image/png") {
        ".png"
    } else if content_type.contains("image/gif") {
        ".gif"
    } else if content_type.contains("image/webp") {
        ".webp"
    } else {
        ".jpg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn saver_for(temp: &TempDir) -> ImageSaver {
        ImageSaver::new(
            Arc::new(TransportManager::new(None)),
            temp.path().to_path_buf(),
            "grok_",
        )
    }

    #[test_case("image/jpeg" => ".jpg")]
    #[test_case("image/jpg; charset=binary" => ".jpg")]
    #[test_case("image/png" => ".png")]
    #[test_case("image/gif" => ".gif")]
    #[test_case("image/webp" => ".webp")]
    #[test_case("application/octet-stream" => ".jpg"; "unknown defaults to jpg")]
    #[test_case("" => ".jpg"; "missing defaults to jpg")]
    fn extension_mapping(content_type: &str) -> &'static str {
        extension_for_content_type(content_type)
    }

    #[tokio::test]
    async fn downloads_and_persists_with_content_type_extension() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(PNG_BYTES)
                    .insert_header("content-type", "image/png"),
            )
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let saver = saver_for(&temp);

        let saved = saver
            .fetch_and_save(&format!("{}/img.png", server.uri()))
            .await
            .unwrap();

        assert!(saved.path.extension().is_some_and(|e| e == "png"));
        assert!(saved.path.is_absolute());
        assert_eq!(std::fs::read(&saved.path).unwrap(), PNG_BYTES);
        assert!(saved.remote_url.ends_with("/img.png"));
    }

    #[tokio::test]
    async fn non_200_is_download_failed_with_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let saver = saver_for(&temp);

        let err = saver
            .fetch_and_save(&format!("{}/img.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::DownloadFailed { status: 404, .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_content_type_defaults_to_jpg() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let saver = saver_for(&temp);

        let saved = saver
            .fetch_and_save(&format!("{}/img", server.uri()))
            .await
            .unwrap();

        assert!(saved.path.extension().is_some_and(|e| e == "jpg"));
    }

    #[tokio::test]
    async fn unwritable_directory_is_a_persistence_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
            .mount(&server)
            .await;

        let saver = ImageSaver::new(
            Arc::new(TransportManager::new(None)),
            PathBuf::from("/nonexistent/save/dir"),
            "grok_",
        );

        let err = saver
            .fetch_and_save(&format!("{}/img.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::Persistence { .. }));
    }
}
