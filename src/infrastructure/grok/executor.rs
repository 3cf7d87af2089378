//! Request execution with bounded retries and exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, header};
use tracing::{debug, warn};

use super::transport::TransportManager;
use crate::domain::errors::ImageError;

/// Backoff before retry attempt `attempt + 1`: `2^(attempt-1)` seconds
/// (1, 2, 4, ...). No jitter, no upper cap.
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << (attempt - 1))
}

/// Issues authenticated POSTs to the Grok API with bounded retries.
///
/// Retry policy per attempt:
/// - non-200 response: definitive rejection, no retry
/// - timeout: backoff then retry
/// - connection failure with a proxy configured: proxy error, no retry
/// - connection failure without a proxy: discard session, backoff, retry
/// - other reqwest client errors (body/decode): backoff, retry, same session
/// - anything else: abort immediately
pub struct RequestExecutor {
    transport: Arc<TransportManager>,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl RequestExecutor {
    /// Creates an executor bound to a transport manager.
    #[must_use]
    pub fn new(
        transport: Arc<TransportManager>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        max_retries: u32,
    ) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: base_url.into(),
            max_retries: max_retries.max(1),
        }
    }

    /// Executes `POST <base_url><endpoint>` with a JSON payload.
    ///
    /// # Errors
    /// Returns the classified failure; `RetriesExhausted` wraps the last
    /// transient error once the attempt budget is spent.
    pub async fn execute(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ImageError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            let session = self.transport.acquire().await?;

            debug!(
                endpoint,
                attempt,
                max_retries = self.max_retries,
                "Grok API request"
            );

            let response = session
                .client
                .post(&url)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
                .json(payload)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status != StatusCode::OK {
                        let body = resp.text().await.unwrap_or_default();
                        warn!(%status, endpoint, "Grok API rejected request");
                        return Err(ImageError::Api {
                            status: status.as_u16(),
                            body,
                        });
                    }

                    match resp.json::<serde_json::Value>().await {
                        Ok(value) => {
                            debug!(endpoint, attempt, "Grok API request succeeded");
                            return Ok(value);
                        }
                        Err(e) => {
                            // Malformed body on a 200 is a transient client
                            // fault; retry on the same session.
                            last_error = format!("malformed response body: {e}");
                            warn!(endpoint, attempt, error = %e, "Failed to read response body");
                        }
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = "request timed out".to_string();
                    warn!(endpoint, attempt, "Grok API request timed out");
                }
                Err(e) if e.is_connect() => {
                    if self.transport.proxy().is_some() {
                        return Err(ImageError::proxy(e.to_string()));
                    }
                    last_error = format!("connection failed: {e}");
                    warn!(endpoint, attempt, error = %e, "Connection failed, discarding session");
                    self.transport.invalidate().await;
                }
                Err(e) if e.is_request() || e.is_body() || e.is_decode() => {
                    last_error = format!("client error: {e}");
                    warn!(endpoint, attempt, error = %e, "Transport client error");
                }
                Err(e) => {
                    // Unknown failure class: do not mask as retryable.
                    return Err(ImageError::unexpected(e.to_string()));
                }
            }

            if attempt < self.max_retries {
                let delay = backoff_delay(attempt);
                debug!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    "Backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(ImageError::RetriesExhausted {
            attempts: self.max_retries,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn executor_for(server: &MockServer, max_retries: u32) -> RequestExecutor {
        let transport = Arc::new(TransportManager::new(None));
        RequestExecutor::new(transport, "xai-test", server.uri(), max_retries)
    }

    #[test]
    fn backoff_ladder_is_exponential_base_two() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn success_returns_parsed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("authorization", "Bearer xai-test"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({"prompt": "a red fox"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"url": "https://x/img.png"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let executor = executor_for(&server, 3);
        let result = executor
            .execute("/images/generations", &json!({"prompt": "a red fox"}))
            .await
            .unwrap();

        assert_eq!(result["data"][0]["url"], "https://x/img.png");
    }

    #[tokio::test]
    async fn non_200_fails_immediately_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount(&server)
            .await;

        let executor = executor_for(&server, 3);
        let err = executor
            .execute("/images/generations", &json!({"prompt": "x"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::Api { status: 500, .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn timeouts_retry_until_the_budget_is_spent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        // Per-attempt total timeout well under the mock's delay.
        let transport = Arc::new(TransportManager::with_timeouts(
            None,
            Duration::from_millis(500),
            Duration::from_millis(200),
        ));
        let executor = RequestExecutor::new(transport, "xai-test", server.uri(), 2);

        let err = executor
            .execute("/images/generations", &json!({"prompt": "x"}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImageError::RetriesExhausted { attempts: 2, .. }
        ));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn connection_failure_with_proxy_is_a_proxy_error() {
        // Nothing listens on this port; with a proxy configured the connect
        // failure is a configuration problem, never retried.
        let transport = Arc::new(TransportManager::with_timeouts(
            Some("http://127.0.0.1:9".to_string()),
            Duration::from_millis(500),
            Duration::from_millis(500),
        ));
        let executor =
            RequestExecutor::new(transport, "xai-test", "http://127.0.0.1:9", 3);

        let start = std::time::Instant::now();
        let err = executor
            .execute("/images/generations", &json!({"prompt": "x"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::Proxy { .. }));
        // No backoff sleeps happened.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn connection_failure_without_proxy_is_retried() {
        let transport = Arc::new(TransportManager::with_timeouts(
            None,
            Duration::from_millis(200),
            Duration::from_millis(200),
        ));
        let executor =
            RequestExecutor::new(transport, "xai-test", "http://127.0.0.1:9", 2);

        let err = executor
            .execute("/images/generations", &json!({"prompt": "x"}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImageError::RetriesExhausted { attempts: 2, .. }
        ));
    }

    #[tokio::test]
    async fn malformed_200_body_is_retried_then_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let executor = executor_for(&server, 2);
        let err = executor
            .execute("/images/generations", &json!({"prompt": "x"}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImageError::RetriesExhausted { attempts: 2, .. }
        ));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}
