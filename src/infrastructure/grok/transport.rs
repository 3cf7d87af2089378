//! Transport session management.
//!
//! A single pooled `reqwest::Client` is shared by all requests. The session
//! is created lazily, replaced wholesale when the executor detects a
//! connection-level failure, and dropped exactly once on shutdown.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Proxy};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::errors::ImageError;

/// TCP connect timeout per attempt.
pub const TCP_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Total per-request timeout ceiling at the transport layer. Distinct from
/// the caller-level end-to-end deadline.
pub const TCP_TOTAL_TIMEOUT: Duration = Duration::from_secs(300);

const MAX_IDLE_PER_HOST: usize = 5;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const USER_AGENT: &str = concat!("grok-image/", env!("CARGO_PKG_VERSION"));

/// A live network session: connection pool plus its bound proxy.
///
/// The proxy is an explicit field, fixed for the lifetime of the session.
#[derive(Debug)]
pub struct TransportSession {
    /// Pooled HTTP client.
    pub client: Client,
    /// Proxy URL every request through this session uses, if any.
    pub proxy: Option<String>,
}

/// Owns the shared transport session and its (re)creation policy.
pub struct TransportManager {
    session: RwLock<Option<Arc<TransportSession>>>,
    proxy: Option<String>,
    connect_timeout: Duration,
    total_timeout: Duration,
}

impl TransportManager {
    /// Creates a manager. Proxy precedence (HTTPS over HTTP) is resolved by
    /// the caller; the value passed here is final for every session built.
    #[must_use]
    pub fn new(proxy: Option<String>) -> Self {
        Self::with_timeouts(proxy, TCP_CONNECT_TIMEOUT, TCP_TOTAL_TIMEOUT)
    }

    /// Creates a manager with custom timeouts (useful for testing).
    #[must_use]
    pub fn with_timeouts(
        proxy: Option<String>,
        connect_timeout: Duration,
        total_timeout: Duration,
    ) -> Self {
        Self {
            session: RwLock::new(None),
            proxy,
            connect_timeout,
            total_timeout,
        }
    }

    /// Returns the configured proxy URL, if any.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Returns the live session, building one if none exists.
    ///
    /// Creation is guarded: a read-lock fast path serves the common case,
    /// and the write path re-checks so concurrent callers never race two
    /// live sessions into existence.
    ///
    /// # Errors
    /// Returns error if the HTTP client or proxy cannot be constructed.
    pub async fn acquire(&self) -> Result<Arc<TransportSession>, ImageError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut slot = self.session.write().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let session = Arc::new(self.build_session()?);
        debug!(
            proxy = session.proxy.as_deref().unwrap_or("none"),
            "Created transport session"
        );
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Discards the current session. The next acquire builds a fresh one.
    pub async fn invalidate(&self) {
        let mut slot = self.session.write().await;
        if slot.take().is_some() {
            debug!("Discarded transport session");
        }
    }

    /// Releases the session. Idempotent: closing an absent session is a no-op.
    pub async fn shutdown(&self) {
        let mut slot = self.session.write().await;
        if slot.take().is_some() {
            info!("Transport session closed");
        }
    }

    fn build_session(&self) -> Result<TransportSession, ImageError> {
        // Ambient env proxies are explicitly ignored; only the configured
        // proxy applies. IPv4-only resolution via the local bind address.
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(self.connect_timeout)
            .timeout(self.total_timeout)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .tcp_keepalive(Duration::from_secs(60))
            .local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .no_proxy();

        if let Some(url) = &self.proxy {
            let proxy = Proxy::all(url)
                .map_err(|e| ImageError::proxy(format!("invalid proxy URL {url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ImageError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(TransportSession {
            client,
            proxy: self.proxy.clone(),
        })
    }
}
