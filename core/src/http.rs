use crate::pool::PoolStats;
use crate::utils::Redact;
use crate::Result;
use bytes::Bytes;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// HttpSend is used to deliver signed requests.
///
/// Implementations are blocking: one call occupies the calling thread until the
/// full response body has been read. Any failure to deliver the request or read
/// the response must be reported as [`crate::ErrorKind::Transport`].
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;

    /// Point-in-time statistics of the connection pool behind this sender.
    ///
    /// Returns `None` if the sender is not backed by a bounded pool.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}

/// Per-phase timeouts applied by the transport.
///
/// `None` means wait forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    /// Max time to wait for a free connection slot in the pool.
    pub acquire: Option<Duration>,
    /// Max time to establish a connection.
    pub connect: Option<Duration>,
    /// Max time for the whole exchange, from sending the request until the
    /// response body has been read.
    ///
    /// The blocking transport has no per-read socket timeout, so this bounds
    /// the total response time rather than the gap between two reads.
    pub read: Option<Duration>,
}

/// Route all requests through a proxy, optionally with basic credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    /// Proxy host.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Username for proxy basic authentication.
    pub username: Option<String>,
    /// Password for proxy basic authentication.
    pub password: Option<String>,
}

impl ProxySettings {
    /// Create a proxy setting without credentials.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Attach basic credentials to this proxy.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// The proxy url, without credentials.
    pub fn url(&self) -> String {
        if self.host.contains("://") {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

impl Debug for ProxySettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &Redact::from(&self.password))
            .finish()
    }
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

impl HttpSend for NoopHttpSend {
    fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(crate::Error::transport(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}
