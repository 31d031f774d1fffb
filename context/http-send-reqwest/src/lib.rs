//! Blocking reqwest transport for paysign.
//!
//! [`ReqwestHttpSend`] implements `HttpSend` on top of `reqwest::blocking`,
//! bounded by a [`ConnectionPool`] shared by every clone of the sender.
//!
//! ```no_run
//! use paysign_core::{Context, ProxySettings, Timeouts};
//! use paysign_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn main() -> paysign_core::Result<()> {
//! let http = ReqwestHttpSend::builder()
//!     .with_max_connections(50)
//!     .with_timeouts(Timeouts {
//!         acquire: Some(Duration::from_secs(5)),
//!         connect: Some(Duration::from_secs(3)),
//!         read: Some(Duration::from_secs(30)),
//!     })
//!     .with_proxy(ProxySettings::new("proxy.internal", 3128).with_basic_auth("user", "secret"))
//!     .build()?;
//!
//! let ctx = Context::new().with_http_send(http);
//! println!("{}", ctx.pool_stats().unwrap());
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use log::debug;
use paysign_core::pool::{ConnectionPool, PoolStats};
use paysign_core::{Error, HttpSend, ProxySettings, Result, Timeouts};
use reqwest::blocking::Client;

/// Default max connections of the pool.
pub const DEFAULT_MAX_CONNECTIONS: usize = 20;

/// Blocking HTTP sender backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
    pool: ConnectionPool,
}

impl Default for ReqwestHttpSend {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest blocking client and the
    /// default pool bounds.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            pool: ConnectionPool::new(DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS, None),
        }
    }

    /// Start configuring a sender.
    pub fn builder() -> ReqwestHttpSendBuilder {
        ReqwestHttpSendBuilder::default()
    }
}

impl HttpSend for ReqwestHttpSend {
    fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let route = route_of(req.uri());
        let _lease = self.pool.acquire(&route)?;

        debug!("sending {} {}", req.method(), req.uri());
        let req = reqwest::blocking::Request::try_from(req.map(|body| body.to_vec()))
            .map_err(|e| Error::request_invalid("failed to build http request").with_source(e))?;
        let resp = self
            .client
            .execute(req)
            .map_err(|e| Error::transport(format!("failed to send request: {e}")).with_source(e))?;

        let status = resp.status();
        let version = resp.version();
        let headers = resp.headers().clone();
        let body = resp.bytes().map_err(|e| {
            Error::transport(format!("failed to read response body: {e}")).with_source(e)
        })?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.version_mut() = version;
        *out.headers_mut() = headers;
        Ok(out)
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(self.pool.stats())
    }
}

/// Builder of [`ReqwestHttpSend`].
#[derive(Debug, Clone)]
pub struct ReqwestHttpSendBuilder {
    max_connections: usize,
    max_connections_per_route: Option<usize>,
    timeouts: Timeouts,
    proxy: Option<ProxySettings>,
}

impl Default for ReqwestHttpSendBuilder {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_connections_per_route: None,
            timeouts: Timeouts::default(),
            proxy: None,
        }
    }
}

impl ReqwestHttpSendBuilder {
    /// Max connections across all routes.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Max connections to a single route. Defaults to the total.
    pub fn with_max_connections_per_route(mut self, max: usize) -> Self {
        self.max_connections_per_route = Some(max);
        self
    }

    /// Acquire, connect and read timeouts.
    ///
    /// `read` is applied as the reqwest request timeout, so it covers the
    /// whole exchange including the response body.
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Route every request through the given proxy.
    pub fn with_proxy(mut self, proxy: ProxySettings) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Build the sender.
    pub fn build(self) -> Result<ReqwestHttpSend> {
        let per_route = self
            .max_connections_per_route
            .unwrap_or(self.max_connections);

        let mut builder = Client::builder()
            .pool_max_idle_per_host(per_route)
            .timeout(self.timeouts.read);
        if let Some(connect) = self.timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        if let Some(settings) = &self.proxy {
            let mut proxy = reqwest::Proxy::all(settings.url()).map_err(|e| {
                Error::config_invalid(format!("invalid proxy {}", settings.url())).with_source(e)
            })?;
            match (&settings.username, &settings.password) {
                (Some(user), Some(password)) => proxy = proxy.basic_auth(user, password),
                (None, None) => {}
                _ => {
                    return Err(Error::config_invalid(format!(
                        "proxy {} needs both username and password for basic auth",
                        settings.url()
                    )))
                }
            }
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;

        Ok(ReqwestHttpSend {
            client,
            pool: ConnectionPool::new(self.max_connections, per_route, self.timeouts.acquire),
        })
    }
}

fn route_of(uri: &http::Uri) -> String {
    let scheme = uri.scheme_str().unwrap_or("https");
    let port = uri
        .port_u16()
        .unwrap_or(if scheme == "http" { 80 } else { 443 });
    format!("{scheme}://{}:{port}", uri.host().unwrap_or_default())
}
