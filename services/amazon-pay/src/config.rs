use crate::constants::*;
use crate::{Environment, Region, RetryStrategy, SignatureAlgorithm};
use log::warn;
use paysign_core::utils::Redact;
use paysign_core::{Context, Error, ProxySettings, Result, Timeouts};
use paysign_http_send_reqwest::DEFAULT_MAX_CONNECTIONS;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Config for Amazon Pay.
///
/// Region, public key id and one of `private_key` / `private_key_path` are
/// required, everything else has a default.
#[derive(Clone, Default)]
pub struct Config {
    /// Region such as `NA`, `EU` or `JP`. `US`, `UK` and `DE` are accepted too.
    pub region: Option<String>,
    /// `live` or `sandbox`, defaults to `live`.
    ///
    /// Ignored if the public key id starts with `LIVE` or `SANDBOX`.
    pub environment: Option<String>,
    /// Id of the public key registered in Seller Central.
    pub public_key_id: Option<String>,
    /// PEM encoded private key, PKCS#8 or PKCS#1.
    pub private_key: Option<String>,
    /// Path to a PEM encoded private key, `~` is expanded.
    ///
    /// Only used when `private_key` is not set.
    pub private_key_path: Option<String>,
    /// `AMZN-PAY-RSASSA-PSS` (default) or `AMZN-PAY-RSASSA-PSS-V2`.
    pub algorithm: Option<String>,
    /// Send every region to this base url instead of the Amazon Pay hosts.
    pub endpoint: Option<String>,
    /// Max connections of the pool, defaults to 20.
    pub max_connections: Option<usize>,
    /// Max connections to one host, defaults to `max_connections`.
    pub max_connections_per_route: Option<usize>,
    /// Pool acquire, connect and read timeouts.
    pub timeouts: Timeouts,
    /// Send every request through this proxy.
    pub proxy: Option<ProxySettings>,
    /// Retry strategy, defaults to [`crate::DefaultRetryStrategy`].
    pub retry_strategy: Option<Arc<dyn RetryStrategy>>,
    /// Hide runtime, os and architecture in the `user-agent` header.
    pub redact_user_agent: bool,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("environment", &self.environment)
            .field("public_key_id", &Redact::from(&self.public_key_id))
            .field("private_key", &Redact::from(&self.private_key))
            .field("private_key_path", &self.private_key_path)
            .field("algorithm", &self.algorithm)
            .field("endpoint", &self.endpoint)
            .field("max_connections", &self.max_connections)
            .field("max_connections_per_route", &self.max_connections_per_route)
            .field("timeouts", &self.timeouts)
            .field("proxy", &self.proxy)
            .field("retry_strategy", &self.retry_strategy)
            .field("redact_user_agent", &self.redact_user_agent)
            .finish()
    }
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        Self::default().with_env_defaults(ctx)
    }

    /// Fill every field that is still `None` from environment variables.
    pub fn with_env_defaults(mut self, ctx: &Context) -> Self {
        let env = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        self.region = self.region.or_else(|| env(AMAZON_PAY_REGION));
        self.environment = self.environment.or_else(|| env(AMAZON_PAY_ENVIRONMENT));
        self.public_key_id = self.public_key_id.or_else(|| env(AMAZON_PAY_PUBLIC_KEY_ID));
        self.private_key = self.private_key.or_else(|| env(AMAZON_PAY_PRIVATE_KEY));
        self.private_key_path = self
            .private_key_path
            .or_else(|| env(AMAZON_PAY_PRIVATE_KEY_PATH));
        self.algorithm = self.algorithm.or_else(|| env(AMAZON_PAY_ALGORITHM));
        self.endpoint = self.endpoint.or_else(|| env(AMAZON_PAY_ENDPOINT));
        self.max_connections = self.max_connections.or_else(|| {
            let v = env(AMAZON_PAY_MAX_CONNECTIONS)?;
            v.parse()
                .map_err(|_| warn!("ignoring {AMAZON_PAY_MAX_CONNECTIONS}={v}: not a number"))
                .ok()
        });
        self
    }

    /// Check the config and resolve every setting the client needs.
    pub(crate) fn resolve(&self) -> Result<Settings> {
        let region: Region = self
            .region
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("region is required"))?
            .parse()?;
        let public_key_id = self
            .public_key_id
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("public key id is required"))?;
        if self.private_key.as_deref().unwrap_or_default().is_empty()
            && self.private_key_path.as_deref().unwrap_or_default().is_empty()
        {
            return Err(Error::config_invalid(
                "private key or private key path is required",
            ));
        }

        let environment = match self.environment.as_deref() {
            Some(v) => v.parse()?,
            None => Environment::default(),
        };
        let algorithm = match self.algorithm.as_deref() {
            Some(v) => v.parse()?,
            None => SignatureAlgorithm::default(),
        };

        let max_connections = self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(Error::config_invalid("max connections must be at least 1"));
        }
        let max_connections_per_route = self.max_connections_per_route.unwrap_or(max_connections);
        if max_connections_per_route == 0 {
            return Err(Error::config_invalid(
                "max connections per route must be at least 1",
            ));
        }

        Ok(Settings {
            region,
            environment,
            algorithm,
            public_key_id,
            max_connections,
            max_connections_per_route,
        })
    }
}

/// Validated view of a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub region: Region,
    pub environment: Environment,
    pub algorithm: SignatureAlgorithm,
    pub public_key_id: String,
    pub max_connections: usize,
    pub max_connections_per_route: usize,
}
