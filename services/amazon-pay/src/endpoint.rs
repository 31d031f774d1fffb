use paysign_core::Error;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Amazon Pay region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// North America, also known as `US`.
    Na,
    /// Europe, also known as `UK` and `DE`.
    Eu,
    /// Japan.
    Jp,
}

impl Region {
    /// Value sent in the `x-amz-pay-region` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Na => "NA",
            Region::Eu => "EU",
            Region::Jp => "JP",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "na" | "us" => Ok(Region::Na),
            "eu" | "uk" | "de" => Ok(Region::Eu),
            "jp" => Ok(Region::Jp),
            _ => Err(Error::config_invalid(format!("{s} is not a valid region"))),
        }
    }
}

/// Amazon Pay environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// Production.
    #[default]
    Live,
    /// Testing.
    Sandbox,
}

impl Environment {
    /// Path segment of this environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Live => "live",
            Environment::Sandbox => "sandbox",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "live" => Ok(Environment::Live),
            "sandbox" => Ok(Environment::Sandbox),
            _ => Err(Error::config_invalid(format!(
                "{s} is not a valid environment"
            ))),
        }
    }
}

/// Immutable region to base url lookup.
///
/// Built once and shared by reference; tests substitute hosts through
/// [`EndpointTable::with_base_url`] or [`EndpointTable::with_override`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    base_urls: HashMap<Region, String>,
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self {
            base_urls: HashMap::from([
                (Region::Na, "https://pay-api.amazon.com".to_string()),
                (Region::Eu, "https://pay-api.amazon.eu".to_string()),
                (Region::Jp, "https://pay-api.amazon.jp".to_string()),
            ]),
        }
    }
}

impl EndpointTable {
    /// Replace the base url of one region.
    ///
    /// A value without scheme is taken as an https host.
    pub fn with_base_url(mut self, region: Region, base_url: &str) -> Self {
        self.base_urls.insert(region, normalize_base_url(base_url));
        self
    }

    /// Send every region to the same base url.
    pub fn with_override(self, base_url: &str) -> Self {
        let base_url = normalize_base_url(base_url);
        Self {
            base_urls: self
                .base_urls
                .into_keys()
                .map(|region| (region, base_url.clone()))
                .collect(),
        }
    }

    /// Base url of the given region, without trailing slash.
    pub fn base_url(&self, region: Region) -> &str {
        self.base_urls
            .get(&region)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if base_url.contains("://") {
        base_url.to_string()
    } else {
        format!("https://{base_url}")
    }
}

/// A resolved API location. Immutable per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Region the call is addressed to.
    pub region: Region,
    /// Environment segment in the path, `None` when the public key id already
    /// names its environment.
    pub environment: Option<Environment>,
    /// Scheme and authority, for example `https://pay-api.amazon.eu`.
    pub base_url: String,
    /// Absolute path, for example `/sandbox/v2/charges/S02-1`.
    pub path: String,
}

impl Endpoint {
    /// Resolve the endpoint of `resource` (for example `v2/charges`).
    ///
    /// Public key ids starting with `LIVE` or `SANDBOX` (in any case) carry their
    /// environment, so the environment segment is left out of the path.
    pub fn resolve(
        table: &EndpointTable,
        region: Region,
        environment: Environment,
        public_key_id: &str,
        resource: &str,
    ) -> Self {
        let resource = resource.trim_start_matches('/');
        let key_id = public_key_id.to_ascii_uppercase();
        let environment =
            if key_id.starts_with("LIVE") || key_id.starts_with("SANDBOX") {
                None
            } else {
                Some(environment)
            };

        let path = match environment {
            Some(env) => format!("/{env}/{resource}"),
            None => format!("/{resource}"),
        };

        Self {
            region,
            environment,
            base_url: table.base_url(region).to_string(),
            path,
        }
    }

    /// Full url of this endpoint, without query.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}
