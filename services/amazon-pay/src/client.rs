use crate::config::Settings;
use crate::constants::{AMAZON_PAY_QUERY_ENCODE_SET, X_AMZ_PAY_REQUEST_ID};
use crate::operation::ensure_idempotency_key;
use crate::retry::is_retryable;
use crate::{
    Config, ConfigCredentialProvider, Credential, DefaultRetryStrategy, Endpoint, EndpointTable,
    Operation, RequestSigner, Response, RetryStrategy,
};
use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method};
use log::{debug, info, warn};
use paysign_core::pool::PoolStats;
use paysign_core::{Context, Error, OsEnv, Result, Signer};
use paysign_file_read_std::StdFileRead;
use paysign_http_send_reqwest::ReqwestHttpSend;
use percent_encoding::utf8_percent_encode;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Client signs and dispatches Amazon Pay calls.
///
/// A client is cheap to clone and safe to share between threads; all clones use
/// the same connection pool, credential and retry strategy.
///
/// ```no_run
/// use paysign_amazon_pay::{Client, Config, Operation};
/// use http::HeaderMap;
///
/// # fn main() -> paysign_core::Result<()> {
/// let client = Client::new(Config {
///     region: Some("EU".to_string()),
///     environment: Some("sandbox".to_string()),
///     public_key_id: Some("AGPLVMDL3RNVV3X7MM3YUZ2V".to_string()),
///     private_key_path: Some("~/.amazon-pay/private.pem".to_string()),
///     ..Default::default()
/// })?;
///
/// let resp = client.execute(
///     &Operation::GET_CHARGE,
///     &["S02-5105180-3221187-C056351"],
///     &[],
///     "",
///     HeaderMap::new(),
/// )?;
/// println!("{} after {} retries: {}", resp.status, resp.retries, resp.raw_response);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    signer: Signer<Credential>,
    request_signer: RequestSigner,
    endpoints: Arc<EndpointTable>,
    retry_strategy: Arc<dyn RetryStrategy>,
    settings: Arc<Settings>,
}

impl Client {
    /// Create a client that reads keys from disk and sends with a pooled
    /// reqwest client configured from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let settings = config.resolve()?;

        let mut http = ReqwestHttpSend::builder()
            .with_max_connections(settings.max_connections)
            .with_max_connections_per_route(settings.max_connections_per_route)
            .with_timeouts(config.timeouts);
        if let Some(proxy) = config.proxy.clone() {
            http = http.with_proxy(proxy);
        }

        let ctx = Context::new()
            .with_file_read(StdFileRead)
            .with_http_send(http.build()?)
            .with_env(OsEnv);
        Self::with_context(ctx, config)
    }

    /// Create a client on top of an existing context.
    ///
    /// Transport settings of `config` are ignored, the context's sender is
    /// used as is. The credential is loaded right away so a bad key fails here
    /// instead of on the first call.
    pub fn with_context(ctx: Context, config: Config) -> Result<Self> {
        let settings = config.resolve()?;

        let endpoints = match config.endpoint.as_deref() {
            Some(endpoint) => EndpointTable::default().with_override(endpoint),
            None => EndpointTable::default(),
        };
        let retry_strategy = config
            .retry_strategy
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultRetryStrategy::default()));
        let request_signer = RequestSigner::new(settings.region, settings.algorithm)
            .with_redacted_user_agent(config.redact_user_agent);

        let signer = Signer::new(
            ctx,
            ConfigCredentialProvider::new(Arc::new(config)),
            request_signer.clone(),
        );
        signer.credential()?;

        Ok(Self {
            signer,
            request_signer,
            endpoints: Arc::new(endpoints),
            retry_strategy,
            settings: Arc::new(settings),
        })
    }

    /// Replace the region to base url table.
    pub fn with_endpoint_table(mut self, endpoints: EndpointTable) -> Self {
        self.endpoints = Arc::new(endpoints);
        self
    }

    /// The retry strategy shared by every call of this client.
    pub fn retry_strategy(&self) -> &Arc<dyn RetryStrategy> {
        &self.retry_strategy
    }

    /// Statistics of the connection pool, if the transport has one.
    pub fn pool_stats(&self) -> Option<PoolStats> {
        self.signer.context().pool_stats()
    }

    /// Resolve the endpoint of a resource such as `v2/charges`.
    pub fn endpoint(&self, resource: &str) -> Endpoint {
        Endpoint::resolve(
            &self.endpoints,
            self.settings.region,
            self.settings.environment,
            &self.settings.public_key_id,
            resource,
        )
    }

    /// Call an operation of the API table.
    ///
    /// `ids` fill the placeholders of the operation path in order. Operations
    /// flagged idempotent get an `x-amz-pay-idempotency-key` unless `headers`
    /// already carries one.
    pub fn execute(
        &self,
        operation: &Operation,
        ids: &[&str],
        query: &[(&str, &str)],
        payload: &str,
        mut headers: HeaderMap,
    ) -> Result<Response> {
        let resource = operation.resource(ids)?;
        if operation.idempotent {
            ensure_idempotency_key(&mut headers)?;
        }

        self.call(operation.method.clone(), &resource, query, payload, headers)
    }

    /// Sign and send any call.
    ///
    /// `url` is either absolute or a resource such as `v2/charges/S02-1` that is
    /// resolved against the configured region and environment.
    pub fn call(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        payload: &str,
        headers: HeaderMap,
    ) -> Result<Response> {
        let req = self.sign(method, url, query, payload, headers)?;
        self.dispatch(req)
    }

    /// Sign a call without sending it.
    ///
    /// The returned request carries every signed header, `authorization` and
    /// `user-agent` included, and the canonical form of its url.
    pub fn sign(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        payload: &str,
        headers: HeaderMap,
    ) -> Result<http::Request<Bytes>> {
        let uri = self.build_url(url, query);
        debug!("signing {method} {uri}");

        let mut req = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::copy_from_slice(payload.as_bytes()))?;
        *req.headers_mut() = headers;

        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts, &body)?;
        Ok(http::Request::from_parts(parts, body))
    }

    /// Sign a checkout button payload.
    ///
    /// The payload is signed byte for byte, pass the exact string the button
    /// is rendered with.
    pub fn generate_button_signature(&self, payload: &str) -> Result<String> {
        let cred = self.signer.credential()?;
        self.request_signer.sign_button(&cred, payload)
    }

    /// Serialize `payload` as JSON and sign it as a checkout button payload.
    ///
    /// Returns the serialized payload together with its signature, the button
    /// must be rendered with exactly this payload.
    pub fn generate_button_signature_json<T: Serialize>(
        &self,
        payload: &T,
    ) -> Result<(String, String)> {
        let payload = serde_json::to_string(payload).map_err(|e| {
            Error::request_invalid("failed to serialize button payload").with_source(e)
        })?;
        let signature = self.generate_button_signature(&payload)?;
        Ok((payload, signature))
    }

    fn build_url(&self, url: &str, query: &[(&str, &str)]) -> String {
        let mut url = if url.starts_with("https://") || url.starts_with("http://") {
            url.to_string()
        } else {
            self.endpoint(url).url()
        };

        for (idx, (k, v)) in query.iter().enumerate() {
            url.push(if idx == 0 && !url.contains('?') { '?' } else { '&' });
            url.extend(utf8_percent_encode(k, &AMAZON_PAY_QUERY_ENCODE_SET));
            url.push('=');
            url.extend(utf8_percent_encode(v, &AMAZON_PAY_QUERY_ENCODE_SET));
        }
        url
    }

    /// Send a signed request, retrying retryable statuses.
    ///
    /// Every attempt sends the same signed headers. Transport failures are
    /// returned right away and never retried.
    fn dispatch(&self, req: http::Request<Bytes>) -> Result<Response> {
        let (parts, body) = req.into_parts();
        let max_retries = self.retry_strategy.max_retries();
        let start = Instant::now();

        let mut retries = 0;
        let resp = loop {
            let resp = self
                .signer
                .context()
                .http_send(attempt(&parts, &body))?;

            let status = resp.status().as_u16();
            if !is_retryable(status) || retries >= max_retries {
                break resp;
            }

            let wait = self.retry_strategy.wait_time(retries, status);
            retries += 1;
            info!(
                "{} {} returned {status}, retry {retries}/{max_retries} in {wait:?}",
                parts.method, parts.uri
            );
            std::thread::sleep(wait);
        };
        let duration = start.elapsed();

        let status = resp.status();
        let request_id = resp
            .headers()
            .get(X_AMZ_PAY_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let raw_response = String::from_utf8_lossy(resp.body()).into_owned();
        let response = if raw_response.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&raw_response)
                .map_err(|e| warn!("response of {} {} is not json: {e}", parts.method, parts.uri))
                .ok()
        };
        debug!(
            "{} {} finished with {status} after {retries} retries in {duration:?}, request id {request_id:?}",
            parts.method, parts.uri
        );

        Ok(Response {
            url: parts.uri.to_string(),
            method: parts.method,
            raw_request: String::from_utf8_lossy(&body).into_owned(),
            headers: parts.headers,
            status,
            raw_response,
            response,
            request_id,
            retries,
            duration,
        })
    }
}

/// Rebuild the signed request for one attempt.
fn attempt(parts: &Parts, body: &Bytes) -> http::Request<Bytes> {
    let mut req = http::Request::new(body.clone());
    *req.method_mut() = parts.method.clone();
    *req.uri_mut() = parts.uri.clone();
    *req.version_mut() = parts.version;
    *req.headers_mut() = parts.headers.clone();
    req
}
