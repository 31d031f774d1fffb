use crate::canonical::{canonical_query_pairs, CanonicalRequest};
use crate::constants::{
    APPLICATION_JSON, REDACTED, SDK_NAME, SDK_VERSION, X_AMZ_PAY_DATE, X_AMZ_PAY_HOST,
    X_AMZ_PAY_REGION,
};
use crate::{Credential, Region, SignatureAlgorithm};
use http::request::Parts;
use http::{header, HeaderMap, HeaderValue};
use log::{debug, warn};
use paysign_core::hash::{base64_encode, hex_sha256};
use paysign_core::time::{format_iso8601, now, DateTime};
use paysign_core::{Context, Error, Result, SignRequest, SigningRequest};
use rsa::pss::BlindedSigningKey;
use rsa::sha2::Sha256;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;

/// RequestSigner that implements the Amazon Pay RSASSA-PSS scheme.
///
/// Every signed request carries `accept`, `content-type`, `x-amz-pay-region`,
/// `x-amz-pay-date` and `x-amz-pay-host`. Caller supplied headers win over
/// these defaults, except `authorization` and `user-agent` which are always
/// computed here.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    region: Region,
    algorithm: SignatureAlgorithm,
    redact_user_agent: bool,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given region.
    pub fn new(region: Region, algorithm: SignatureAlgorithm) -> Self {
        Self {
            region,
            algorithm,
            redact_user_agent: false,

            time: None,
        }
    }

    /// Hide the runtime, os and architecture in the `user-agent` header.
    pub fn with_redacted_user_agent(mut self, redact: bool) -> Self {
        self.redact_user_agent = redact;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// The algorithm used by this signer.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Sign a button payload.
    ///
    /// The payload is signed exactly as given, so it must be the same string
    /// that is handed to the checkout button.
    pub fn sign_button(&self, cred: &Credential, payload: &str) -> Result<String> {
        let string_to_sign = string_to_sign(self.algorithm, payload);
        debug!("calculated button string to sign: {string_to_sign}");

        sign_pss(&cred.private_key, self.algorithm, string_to_sign.as_bytes())
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let now = self.time.unwrap_or_else(now);
        let mut signing_req = SigningRequest::build(req)?;

        signing_req.headers = mandatory_headers(
            std::mem::take(&mut signing_req.headers),
            self.region,
            signing_req.authority.host(),
            now,
        )?;

        let creq = CanonicalRequest::from_signing_request(&signing_req, body)?;
        debug!("calculated canonical request: {creq}");

        // The path stays as given so encoded ids keep their `%2F`.
        signing_req.query = canonical_query_pairs(&signing_req.query);

        let string_to_sign = string_to_sign(self.algorithm, &creq.to_string());
        debug!("calculated string to sign: {string_to_sign}");

        let signature = sign_pss(&cred.private_key, self.algorithm, string_to_sign.as_bytes())?;

        let mut authorization = HeaderValue::from_str(&format!(
            "{} PublicKeyId={}, SignedHeaders={}, Signature={}",
            self.algorithm.name(),
            cred.public_key_id,
            creq.signed_headers,
            signature
        ))
        .map_err(|e| {
            Error::request_invalid("failed to build authorization header").with_source(e)
        })?;
        authorization.set_sensitive(true);

        signing_req
            .headers
            .insert(header::AUTHORIZATION, authorization);
        signing_req.headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&user_agent(self.redact_user_agent))?,
        );

        signing_req.apply(req)
    }
}

/// Merge the caller headers over the headers every call must carry.
fn mandatory_headers(
    caller: HeaderMap,
    region: Region,
    host: &str,
    now: DateTime,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(caller.keys_len() + 5);
    headers.insert(header::ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(APPLICATION_JSON),
    );
    headers.insert(X_AMZ_PAY_REGION, HeaderValue::from_static(region.as_str()));
    headers.insert(X_AMZ_PAY_DATE, HeaderValue::from_str(&format_iso8601(now))?);
    headers.insert(X_AMZ_PAY_HOST, HeaderValue::from_str(host)?);

    let mut last = None;
    for (name, value) in caller {
        // `None` means the value belongs to the previous name.
        let name = match name {
            Some(name) => {
                if name == header::AUTHORIZATION || name == header::USER_AGENT {
                    warn!("header {name} is computed by the signer, the given value is ignored");
                    last = None;
                    continue;
                }
                headers.remove(&name);
                last = Some(name.clone());
                name
            }
            None => match &last {
                Some(name) => name.clone(),
                None => continue,
            },
        };
        headers.append(name, value);
    }

    Ok(headers)
}

/// Build the string to sign of a canonical request or button payload.
///
/// ```text
/// <algorithm>\n<hex sha256 of content>
/// ```
pub fn string_to_sign(algorithm: SignatureAlgorithm, content: &str) -> String {
    format!("{}\n{}", algorithm.name(), hex_sha256(content.as_bytes()))
}

fn sign_pss(key: &RsaPrivateKey, algorithm: SignatureAlgorithm, msg: &[u8]) -> Result<String> {
    let signing_key =
        BlindedSigningKey::<Sha256>::new_with_salt_len(key.clone(), algorithm.salt_len());
    let signature = signing_key
        .try_sign_with_rng(&mut rand::thread_rng(), msg)
        .map_err(|e| Error::signing_failed("failed to sign with RSASSA-PSS").with_source(e))?;

    Ok(base64_encode(&signature.to_bytes()))
}

/// The `user-agent` sent with every call.
///
/// ```text
/// amazon-pay-api-sdk-rust/0.1.0 (Rust/1.75.0; linux/x86_64)
/// ```
pub fn user_agent(redact: bool) -> String {
    let (runtime, os, arch) = if redact {
        (REDACTED, REDACTED, REDACTED)
    } else {
        (
            env!("PAYSIGN_RUSTC_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    };

    format!("{SDK_NAME}/{SDK_VERSION} (Rust/{runtime}; {os}/{arch})")
}
