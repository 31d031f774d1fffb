//! Canonical request construction.
//!
//! ```text
//! <METHOD>\n
//! <canonical uri>\n
//! <canonical query>\n
//! <name>:<value>\n      (one line per signed header)
//! \n
//! <signed header names joined by ';'>\n
//! <hex sha256 of payload>
//! ```

use crate::constants::{AMAZON_PAY_QUERY_ENCODE_SET, AMAZON_PAY_URI_ENCODE_SET};
use http::HeaderMap;
use http::Method;
use paysign_core::hash::hex_sha256;
use paysign_core::utils::collapse_whitespace;
use paysign_core::{Result, SigningRequest};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::{Display, Formatter};

/// The deterministic form of a request that is hashed into the string to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Upper-case HTTP method.
    pub method: String,
    /// Normalized and encoded path.
    pub uri: String,
    /// Encoded and sorted query.
    pub query: String,
    /// One `name:value\n` line per signed header, sorted by name.
    pub headers: String,
    /// Signed header names joined by `;`.
    pub signed_headers: String,
    /// Hex SHA-256 of the payload.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// `path` may be percent-encoded, `query` pairs must be decoded.
    pub fn new(
        method: &Method,
        path: &str,
        query: &[(String, String)],
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Self> {
        let (headers, signed_headers) = canonical_headers(headers)?;

        Ok(Self {
            method: method.as_str().to_ascii_uppercase(),
            uri: canonical_uri(path),
            query: SigningRequest::query_to_string(canonical_query_pairs(query), "=", "&"),
            headers,
            signed_headers,
            payload_hash: hex_sha256(body),
        })
    }

    /// Build the canonical request of a signing request.
    pub fn from_signing_request(req: &SigningRequest, body: &[u8]) -> Result<Self> {
        Self::new(&req.method, &req.path, &req.query, &req.headers, body)
    }

    /// Hex SHA-256 of the canonical string.
    pub fn hash(&self) -> String {
        hex_sha256(self.to_string().as_bytes())
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        // The header block already ends with a newline, so an empty line
        // separates it from the signed header names.
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Normalize a request path.
///
/// The path is percent-decoded, runs of `/` are collapsed and the result is
/// encoded again. An empty path becomes `/`.
pub fn canonical_uri(path: &str) -> String {
    let decoded = percent_decode_str(path).decode_utf8_lossy();

    let mut collapsed = String::with_capacity(decoded.len() + 1);
    for c in decoded.chars() {
        if c == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(c);
    }
    if !collapsed.starts_with('/') {
        collapsed.insert(0, '/');
    }

    utf8_percent_encode(&collapsed, &AMAZON_PAY_URI_ENCODE_SET).to_string()
}

/// Encode every query pair and sort them by name, then by value.
pub fn canonical_query_pairs(query: &[(String, String)]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AMAZON_PAY_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AMAZON_PAY_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    pairs.sort();
    pairs
}

/// Render the canonical header block and the signed header list.
///
/// Values of a repeated header are joined by `,`, every value is trimmed and
/// its inner whitespace collapsed.
pub fn canonical_headers(headers: &HeaderMap) -> Result<(String, String)> {
    let mut names: Vec<&str> = headers.keys().map(|k| k.as_str()).collect();
    names.sort_unstable();

    let mut block = String::with_capacity(256);
    for name in names.iter() {
        let values = headers
            .get_all(*name)
            .iter()
            .map(|v| v.to_str().map(collapse_whitespace))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        block.push_str(name);
        block.push(':');
        block.push_str(&values.join(","));
        block.push('\n');
    }

    Ok((block, names.join(";")))
}
