mod button;
mod verify;

use anyhow::{anyhow, Result};
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName};
use paysign_amazon_pay::canonical::CanonicalRequest;
use paysign_amazon_pay::{string_to_sign, SignatureAlgorithm};
use paysign_core::hash::base64_decode;
use rsa::pkcs8::DecodePublicKey;
use rsa::pss::{Signature, VerifyingKey};
use rsa::sha2::Sha256;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;

/// Check a signature the way the service does: with the public key and
/// nothing but the received request.
pub fn verify_signature(salt_len: usize, msg: &str, signature: &str) -> Result<bool> {
    let public_key = RsaPublicKey::from_public_key_pem(crate::PUBLIC_KEY)?;
    let verifying_key = VerifyingKey::<Sha256>::new_with_salt_len(public_key, salt_len);
    let signature = Signature::try_from(base64_decode(signature)?.as_slice())?;
    Ok(verifying_key.verify(msg.as_bytes(), &signature).is_ok())
}

/// Fields of an `authorization` header.
#[derive(Debug)]
pub struct Authorization {
    pub algorithm: SignatureAlgorithm,
    pub public_key_id: String,
    pub signed_headers: String,
    pub signature: String,
}

pub fn parse_authorization(value: &str) -> Result<Authorization> {
    let (algorithm, rest) = value
        .split_once(' ')
        .ok_or_else(|| anyhow!("authorization without algorithm: {value}"))?;

    let mut public_key_id = None;
    let mut signed_headers = None;
    let mut signature = None;
    for field in rest.split(", ") {
        match field.split_once('=') {
            Some(("PublicKeyId", v)) => public_key_id = Some(v.to_string()),
            Some(("SignedHeaders", v)) => signed_headers = Some(v.to_string()),
            Some(("Signature", v)) => signature = Some(v.to_string()),
            _ => return Err(anyhow!("unexpected authorization field: {field}")),
        }
    }

    Ok(Authorization {
        algorithm: algorithm.parse()?,
        public_key_id: public_key_id.ok_or_else(|| anyhow!("missing PublicKeyId"))?,
        signed_headers: signed_headers.ok_or_else(|| anyhow!("missing SignedHeaders"))?,
        signature: signature.ok_or_else(|| anyhow!("missing Signature"))?,
    })
}

/// Rebuild the string to sign of a received request and check its signature.
pub fn verify_request(req: &http::Request<Bytes>) -> Result<bool> {
    let auth = parse_authorization(req.headers()[header::AUTHORIZATION].to_str()?)?;

    // Transports add headers of their own, only the listed ones are signed.
    let mut headers = HeaderMap::new();
    for name in auth.signed_headers.split(';') {
        for value in req.headers().get_all(name) {
            headers.append(HeaderName::from_bytes(name.as_bytes())?, value.clone());
        }
    }
    let query: Vec<(String, String)> =
        form_urlencoded::parse(req.uri().query().unwrap_or_default().as_bytes())
            .into_owned()
            .collect();

    let creq = CanonicalRequest::new(req.method(), req.uri().path(), &query, &headers, req.body())?;
    let msg = string_to_sign(auth.algorithm, &creq.to_string());
    verify_signature(auth.algorithm.salt_len(), &msg, &auth.signature)
}
