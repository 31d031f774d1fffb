use super::{parse_authorization, verify_request};
use crate::{init_logger, no_headers, test_config};
use anyhow::Result;
use bytes::Bytes;
use http::{header, HeaderValue, Method};
use paysign_amazon_pay::{Client, Config, SignatureAlgorithm};
use paysign_core::Context;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn client(config: Config) -> Result<Client> {
    Ok(Client::with_context(Context::new(), config)?)
}

#[test_case(None, SignatureAlgorithm::Default; "default algorithm")]
#[test_case(Some("AMZN-PAY-RSASSA-PSS-V2"), SignatureAlgorithm::V2; "v2 algorithm")]
fn test_signed_request_verifies(algorithm: Option<&str>, expected: SignatureAlgorithm) -> Result<()> {
    init_logger();
    let client = client(Config {
        algorithm: algorithm.map(str::to_string),
        ..test_config("EU")
    })?;

    let req = client.sign(
        Method::POST,
        "v2/charges",
        &[],
        r#"{"chargePermissionId":"S02-1","chargeAmount":{"amount":"14.00","currencyCode":"EUR"}}"#,
        no_headers(),
    )?;

    let auth = parse_authorization(req.headers()[header::AUTHORIZATION].to_str()?)?;
    assert_eq!(auth.algorithm, expected);
    assert_eq!(auth.public_key_id, "SANDBOX-AHXQ2C3ZTESTKEY");
    assert_eq!(
        auth.signed_headers,
        "accept;content-type;x-amz-pay-date;x-amz-pay-host;x-amz-pay-region"
    );
    assert!(verify_request(&req)?);
    Ok(())
}

#[test]
fn test_tampered_body_fails_verification() -> Result<()> {
    let client = client(test_config("NA"))?;
    let req = client.sign(Method::POST, "v2/refunds", &[], r#"{"amount":"1.00"}"#, no_headers())?;

    let (parts, _) = req.into_parts();
    let tampered = http::Request::from_parts(parts, Bytes::from_static(br#"{"amount":"100.00"}"#));
    assert!(!verify_request(&tampered)?);
    Ok(())
}

#[test]
fn test_tampered_header_fails_verification() -> Result<()> {
    let client = client(test_config("NA"))?;
    let mut req = client.sign(Method::GET, "v2/charges/S02-1", &[], "", no_headers())?;

    req.headers_mut()
        .insert("x-amz-pay-region", HeaderValue::from_static("EU"));
    assert!(!verify_request(&req)?);
    Ok(())
}

#[test]
fn test_special_characters_in_query_verify() -> Result<()> {
    let client = client(test_config("JP"))?;
    let special = "@#$%^&+=/,?><`\";:\\|][{} ";
    let req = client.sign(
        Method::GET,
        "v2/reports",
        &[
            (special, special),
            ("f oo", "b ar"),
            ("\u{1234}", "bar"),
            ("empty", ""),
        ],
        "",
        no_headers(),
    )?;

    assert!(verify_request(&req)?);
    Ok(())
}

#[test]
fn test_caller_headers_are_signed() -> Result<()> {
    let client = client(test_config("EU"))?;
    let mut headers = no_headers();
    headers.insert("X-Amz-Pay-Authtoken", HeaderValue::from_static("buyer-token"));
    headers.insert("x-amz-pay-region", HeaderValue::from_static("NA"));

    let req = client.sign(Method::GET, "v2/buyers/token", &[], "", headers)?;

    assert_eq!(req.headers()["x-amz-pay-region"], "NA");
    let auth = parse_authorization(req.headers()[header::AUTHORIZATION].to_str()?)?;
    assert_eq!(
        auth.signed_headers,
        "accept;content-type;x-amz-pay-authtoken;x-amz-pay-date;x-amz-pay-host;x-amz-pay-region"
    );
    assert!(verify_request(&req)?);
    Ok(())
}

#[test]
fn test_redacted_user_agent() -> Result<()> {
    let client = client(Config {
        redact_user_agent: true,
        ..test_config("EU")
    })?;
    let req = client.sign(Method::GET, "v2/charges/S02-1", &[], "", no_headers())?;

    assert!(req.headers()[header::USER_AGENT]
        .to_str()?
        .ends_with("(Rust/Redacted; Redacted/Redacted)"));
    Ok(())
}
