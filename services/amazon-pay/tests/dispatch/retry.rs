use super::{client_for, fast_retries, runtime};
use crate::signing::verify_request;
use crate::{init_logger, no_headers, test_config};
use anyhow::Result;
use bytes::Bytes;
use http::{HeaderValue, Method, StatusCode};
use paysign_amazon_pay::{Config, Operation};
use paysign_core::Timeouts;
use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn to_http(req: &wiremock::Request) -> Result<http::Request<Bytes>> {
    let mut out = http::Request::builder()
        .method(req.method.as_str())
        .uri(req.url.as_str())
        .body(Bytes::from(req.body.clone()))?;
    for (name, value) in req.headers.iter() {
        out.headers_mut().append(name.as_str().parse::<http::HeaderName>()?, HeaderValue::from_bytes(value.as_bytes())?);
    }
    Ok(out)
}

#[test]
fn test_retry_then_success() -> Result<()> {
    init_logger();
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v2/charges"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server),
    );
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/v2/charges"))
            .and(header("x-amz-pay-region", "EU"))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-pay-idempotency-key"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("x-amz-pay-request-id", "7d2b9c3f-req")
                    .set_body_string(r#"{"chargeId":"S02-5105180-3221187-C056351"}"#),
            )
            .mount(&server),
    );

    let strategy = fast_retries(3);
    let client = client_for(
        &server,
        Config {
            retry_strategy: Some(strategy.clone()),
            ..test_config("EU")
        },
    );
    let payload = r#"{"chargePermissionId":"S02-1","chargeAmount":{"amount":"14.00","currencyCode":"EUR"}}"#;
    let resp = client.execute(&Operation::CREATE_CHARGE, &[], &[], payload, no_headers())?;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.retries, 2);
    assert!(resp.duration >= strategy.wait_time(0, 503) + strategy.wait_time(1, 503));
    assert_eq!(resp.request_id.as_deref(), Some("7d2b9c3f-req"));
    assert_eq!(
        resp.response.as_ref().map(|v| v["chargeId"].clone()),
        Some(serde_json::json!("S02-5105180-3221187-C056351"))
    );
    assert_eq!(resp.raw_request, payload);
    assert_eq!(resp.method, Method::POST);

    // Three attempts, all with the same signed headers, all verifiable.
    let received = rt.block_on(server.received_requests()).unwrap_or_default();
    assert_eq!(received.len(), 3);
    let first = &received[0].headers;
    for req in received.iter() {
        assert_eq!(req.headers.get("authorization"), first.get("authorization"));
        assert_eq!(
            req.headers.get("x-amz-pay-idempotency-key"),
            first.get("x-amz-pay-idempotency-key")
        );
        assert!(verify_request(&to_http(req)?)?);
    }
    Ok(())
}

#[test]
fn test_non_retryable_status_is_returned() -> Result<()> {
    init_logger();
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v2/charges/S02-missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"reasonCode":"ResourceNotFound"}"#),
            )
            .mount(&server),
    );

    let client = client_for(
        &server,
        Config {
            retry_strategy: Some(fast_retries(3)),
            ..test_config("NA")
        },
    );
    let resp = client.execute(&Operation::GET_CHARGE, &["S02-missing"], &[], "", no_headers())?;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.retries, 0);
    assert!(!resp.is_success());
    assert_eq!(resp.response.unwrap()["reasonCode"], "ResourceNotFound");
    assert_eq!(rt.block_on(server.received_requests()).unwrap_or_default().len(), 1);
    Ok(())
}

#[test]
fn test_query_reaches_server() -> Result<()> {
    init_logger();
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v2/reports"))
            .and(query_param("reportTypes", "_GET_FLAT_FILE_OFFAMAZONPAYMENTS_SETTLEMENT_DATA_"))
            .and(query_param("processingStatuses", "COMPLETED"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"reports":[]}"#))
            .mount(&server),
    );

    let client = client_for(&server, test_config("JP"));
    let resp = client.execute(
        &Operation::GET_REPORTS,
        &[],
        &[
            ("reportTypes", "_GET_FLAT_FILE_OFFAMAZONPAYMENTS_SETTLEMENT_DATA_"),
            ("processingStatuses", "COMPLETED"),
        ],
        "",
        no_headers(),
    )?;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.url.ends_with(
        "/v2/reports?processingStatuses=COMPLETED&reportTypes=_GET_FLAT_FILE_OFFAMAZONPAYMENTS_SETTLEMENT_DATA_"
    ));
    Ok(())
}

#[test]
fn test_patch_is_sent_as_patch() -> Result<()> {
    init_logger();
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("PATCH"))
            .and(path("/v2/checkoutSessions/session-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server),
    );

    let client = client_for(&server, test_config("EU"));
    let resp = client.execute(
        &Operation::UPDATE_CHECKOUT_SESSION,
        &["session-1"],
        &[],
        r#"{"webCheckoutDetails":{"checkoutResultReturnUrl":"https://a.com/merchant-confirm-page"}}"#,
        no_headers(),
    )?;

    assert!(resp.is_success());
    Ok(())
}

#[test]
fn test_read_timeout_is_not_retried() -> Result<()> {
    init_logger();
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_secs(2)))
            .mount(&server),
    );

    let client = client_for(
        &server,
        Config {
            retry_strategy: Some(fast_retries(3)),
            timeouts: Timeouts {
                read: Some(Duration::from_millis(200)),
                ..Default::default()
            },
            ..test_config("EU")
        },
    );
    let err = client
        .call(Method::GET, "v2/charges/S02-1", &[], "", no_headers())
        .unwrap_err();

    assert!(err.is_transport_error());
    assert_eq!(rt.block_on(server.received_requests()).unwrap_or_default().len(), 1);
    Ok(())
}
