use super::{client_for, runtime};
use crate::{init_logger, no_headers, test_config};
use anyhow::Result;
use http::{Method, StatusCode};
use paysign_amazon_pay::Config;
use paysign_core::Timeouts;
use pretty_assertions::assert_eq;
use std::thread;
use std::time::{Duration, Instant};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_concurrent_calls_share_one_pool() -> Result<()> {
    init_logger();
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server),
    );

    let client = client_for(
        &server,
        Config {
            max_connections: Some(2),
            ..test_config("EU")
        },
    );

    let handles: Vec<_> = (0..6)
        .map(|idx| {
            let client = client.clone();
            thread::spawn(move || {
                client.call(
                    Method::GET,
                    &format!("v2/charges/S02-{idx}"),
                    &[],
                    "",
                    no_headers(),
                )
            })
        })
        .collect();

    // Two calls hold the slots while the others wait for one.
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut saw_waiting = false;
    while Instant::now() < deadline {
        let stats = client.pool_stats().expect("reqwest sender has a pool");
        assert!(stats.leased <= 2, "{stats}");
        if stats.leased == 2 && stats.pending > 0 {
            saw_waiting = true;
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert!(saw_waiting, "no caller waited for a connection slot");

    for handle in handles {
        let resp = handle.join().expect("thread must not panic")?;
        assert_eq!(resp.status, StatusCode::OK);
    }

    let stats = client.pool_stats().expect("reqwest sender has a pool");
    assert_eq!(stats.max, 2);
    assert_eq!(stats.leased, 0);
    assert_eq!(stats.pending, 0);
    assert!(stats.available <= 2);
    Ok(())
}

#[test]
fn test_acquire_timeout_is_transport_error() -> Result<()> {
    init_logger();
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
            .mount(&server),
    );

    let client = client_for(
        &server,
        Config {
            max_connections: Some(1),
            timeouts: Timeouts {
                acquire: Some(Duration::from_millis(50)),
                ..Default::default()
            },
            ..test_config("EU")
        },
    );

    let busy = {
        let client = client.clone();
        thread::spawn(move || client.call(Method::GET, "v2/charges/S02-1", &[], "", no_headers()))
    };
    thread::sleep(Duration::from_millis(200));

    let err = client
        .call(Method::GET, "v2/charges/S02-2", &[], "", no_headers())
        .unwrap_err();
    assert!(err.is_transport_error());

    assert!(busy.join().expect("thread must not panic")?.is_success());
    Ok(())
}
