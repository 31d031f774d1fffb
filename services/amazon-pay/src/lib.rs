//! Amazon Pay signing and dispatch for paysign.
//!
//! This crate signs Amazon Pay API v2 requests with RSASSA-PSS and delivers
//! them through a bounded connection pool, retrying transient failures.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paysign_amazon_pay::{Client, Config, Operation};
//! use http::HeaderMap;
//!
//! # fn main() -> paysign_core::Result<()> {
//! let client = Client::new(Config {
//!     region: Some("NA".to_string()),
//!     public_key_id: Some("SANDBOX-AGPLVMDL3RNVV3X7MM3YUZ2V".to_string()),
//!     private_key_path: Some("/etc/amazon-pay/private.pem".to_string()),
//!     ..Default::default()
//! })?;
//!
//! let payload = r#"{"chargePermissionId":"S01-5105180-3221187","chargeAmount":{"amount":"14.00","currencyCode":"USD"}}"#;
//! let resp = client.execute(&Operation::CREATE_CHARGE, &[], &[], payload, HeaderMap::new())?;
//! if resp.is_success() {
//!     println!("created: {:?}", resp.response);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Signing without a client
//!
//! [`RequestSigner`] implements `SignRequest`, so it can be plugged into a
//! `paysign_core::Signer` with any credential provider:
//!
//! ```no_run
//! use paysign_amazon_pay::{Region, RequestSigner, SignatureAlgorithm, StaticCredentialProvider};
//! use paysign_core::{Context, Signer};
//!
//! # fn main() -> paysign_core::Result<()> {
//! let pem = std::fs::read_to_string("private.pem")?;
//! let loader = StaticCredentialProvider::new("LIVE-AGPLVMDL3RNVV3X7MM3YUZ2V", &pem)?;
//! let builder = RequestSigner::new(Region::Eu, SignatureAlgorithm::V2);
//! let signer = Signer::new(Context::new(), loader, builder);
//!
//! let mut parts = http::Request::get("https://pay-api.amazon.eu/v2/charges/S02-1")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, b"")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! [`Config::from_env`] reads:
//!
//! ```bash
//! export AMAZON_PAY_REGION=EU
//! export AMAZON_PAY_ENVIRONMENT=sandbox
//! export AMAZON_PAY_PUBLIC_KEY_ID=AGPLVMDL3RNVV3X7MM3YUZ2V
//! export AMAZON_PAY_PRIVATE_KEY_PATH=~/.amazon-pay/private.pem
//! export AMAZON_PAY_ALGORITHM=AMZN-PAY-RSASSA-PSS-V2  # Optional
//! export AMAZON_PAY_ENDPOINT=http://localhost:8080    # Optional
//! export AMAZON_PAY_MAX_CONNECTIONS=50               # Optional
//! ```

#![warn(missing_docs)]

mod algorithm;
pub use algorithm::SignatureAlgorithm;

pub mod canonical;

mod client;
pub use client::Client;

mod config;
pub use config::Config;

mod constants;

mod credential;
pub use credential::Credential;

mod endpoint;
pub use endpoint::{Endpoint, EndpointTable, Environment, Region};

pub mod operation;
pub use operation::Operation;

mod provide_credential;
pub use provide_credential::*;

mod response;
pub use response::Response;

mod retry;
pub use retry::{is_retryable, DefaultRetryStrategy, ExponentialRetryStrategy, RetryStrategy};

mod sign_request;
pub use sign_request::{string_to_sign, user_agent, RequestSigner};
