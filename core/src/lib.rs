//! Core components for signing and sending API requests.
//!
//! This crate provides the foundational types and traits for the paysign ecosystem.
//! Everything here is synchronous: one request occupies one calling thread.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending, and environment access
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and request signing (`SignRequest`)
//! - **Signer**: The orchestrator that caches the credential and signs requests with it
//! - **ConnectionPool**: Bounded slot accounting shared by all in-flight requests of one client
//!
//! ## Example
//!
//! ```
//! use paysign_core::{Context, ProvideCredential, Result, SignRequest, SigningCredential, Signer};
//! use http::HeaderValue;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         req: &mut http::request::Parts,
//!         _body: &[u8],
//!         cred: Option<&Self::Credential>,
//!     ) -> Result<()> {
//!         if let Some(cred) = cred {
//!             req.headers.insert("x-key", HeaderValue::from_str(&cred.key)?);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let signer = Signer::new(Context::new(), MyLoader, MySigner);
//!
//! let mut parts = http::Request::get("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//! signer.sign(&mut parts, b"")?;
//! assert_eq!(parts.headers["x-key"], "my-key");
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Hashing and base64 helpers
//! - [`time`]: Time formatting helpers
//! - [`utils`]: General utilities including data redaction
//! - [`pool`]: Connection pool accounting and statistics

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod pool;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{Context, NoopFileRead};
mod fs;
pub use fs::FileRead;
mod http;
pub use self::http::{HttpSend, NoopHttpSend, ProxySettings, Timeouts};
mod env;
pub use env::{Env, NoopEnv, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
