mod pool;
mod retry;

use paysign_amazon_pay::{Client, Config, ExponentialRetryStrategy, RetryStrategy};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("runtime must build")
}

pub fn fast_retries(max_retries: u32) -> Arc<dyn RetryStrategy> {
    Arc::new(ExponentialRetryStrategy::new(
        max_retries,
        Duration::from_millis(20),
    ))
}

/// A real client whose every region points at the mock server.
pub fn client_for(server: &MockServer, config: Config) -> Client {
    Client::new(Config {
        endpoint: Some(server.uri()),
        ..config
    })
    .expect("client must build")
}
