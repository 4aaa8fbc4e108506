// Shared helpers for integration tests
//
// Functions appear "unused" because each test binary compiles separately.
#![allow(dead_code)]

use acceptance_harness::testing::{FakeDriver, FakeHeaderProbe};
use acceptance_harness::{Context, HarnessConfig};
use std::sync::Arc;

/// Version header value sent by the fake application
pub const VERSION_HEADER_VALUE: &str = "2.414.1 (private-build-acceptance)";

/// Root address of the fake application
pub const ROOT: &str = "http://localhost:8080/jenkins/";

/// Installs a tracing subscriber once per test binary (RUST_LOG controls it).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Context over `driver` with a fake version header and default config.
pub fn context_with(driver: Arc<FakeDriver>) -> Arc<Context> {
    context_with_config(driver, HarnessConfig::default())
}

pub fn context_with_config(driver: Arc<FakeDriver>, config: HarnessConfig) -> Arc<Context> {
    Context::builder(driver)
        .config(config)
        .header_probe(Arc::new(FakeHeaderProbe::new(Some(VERSION_HEADER_VALUE))))
        .build()
        .expect("Failed to build context")
}

pub fn root_url() -> url::Url {
    url::Url::parse(ROOT).expect("Invalid root URL")
}
