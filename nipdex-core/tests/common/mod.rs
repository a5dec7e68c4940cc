//! Test helper functions for integration tests
//!
//! Shared across test files using the tests/common/ pattern.

use std::path::PathBuf;
use std::sync::Once;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Path of the README excerpt fixture
pub fn readme_fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("nips_readme.md")
}

/// Contents of the README excerpt fixture
pub fn readme_fixture() -> String {
    std::fs::read_to_string(readme_fixture_path()).expect("fixture should be readable")
}
