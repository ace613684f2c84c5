pub mod builders;
pub mod fake_executor;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing once per test binary.
///
/// Reads the same `DAGMAKE_LOG` variable as the binary, but takes full
/// `EnvFilter` directives (e.g. `dagmake::dag=debug`). Defaults to `info`
/// for dagmake itself so a failing test shows which targets were scheduled
/// and skipped; captured output is only printed for failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("DAGMAKE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn,dagmake=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
