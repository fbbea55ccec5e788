//! Skip policy for suites that need the embedded PostgreSQL cluster.
//!
//! A cluster that fails to start is a test failure unless
//! `SKIP_TEST_CLUSTER` is truthy ("1", "true" or "yes", any case).

pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster setup failure: `None` when skipping is allowed,
/// otherwise a panic naming the cause.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
