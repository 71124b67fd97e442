mod config_tests;
mod message_tests;
mod stream_tests;

/// Installs a test-writer subscriber so `tracing` output shows up on failures.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
