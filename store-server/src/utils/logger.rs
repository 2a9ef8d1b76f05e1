//! Logging setup

/// Initialize the tracing subscriber
///
/// Log level comes from `RUST_LOG`, defaulting to `store_server=info`.
pub fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "store_server=info".into()),
        )
        .init();
}
