use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber: compact output with uptime timestamps.
///
/// `RUST_LOG` takes precedence; `default_filter` applies when it is unset or
/// unparsable.
///
/// ```bash
/// RUST_LOG=debug cargo run                              # everything
/// RUST_LOG=marketplace_cart::actors=debug cargo run     # cart service only
/// ```
pub fn setup_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
