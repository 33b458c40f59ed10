/// Install the global `tracing` subscriber.
///
/// Reads `RUST_LOG`, falling back to `default_filter`. Output goes to stderr
/// so stdout stays free for reports.
pub fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
