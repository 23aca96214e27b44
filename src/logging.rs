use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to stderr so stdout carries
/// only what a tool prints for shell consumption.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env() // uses RUST_LOG
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
