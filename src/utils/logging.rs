use tracing_subscriber::EnvFilter;

// Logs go to stderr so the interactive menu keeps stdout to itself.
// RUST_LOG overrides the default `info` level.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        // disable printing the name of the module in every log line.
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
