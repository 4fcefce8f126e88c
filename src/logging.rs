use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CODEWRAP_LOG";
const DEFAULT_FILTER: &str = "codewrap=info";

/// Installs the global subscriber. Later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
