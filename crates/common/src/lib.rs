/// Unix timestamp in seconds.
pub fn get_current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Environment-backed configuration blocks implement this.
pub trait EnvVars {
    fn load() -> Self;
    fn get_env_var(&self, key: &str) -> String;
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// default `info` filter.
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}
