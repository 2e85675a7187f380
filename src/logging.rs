use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset: chatty in dev builds, quiet in release.
fn default_directive() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "warn" }
}

/// Install the global subscriber. Events go to stderr so stdout stays the
/// shell's own output.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive()));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
