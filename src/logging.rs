//! Subscriber setup shared by the binaries.
use tracing_subscriber::EnvFilter;

/// Install a `tracing` fmt subscriber on stderr.
///
/// `verbose` forces DEBUG; otherwise `RUST_LOG` is honoured and defaults to `warn`.
/// Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
