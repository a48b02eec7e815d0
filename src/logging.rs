//! Logging setup for the skylight CLI

use tracing_subscriber::EnvFilter;

/// Initialize tracing output on stderr.
///
/// `RUST_LOG` overrides the default level when set.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "skylight=debug"
    } else {
        "skylight=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
