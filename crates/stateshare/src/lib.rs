pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber; `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stateshare={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
