//! Logging: subscriber setup for binaries and tests embedding the pipeline.
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set (ex: `RUST_LOG=consol_assembly=debug,consol_store=warn`);
/// otherwise `default_filter` applies.
/// A second call is a no-op.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}
