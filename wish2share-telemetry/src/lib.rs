use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_LOG_LEVEL: &str = "info,wish2share_draw=debug";
const VERBOSE_LOG_LEVEL: &str = "debug,wish2share_draw=trace";

/// The filter used when `RUST_LOG` is not set.
#[must_use]
pub const fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays machine readable.
///
/// Calling this twice is harmless, the second subscriber is ignored.
pub fn setup_logging(verbose: bool) {
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = tracing_subscriber::registry()
        .with(
            stderr_log.with_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_directives(verbose).into()),
            ),
        )
        .try_init();

    if let Err(error) = result {
        tracing::debug!(%error, "logging already initialized");
    }
}
