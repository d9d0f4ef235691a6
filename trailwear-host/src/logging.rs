//! Logging setup for hosts that do not install their own subscriber.

use tracing_subscriber::EnvFilter;
use trailwear_core::config::GeneralConfig;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `general.log_level`. Returns `false` if a global
/// subscriber was already installed (by the host or an earlier call).
pub fn init_logging(general: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if general.log_json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
