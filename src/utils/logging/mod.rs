//! Logging setup
//!
//! Installs a `tracing` subscriber for hosts that do not bring their own.

use crate::config::CaptureSettings;
use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable single line output
    #[default]
    Text,
    /// One JSON object per line, suited to CloudWatch log insights
    Json,
}

/// Build the filter used by [`init_logging`]
///
/// `RUST_LOG` wins when set, otherwise the `debug` option selects between
/// `debug` and `info` for this crate.
pub fn default_filter(settings: &CaptureSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if settings.debug { "debug" } else { "info" };
        EnvFilter::new(format!("warn,moesif_lambda={}", level))
    })
}

/// Install a global `tracing` subscriber
///
/// Returns `false` when a subscriber was already installed by the host,
/// in which case the existing one is left untouched.
pub fn init_logging(settings: &CaptureSettings, format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(default_filter(settings))
        .with_target(false)
        .with_thread_ids(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.is_ok()
}
