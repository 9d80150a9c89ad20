use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use insights_core::settings::Settings;
use insights_data::converter::ConversionPolicy;

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto an [`EnvFilter`] directive.
///
/// Unrecognised names are passed through; [`setup_logging`] falls back to
/// `"info"` if the result does not parse.
pub fn filter_directive(log_level: &str) -> String {
    let upper = log_level.to_uppercase();
    match upper.as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Log output goes to stderr so that stdout carries only the report.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Settings → pipeline options ────────────────────────────────────────────────

pub fn conversion_policy(settings: &Settings) -> ConversionPolicy {
    if settings.skip_invalid {
        ConversionPolicy::SkipInvalid
    } else {
        ConversionPolicy::Abort
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
