use clap::Parser;
use std::path::PathBuf;

/// Default location of the raw events file.
pub const DEFAULT_INPUT_PATH: &str = "data/raw_events.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarise user events from a CSV export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "event-insights",
    about = "Summarise user events from a CSV export",
    version
)]
pub struct Settings {
    /// Path to the raw events CSV file
    #[arg(long, env = "EVENT_INSIGHTS_INPUT", default_value = DEFAULT_INPUT_PATH)]
    pub input_path: PathBuf,

    /// Skip rows that fail conversion instead of aborting the run
    #[arg(long)]
    pub skip_invalid: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["event-insights"]);

        // The env override is only set by callers outside the test suite.
        if std::env::var_os("EVENT_INSIGHTS_INPUT").is_none() {
            assert_eq!(settings.input_path, PathBuf::from("data/raw_events.csv"));
        }
        assert!(!settings.skip_invalid);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_input_path() {
        let settings =
            Settings::parse_from(["event-insights", "--input-path", "/tmp/events.csv"]);
        assert_eq!(settings.input_path, PathBuf::from("/tmp/events.csv"));
    }

    #[test]
    fn test_settings_cli_skip_invalid() {
        let settings = Settings::parse_from(["event-insights", "--skip-invalid"]);
        assert!(settings.skip_invalid);
    }

    #[test]
    fn test_settings_rejects_unknown_log_level() {
        let result = Settings::try_parse_from(["event-insights", "--log-level", "TRACE"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_args_debug_overrides_log_level() {
        let settings =
            Settings::load_from_args(["event-insights", "--log-level", "ERROR", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_from_args_keeps_explicit_log_level() {
        let settings = Settings::load_from_args(["event-insights", "--log-level", "WARNING"]);
        assert_eq!(settings.log_level, "WARNING");
    }
}
