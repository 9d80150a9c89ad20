mod bootstrap;
mod report;

use anyhow::{Context, Result};
use insights_core::settings::Settings;
use insights_data::analysis::analyze_events_file;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Event Insights v{} starting", env!("CARGO_PKG_VERSION"));

    let policy = bootstrap::conversion_policy(&settings);
    let result = analyze_events_file(&settings.input_path, policy)
        .with_context(|| format!("failed to analyse {}", settings.input_path.display()))?;

    if result.metadata.rows_skipped > 0 {
        tracing::warn!(
            "{} of {} rows were skipped",
            result.metadata.rows_skipped,
            result.metadata.rows_loaded
        );
    }

    println!();
    print!("{}", report::render_summary(&result.summary));

    Ok(())
}
