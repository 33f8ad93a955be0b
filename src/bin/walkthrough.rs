//! Runs the five canonical scenarios top to bottom and logs each stage.
//!
//! ```text
//! cargo run --bin walkthrough [config.json]
//! RUST_LOG=likert_rs=debug cargo run --bin walkthrough
//! ```

use likert_rs::{scenarios, PipelineConfig, Result};
use tracing::{info, info_span, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };
    info!(?config, "walkthrough");

    for scenario in scenarios::all()? {
        let _span = info_span!("scenario", name = scenario.name).entered();
        info!(description = scenario.description, "begin");

        let pipeline = match scenario.run(&config) {
            Ok(p) => p,
            Err(e) => {
                // a failed variant does not stop the others
                warn!(error = %e, "scenario aborted");
                continue;
            }
        };

        if let Some(report) = pipeline.report() {
            for item in &report.items {
                info!(
                    item = %item.name,
                    r_drop = item.corrected_item_total_r,
                    alpha_if_dropped = ?item.alpha_if_dropped,
                    reversed = item.reversed,
                    "item"
                );
            }
            if let Some(worst) = report.most_improving_drop() {
                info!(item = %worst.name, "dropping this item raises alpha");
            }
        }
        for c in pipeline.comparisons() {
            info!(
                mode = %c.mode,
                r = c.fit.standardized_slope,
                r_squared = c.fit.r_squared,
                "composite vs {}",
                c.criterion
            );
        }
    }
    Ok(())
}
