//! @acp:module "Export Command"
//! @acp:summary "Write a saved plan as a PPTX template"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::config::Config;
use crate::export::export_plan;
use crate::plan::Plan;

/// Options for the export command
#[derive(Debug, Clone)]
pub struct ExportCommandOptions {
    /// Plan JSON file
    pub plan: PathBuf,
    /// Override the configured output directory
    pub output_dir: Option<PathBuf>,
}

/// Execute the export command
pub fn execute_export(options: ExportCommandOptions, config: &Config) -> Result<()> {
    let plan = Plan::load(&options.plan)
        .with_context(|| format!("Failed to read plan {}", options.plan.display()))?;

    println!("{} Exporting \"{}\"...", style("→").cyan(), plan.title);
    let report = export_plan(&plan, &config.export_options(options.output_dir))?;
    println!(
        "{} Saved {} ({} slides)",
        style("✓").green(),
        report.path.display(),
        report.slide_count
    );
    Ok(())
}
