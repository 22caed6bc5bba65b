//! @acp:module "Preview Command"
//! @acp:summary "Show a saved plan's slides in the terminal or as an HTML page"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use console::style;

use super::output::{print_concept, print_roadmap, print_slide};
use crate::config::Config;
use crate::plan::Plan;
use crate::preview::render_deck_html;

/// Options for the preview command
#[derive(Debug, Clone)]
pub struct PreviewCommandOptions {
    /// Plan JSON file
    pub plan: PathBuf,
    /// One-based slide to show; all slides when absent
    pub slide: Option<usize>,
    /// Write a standalone HTML deck here instead of printing
    pub html: Option<PathBuf>,
}

/// Execute the preview command
pub fn execute_preview(options: PreviewCommandOptions, config: &Config) -> Result<()> {
    let plan = Plan::load(&options.plan)
        .with_context(|| format!("Failed to read plan {}", options.plan.display()))?;

    if let Some(path) = &options.html {
        let html = render_deck_html(&plan, &config.preview)?;
        std::fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{} Wrote {} slides to {}",
            style("✓").green(),
            plan.slide_count(),
            path.display()
        );
        return Ok(());
    }

    match options.slide {
        Some(n) => {
            if n == 0 || n > plan.slide_count() {
                bail!(
                    "slide {} is out of range (plan has {} slides)",
                    n,
                    plan.slide_count()
                );
            }
            print_slide(&plan, n - 1, &config.preview);
        }
        None => {
            print_concept(&plan);
            for index in 0..plan.slide_count() {
                print_slide(&plan, index, &config.preview);
            }
            print_roadmap(&plan);
        }
    }
    Ok(())
}
