//! @acp:module "Validate Command"
//! @acp:summary "Validate plan files against the plan schema"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::error::AtelierError;
use crate::plan::Plan;
use crate::schema;

/// Options for the validate command
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// File to validate
    pub file: PathBuf,
}

/// Execute the validate command
pub fn execute_validate(options: ValidateOptions) -> Result<()> {
    let content = std::fs::read_to_string(&options.file)?;
    let json: serde_json::Value = serde_json::from_str(&content)?;

    match schema::validate_plan(&json) {
        Ok(()) => {
            let plan: Plan = serde_json::from_value(json)?;
            println!(
                "{} Plan \"{}\" is valid ({} slides)",
                style("✓").green(),
                plan.title,
                plan.slide_count()
            );
            for (i, slide) in plan.slides.iter().enumerate() {
                println!("  {:>2}. [{}] {}", i + 1, slide.layout_type, slide.title);
            }
            Ok(())
        }
        Err(AtelierError::SchemaViolation(details)) => {
            eprintln!("{} {} is not a valid plan", style("✗").red(), options.file.display());
            for detail in details.split("; ") {
                eprintln!("  {}", detail);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
