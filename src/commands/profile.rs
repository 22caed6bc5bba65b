//! @acp:module "Profile Command"
//! @acp:summary "Write the default questionnaire answers as an editable file"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::profile::Profile;

/// Options for the profile command
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Destination (.json, .yaml or .yml); stdout when absent
    pub output: Option<PathBuf>,
}

/// Execute the profile command
pub fn execute_profile(options: ProfileOptions) -> Result<()> {
    let profile = Profile::default();
    match options.output {
        Some(path) => {
            profile.save(&path)?;
            println!("{} Created {}", style("✓").green(), path.display());
            println!(
                "  Edit it, then run {}",
                style(format!("atelier generate --profile {}", path.display())).cyan()
            );
        }
        None => print!("{}", serde_yaml::to_string(&profile)?),
    }
    Ok(())
}
