//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::ExportOptions;
use crate::preview::PreviewOptions;
use crate::provider::ProviderOptions;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".atelier.config.json";

fn default_config_schema() -> String {
    "https://atelier.studio/schemas/v1/config.schema.json".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// @acp:summary "Main atelier configuration structure"
/// @acp:lock normal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON Schema URL for editor support
    #[serde(rename = "$schema", default = "default_config_schema")]
    pub schema: String,

    /// Config format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Generation provider settings
    #[serde(default)]
    pub provider: ProviderOptions,

    /// PPTX export settings
    #[serde(default)]
    pub export: ExportOptions,

    /// Slide preview settings
    #[serde(default)]
    pub preview: PreviewOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: default_config_schema(),
            version: default_version(),
            provider: ProviderOptions::default(),
            export: ExportOptions::default(),
            preview: PreviewOptions::default(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a .atelier.config.json file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from the given path, falling back to defaults"
    ///
    /// A missing file is normal; an unreadable one is logged and ignored.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Export options with the output directory overridden when given
    pub fn export_options(&self, output_dir: Option<PathBuf>) -> ExportOptions {
        let mut options = self.export.clone();
        if let Some(dir) = output_dir {
            options.output_dir = dir;
        }
        options
    }
}
