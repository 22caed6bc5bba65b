//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Provides implementations for all CLI commands.
//! Each command is in its own submodule for maintainability.

pub mod export;
pub mod generate;
pub mod output;
pub mod preview;
pub mod profile;
pub mod validate;

pub use export::{execute_export, ExportCommandOptions};
pub use generate::{execute_generate, GenerateOptions};
pub use output::{format_palette, print_concept, print_roadmap, print_slide};
pub use preview::{execute_preview, PreviewCommandOptions};
pub use profile::{execute_profile, ProfileOptions};
pub use validate::{execute_validate, ValidateOptions};
