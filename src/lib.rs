#![forbid(unsafe_code)]

//! @acp:module "Atelier Library"
//! @acp:summary "Aesthetic profile to portfolio plan, slide preview and PPTX template"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability experimental
//!
//! # Atelier
//!
//! Turns a photographer's aesthetic questionnaire into a portfolio plan.
//!
//! ## Features
//!
//! - **Structured generation**: one request to a text-generation provider,
//!   constrained and validated by a JSON Schema
//! - **Slide preview**: four layout templates rendered to the terminal or HTML
//! - **Template export**: the same templates written as a 16:9 PPTX deck
//!
//! ## Example
//!
//! ```rust,no_run
//! use atelier::{GeminiProvider, PlanRequester, Profile, ProviderOptions, Session};
//! use atelier::export::ExportOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let requester = PlanRequester::new(Box::new(GeminiProvider::new(ProviderOptions::default())));
//!     let mut session = Session::new(Profile::default());
//!
//!     session.generate(&requester).await?;
//!     let report = session.export(&ExportOptions::default())?;
//!     println!("{}", report.path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod plan;
pub mod preview;
pub mod profile;
pub mod provider;
pub mod requester;
pub mod schema;
pub mod session;

// Re-exports
pub use config::Config;
pub use error::{AtelierError, Result};
pub use export::{export_plan, ExportOptions, ExportReport};
pub use layout::{template_for, LayoutTemplate};
pub use plan::{LayoutTag, Palette, Plan, Slide};
pub use preview::{render_slide, PreviewOptions, SlideView};
pub use profile::{Profile, ProfileField, FIELDS};
pub use provider::{GeminiProvider, PlanProvider, ProviderOptions};
pub use requester::PlanRequester;
pub use session::{Screen, Session, Tab};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
