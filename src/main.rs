#![forbid(unsafe_code)]
//! Atelier Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use atelier::commands::{
    execute_export, execute_generate, execute_preview, execute_profile, execute_validate,
    ExportCommandOptions, GenerateOptions, PreviewCommandOptions, ProfileOptions,
    ValidateOptions,
};
use atelier::config::DEFAULT_CONFIG_FILE;
use atelier::provider::FALLBACK_API_KEY_ENV;
use atelier::{Config, GeminiProvider, PlanRequester};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Curate a portfolio identity, preview its slides and export a PPTX template")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generation model (overrides the config file)
    #[arg(long, global = true, env = "ATELIER_MODEL")]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the questionnaire and generate a portfolio plan
    Generate {
        /// Start from a profile file (JSON or YAML)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Skip prompts: generate once, export the template and exit
        #[arg(short = 'y', long)]
        yes: bool,

        /// Save the generated plan as JSON
        #[arg(long)]
        save_plan: Option<PathBuf>,

        /// Directory for the exported template
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Preview a saved plan
    Preview {
        /// Plan JSON file
        plan: PathBuf,

        /// Show only this slide (1-based)
        #[arg(short, long)]
        slide: Option<usize>,

        /// Write an HTML deck instead of printing
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Export a saved plan as a PPTX template
    Export {
        /// Plan JSON file
        plan: PathBuf,

        /// Directory for the exported template
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Write the default questionnaire answers
    Profile {
        /// Output file (.json, .yaml, .yml); prints YAML when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a plan file against the schema
    Validate {
        /// Plan JSON file
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "atelier=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let mut config = Config::load_or_default(&cli.config);
    if let Some(model) = cli.model {
        config.provider.model = model;
    }

    let result = match cli.command {
        Commands::Generate { profile, yes, save_plan, output_dir } => {
            if config.provider.api_key().is_none() {
                tracing::warn!(
                    "No API key found in {} or {}; generation will fail",
                    config.provider.api_key_env,
                    FALLBACK_API_KEY_ENV
                );
            }
            let requester = PlanRequester::new(Box::new(GeminiProvider::new(config.provider.clone())));
            let options = GenerateOptions { profile, yes, save_plan, output_dir };
            execute_generate(options, &config, requester).await
        }

        Commands::Preview { plan, slide, html } => {
            let options = PreviewCommandOptions { plan, slide, html };
            execute_preview(options, &config)
        }

        Commands::Export { plan, output_dir } => {
            let options = ExportCommandOptions { plan, output_dir };
            execute_export(options, &config)
        }

        Commands::Profile { output } => execute_profile(ProfileOptions { output }),

        Commands::Validate { file } => execute_validate(ValidateOptions { file }),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("✗").red(), e);
        std::process::exit(1);
    }
    Ok(())
}
