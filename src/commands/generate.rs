//! @acp:module "Generate Command"
//! @acp:summary "Interactive questionnaire, plan generation and results browser"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `atelier generate`: intake form, loading spinner, then a menu
//! over the Concept / Visual Layouts / Action Roadmap tabs with slide
//! navigation, template download and restart.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use super::output::{print_concept, print_roadmap, print_slide};
use crate::config::Config;
use crate::error::AtelierError;
use crate::profile::{Profile, FIELDS};
use crate::requester::PlanRequester;
use crate::session::{Session, Tab};

/// Rotating spinner captions while the provider is working
const LOADING_MESSAGES: [&str; 4] = [
    "Curating your aesthetic...",
    "Reading light and shadow...",
    "Balancing restraint and rebellion...",
    "Composing the portfolio...",
];

/// Options for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Profile file (JSON or YAML) used as the starting answers
    pub profile: Option<PathBuf>,
    /// Skip the questionnaire and menus: generate once, export, exit
    pub yes: bool,
    /// Write the generated plan JSON here
    pub save_plan: Option<PathBuf>,
    /// Override the export directory
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show(Tab),
    Previous,
    Next,
    Download,
    Restart,
    Quit,
}

/// Execute the generate command
pub async fn execute_generate(
    options: GenerateOptions,
    config: &Config,
    requester: PlanRequester,
) -> Result<()> {
    let profile = match &options.profile {
        Some(path) => Profile::load(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?,
        None => Profile::default(),
    };
    let mut session = Session::new(profile);

    if options.yes {
        return run_unattended(&mut session, &options, config, &requester).await;
    }

    println!(
        "\n{} {}\n",
        style("L'ÂME SILENCIEUSE").yellow().bold(),
        style("Define your aesthetic").dim()
    );

    loop {
        if let Some(error) = session.intake_error() {
            eprintln!("{} {}\n", style("✗").red(), error);
        }
        if !run_questionnaire(&mut session)? {
            println!("{} Nothing generated", style("→").dim());
            return Ok(());
        }

        if generate_with_spinner(&mut session, &requester).await.is_err() {
            continue;
        }
        if let (Some(path), Some(plan)) = (&options.save_plan, session.plan()) {
            plan.save(path)
                .with_context(|| format!("Failed to save plan to {}", path.display()))?;
            println!("{} Saved plan to {}", style("✓").green(), path.display());
        }

        match browse_results(&mut session, &options, config)? {
            Action::Restart => continue,
            _ => return Ok(()),
        }
    }
}

/// Walk the field table; returns false when the user declines to submit
fn run_questionnaire(session: &mut Session) -> Result<bool> {
    let theme = ColorfulTheme::default();
    for descriptor in FIELDS.iter() {
        let current = descriptor.get(session.profile()).to_string();
        let answer: String = Input::with_theme(&theme)
            .with_prompt(descriptor.label)
            .default(current)
            .allow_empty(true)
            .interact_text()?;
        session.set_field(descriptor.field, answer)?;
    }

    Ok(Confirm::with_theme(&theme)
        .with_prompt("Curate my identity?")
        .default(true)
        .interact()?)
}

async fn generate_with_spinner(
    session: &mut Session,
    requester: &PlanRequester,
) -> std::result::Result<(), AtelierError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.yellow} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(LOADING_MESSAGES[0]);
    spinner.enable_steady_tick(Duration::from_millis(120));

    let attempt = session.generate(requester);
    tokio::pin!(attempt);
    let mut ticker = tokio::time::interval(Duration::from_millis(2500));
    ticker.tick().await;
    let mut caption = 0;

    let outcome = loop {
        tokio::select! {
            outcome = &mut attempt => break outcome,
            _ = ticker.tick() => {
                caption = (caption + 1) % LOADING_MESSAGES.len();
                spinner.set_message(LOADING_MESSAGES[caption]);
            }
        }
    };
    spinner.finish_and_clear();
    outcome
}

fn menu(session: &Session) -> Vec<(String, Action)> {
    let Some(view) = session.results() else {
        return vec![("Quit".to_string(), Action::Quit)];
    };

    let mut items: Vec<(String, Action)> = Tab::ALL
        .iter()
        .map(|tab| {
            let marker = if *tab == view.tab { "•" } else { " " };
            (format!("{} {}", marker, tab.label()), Action::Show(*tab))
        })
        .collect();

    if view.tab == Tab::Slides {
        if view.slide_index > 0 {
            items.push(("  ← Previous slide".to_string(), Action::Previous));
        }
        if view.slide_index + 1 < view.plan.slide_count() {
            items.push(("  → Next slide".to_string(), Action::Next));
        }
    }
    items.push(("  Download template".to_string(), Action::Download));
    items.push(("  Start over".to_string(), Action::Restart));
    items.push(("  Quit".to_string(), Action::Quit));
    items
}

fn render(session: &Session, config: &Config) {
    let Some(view) = session.results() else {
        return;
    };
    match view.tab {
        Tab::Concept => print_concept(&view.plan),
        Tab::Slides => print_slide(&view.plan, view.slide_index, &config.preview),
        Tab::Roadmap => print_roadmap(&view.plan),
    }
}

fn download(session: &Session, options: &GenerateOptions, config: &Config) {
    let export_options = config.export_options(options.output_dir.clone());
    match session.export(&export_options) {
        Ok(report) => println!(
            "{} Saved {} ({} slides)",
            style("✓").green(),
            report.path.display(),
            report.slide_count
        ),
        Err(e) => eprintln!("{} Export failed: {}", style("✗").red(), e),
    }
}

/// Results loop; returns the action that left it (Restart or Quit)
fn browse_results(
    session: &mut Session,
    options: &GenerateOptions,
    config: &Config,
) -> Result<Action> {
    let theme = ColorfulTheme::default();
    loop {
        render(session, config);

        let items = menu(session);
        let labels: Vec<&str> = items.iter().map(|(label, _)| label.as_str()).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt("Navigate")
            .items(&labels)
            .default(0)
            .interact()?;

        match items[choice].1 {
            Action::Show(tab) => session.select_tab(tab),
            Action::Previous => session.previous_slide(),
            Action::Next => session.next_slide(),
            Action::Download => download(session, options, config),
            Action::Restart => {
                session.restart();
                return Ok(Action::Restart);
            }
            Action::Quit => return Ok(Action::Quit),
        }
    }
}

/// `--yes`: one attempt, save, export, print the concept
async fn run_unattended(
    session: &mut Session,
    options: &GenerateOptions,
    config: &Config,
    requester: &PlanRequester,
) -> Result<()> {
    println!("{} Generating portfolio plan...", style("→").cyan());
    generate_with_spinner(session, requester).await?;

    let plan = session
        .plan()
        .ok_or_else(|| anyhow::anyhow!("generation finished without a plan"))?;
    println!(
        "{} Generated \"{}\" ({} slides)",
        style("✓").green(),
        plan.title,
        plan.slide_count()
    );

    if let Some(path) = &options.save_plan {
        plan.save(path)
            .with_context(|| format!("Failed to save plan to {}", path.display()))?;
        println!("{} Saved plan to {}", style("✓").green(), path.display());
    }

    let report = session.export(&config.export_options(options.output_dir.clone()))?;
    println!(
        "{} Saved {} ({} slides)",
        style("✓").green(),
        report.path.display(),
        report.slide_count
    );

    print_concept(plan);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::fixtures;

    fn results_session() -> Session {
        let mut session = Session::default();
        session.begin_generation().unwrap();
        session
            .finish_generation(Ok(fixtures::velvet_and_ink()))
            .unwrap();
        session
    }

    fn actions(session: &Session) -> Vec<Action> {
        menu(session).into_iter().map(|(_, a)| a).collect()
    }

    #[test]
    fn test_menu_hides_navigation_outside_slides() {
        let session = results_session();
        let actions = actions(&session);
        assert!(!actions.contains(&Action::Next));
        assert!(!actions.contains(&Action::Previous));
        assert!(actions.contains(&Action::Download));
    }

    #[test]
    fn test_menu_navigation_at_edges() {
        let mut session = results_session();
        session.select_tab(Tab::Slides);
        let first = actions(&session);
        assert!(first.contains(&Action::Next));
        assert!(!first.contains(&Action::Previous));

        for _ in 0..3 {
            session.next_slide();
        }
        let last = actions(&session);
        assert!(!last.contains(&Action::Next));
        assert!(last.contains(&Action::Previous));
    }

    #[test]
    fn test_menu_marks_active_tab() {
        let session = results_session();
        let items = menu(&session);
        assert_eq!(items[0].0, "• Concept");
        assert_eq!(items[1].0, "  Visual Layouts");
    }
}
