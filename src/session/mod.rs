//! @acp:module "Session"
//! @acp:summary "View controller for the intake, loading and results screens"
//! @acp:domain session
//! @acp:layer service
//!
//! A [`Session`] owns the profile and the current [`Screen`]. All state
//! changes go through its methods; renderers only read it.

use std::fmt;

use crate::error::{AtelierError, Result, GENERATION_FAILED_MESSAGE};
use crate::export::{export_plan, ExportOptions, ExportReport};
use crate::plan::{Plan, Slide};
use crate::profile::{Profile, ProfileField};
use crate::requester::PlanRequester;

/// Results screen tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Concept,
    Slides,
    Roadmap,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Concept, Tab::Slides, Tab::Roadmap];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Concept => "Concept",
            Tab::Slides => "Visual Layouts",
            Tab::Roadmap => "Action Roadmap",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// @acp:summary "State of the results screen"
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub plan: Plan,
    pub tab: Tab,
    /// Always within `0..plan.slides.len()` (0 for an empty deck)
    pub slide_index: usize,
}

impl ResultsView {
    fn new(plan: Plan) -> Self {
        Self {
            plan,
            tab: Tab::Concept,
            slide_index: 0,
        }
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.plan.slides.get(self.slide_index)
    }

    /// "SLIDE n / N" caption under the preview; "SLIDE 0 / 0" for an empty deck
    pub fn caption(&self) -> String {
        let total = self.plan.slide_count();
        let position = if total == 0 { 0 } else { self.slide_index + 1 };
        format!("SLIDE {} / {}", position, total)
    }
}

/// @acp:summary "Which screen is showing"
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Intake { error: Option<String> },
    Loading,
    Results(ResultsView),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Intake { .. } => "intake",
            Screen::Loading => "loading",
            Screen::Results(_) => "results",
        }
    }
}

/// @acp:summary "Profile plus current screen, mutated only through transitions"
#[derive(Debug, Clone)]
pub struct Session {
    profile: Profile,
    screen: Screen,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Profile::default())
    }
}

impl Session {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            screen: Screen::Intake { error: None },
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn results(&self) -> Option<&ResultsView> {
        match &self.screen {
            Screen::Results(view) => Some(view),
            _ => None,
        }
    }

    fn results_mut(&mut self) -> Option<&mut ResultsView> {
        match &mut self.screen {
            Screen::Results(view) => Some(view),
            _ => None,
        }
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.results().map(|view| &view.plan)
    }

    /// Error shown on the intake screen after a failed attempt
    pub fn intake_error(&self) -> Option<&str> {
        match &self.screen {
            Screen::Intake { error } => error.as_deref(),
            _ => None,
        }
    }

    fn invalid(&self, action: &str) -> AtelierError {
        AtelierError::InvalidState(format!(
            "cannot {} on the {} screen",
            action,
            self.screen.name()
        ))
    }

    /// Edit one answer; only allowed while on the intake screen
    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) -> Result<()> {
        if !matches!(self.screen, Screen::Intake { .. }) {
            return Err(self.invalid("edit the profile"));
        }
        self.profile.set(field, value);
        Ok(())
    }

    /// Replace the whole profile; only allowed while on the intake screen
    pub fn set_profile(&mut self, profile: Profile) -> Result<()> {
        if !matches!(self.screen, Screen::Intake { .. }) {
            return Err(self.invalid("replace the profile"));
        }
        self.profile = profile;
        Ok(())
    }

    /// @acp:summary "Intake -> Loading, returning the profile snapshot to send"
    pub fn begin_generation(&mut self) -> Result<Profile> {
        if !matches!(self.screen, Screen::Intake { .. }) {
            return Err(self.invalid("start generation"));
        }
        self.screen = Screen::Loading;
        tracing::debug!("Session -> loading");
        Ok(self.profile.clone())
    }

    /// @acp:summary "Loading -> Results on success, Loading -> Intake with message on failure"
    pub fn finish_generation(&mut self, outcome: Result<Plan>) -> Result<()> {
        if self.screen != Screen::Loading {
            return Err(self.invalid("finish generation"));
        }
        self.screen = match outcome {
            Ok(plan) => {
                tracing::debug!("Session -> results");
                Screen::Results(ResultsView::new(plan))
            }
            Err(e) => {
                tracing::debug!("Session -> intake after failure: {}", e);
                Screen::Intake {
                    error: Some(GENERATION_FAILED_MESSAGE.to_string()),
                }
            }
        };
        Ok(())
    }

    /// @acp:summary "Run one full generation attempt"
    ///
    /// Returns `GenerationFailed` after moving back to intake when the
    /// request fails.
    pub async fn generate(&mut self, requester: &PlanRequester) -> Result<()> {
        let snapshot = self.begin_generation()?;
        let outcome = requester.request(&snapshot).await;
        let failed = outcome.is_err();
        self.finish_generation(outcome)?;
        if failed {
            Err(AtelierError::GenerationFailed)
        } else {
            Ok(())
        }
    }

    /// Switch tabs; no-op outside the results screen
    pub fn select_tab(&mut self, tab: Tab) {
        if let Some(view) = self.results_mut() {
            view.tab = tab;
        }
    }

    /// Advance one slide, stopping at the last
    pub fn next_slide(&mut self) {
        if let Some(view) = self.results_mut() {
            let last = view.plan.slide_count().saturating_sub(1);
            view.slide_index = (view.slide_index + 1).min(last);
        }
    }

    /// Go back one slide, stopping at the first
    pub fn previous_slide(&mut self) {
        if let Some(view) = self.results_mut() {
            view.slide_index = view.slide_index.saturating_sub(1);
        }
    }

    /// @acp:summary "Results -> Intake; the plan is discarded, the profile kept"
    pub fn restart(&mut self) {
        if matches!(self.screen, Screen::Results(_)) {
            self.screen = Screen::Intake { error: None };
            tracing::debug!("Session -> intake (restart)");
        }
    }

    /// @acp:summary "Export the current plan as a PPTX template"
    pub fn export(&self, options: &ExportOptions) -> Result<ExportReport> {
        let plan = self
            .plan()
            .ok_or_else(|| AtelierError::InvalidState("no plan to export".to_string()))?;
        export_plan(plan, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{fixtures, LayoutTag};

    fn in_results() -> Session {
        let mut session = Session::default();
        session.begin_generation().unwrap();
        session
            .finish_generation(Ok(fixtures::velvet_and_ink()))
            .unwrap();
        session
    }

    #[test]
    fn test_starts_on_intake() {
        let session = Session::default();
        assert_eq!(session.screen(), &Screen::Intake { error: None });
        assert!(session.plan().is_none());
    }

    #[test]
    fn test_success_lands_on_concept_tab() {
        let session = in_results();
        let view = session.results().unwrap();
        assert_eq!(view.tab, Tab::Concept);
        assert_eq!(view.slide_index, 0);
        assert_eq!(view.caption(), "SLIDE 1 / 4");
    }

    #[test]
    fn test_failure_returns_to_intake_with_message() {
        let mut session = Session::default();
        session.begin_generation().unwrap();
        assert_eq!(session.screen(), &Screen::Loading);
        session
            .finish_generation(Err(AtelierError::GenerationFailed))
            .unwrap();
        assert_eq!(session.intake_error(), Some(GENERATION_FAILED_MESSAGE));

        // A failed attempt does not block the next one
        assert!(session.begin_generation().is_ok());
    }

    #[test]
    fn test_begin_requires_intake() {
        let mut session = in_results();
        assert!(matches!(
            session.begin_generation(),
            Err(AtelierError::InvalidState(_))
        ));

        let mut loading = Session::default();
        loading.begin_generation().unwrap();
        assert!(loading.begin_generation().is_err());
    }

    #[test]
    fn test_finish_requires_loading() {
        let mut session = Session::default();
        assert!(session
            .finish_generation(Ok(fixtures::velvet_and_ink()))
            .is_err());
    }

    #[test]
    fn test_navigation_saturates() {
        let mut session = in_results();
        session.previous_slide();
        assert_eq!(session.results().unwrap().slide_index, 0);

        for _ in 0..10 {
            session.next_slide();
        }
        assert_eq!(session.results().unwrap().slide_index, 3);
        assert_eq!(session.results().unwrap().caption(), "SLIDE 4 / 4");

        for _ in 0..10 {
            session.previous_slide();
        }
        assert_eq!(session.results().unwrap().slide_index, 0);
    }

    #[test]
    fn test_navigation_on_empty_deck() {
        let mut plan = fixtures::velvet_and_ink();
        plan.slides.clear();
        let mut session = Session::default();
        session.begin_generation().unwrap();
        session.finish_generation(Ok(plan)).unwrap();
        session.next_slide();
        assert_eq!(session.results().unwrap().slide_index, 0);
        assert!(session.results().unwrap().current_slide().is_none());
        assert_eq!(session.results().unwrap().caption(), "SLIDE 0 / 0");
    }

    fn plan_with_slides(count: usize) -> Plan {
        let mut plan = fixtures::velvet_and_ink();
        plan.slides = (0..count)
            .map(|i| {
                let tag = LayoutTag::KNOWN[i % LayoutTag::KNOWN.len()];
                fixtures::slide(&format!("Slide {}", i + 1), "Sub", "Body", tag)
            })
            .collect();
        plan
    }

    #[test]
    fn test_navigation_saturates_for_any_length() {
        for count in [1, 2, 7] {
            let mut session = Session::default();
            session.begin_generation().unwrap();
            session.finish_generation(Ok(plan_with_slides(count))).unwrap();

            for _ in 0..count + 2 {
                session.next_slide();
            }
            let view = session.results().unwrap();
            assert_eq!(view.slide_index, count - 1, "next with {} slides", count);
            assert_eq!(view.caption(), format!("SLIDE {} / {}", count, count));

            for _ in 0..count + 2 {
                session.previous_slide();
            }
            assert_eq!(
                session.results().unwrap().slide_index,
                0,
                "previous with {} slides",
                count
            );
        }
    }

    #[test]
    fn test_export_writes_one_part_per_slide() {
        for count in [1, 2, 7] {
            let mut session = Session::default();
            session.begin_generation().unwrap();
            session.finish_generation(Ok(plan_with_slides(count))).unwrap();

            let deck = crate::export::build_deck(session.plan().unwrap(), "Studio");
            assert_eq!(deck.slides.len(), count);

            let dir = tempfile::tempdir().unwrap();
            let options = ExportOptions {
                output_dir: dir.path().to_path_buf(),
                ..ExportOptions::default()
            };
            let report = session.export(&options).unwrap();
            assert_eq!(report.slide_count, count);

            let file = std::fs::File::open(&report.path).unwrap();
            let archive = zip::ZipArchive::new(file).unwrap();
            let parts = archive
                .file_names()
                .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
                .count();
            assert_eq!(parts, count, "slide parts with {} slides", count);
        }
    }

    #[test]
    fn test_tabs_and_noops_outside_results() {
        let mut session = Session::default();
        session.select_tab(Tab::Roadmap);
        session.next_slide();
        assert!(session.results().is_none());

        let mut session = in_results();
        session.select_tab(Tab::Roadmap);
        assert_eq!(session.results().unwrap().tab, Tab::Roadmap);
    }

    #[test]
    fn test_restart_keeps_profile() {
        let mut session = Session::default();
        session.set_field(ProfileField::Vibe, "Quiet").unwrap();
        session.begin_generation().unwrap();
        session
            .finish_generation(Ok(fixtures::velvet_and_ink()))
            .unwrap();

        assert!(session.set_field(ProfileField::Vibe, "Loud").is_err());

        session.restart();
        assert_eq!(session.screen(), &Screen::Intake { error: None });
        assert!(session.plan().is_none());
        assert_eq!(session.profile().vibe, "Quiet");
    }

    #[test]
    fn test_export_without_plan() {
        let session = Session::default();
        match session.export(&ExportOptions::default()) {
            Err(AtelierError::InvalidState(msg)) => assert_eq!(msg, "no plan to export"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
