//! @acp:module "Plan Requester"
//! @acp:summary "Turn a profile into one generation request and a validated plan"
//! @acp:domain provider
//! @acp:layer service

use crate::error::{AtelierError, Result};
use crate::plan::Plan;
use crate::profile::{Profile, FIELDS};
use crate::provider::PlanProvider;
use crate::schema::plan_schema;

const PREAMBLE: &str = "Act as a world-class Creative Director and Curator.\n\n\
A photographer approaches you with the following aesthetic profile:";

const TASK: &str = "**Task:**\n\
1. Synthesize these diverse influences into a cohesive \"Brand Identity\".\n\
2. Create a Portfolio structure (PPT/Website) plan, choosing a layout type for each slide.\n\
3. Define a concrete \"Action Plan\" on how they should curate and start building this.\n\n\
Output must be strict JSON matching the schema provided.";

/// @acp:summary "Build the instruction text; every profile field is embedded"
pub fn build_prompt(profile: &Profile) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push('\n');
    for descriptor in FIELDS.iter() {
        let value = descriptor.get(profile).trim();
        prompt.push_str(&format!("- **{}:** {}", descriptor.prompt_label, value));
        if let Some(hint) = descriptor.prompt_hint {
            prompt.push_str(&format!(" (Think {}.)", hint));
        }
        prompt.push('\n');
    }
    prompt.push('\n');
    prompt.push_str(TASK);
    prompt
}

/// @acp:summary "Requests portfolio plans from a provider"
pub struct PlanRequester {
    provider: Box<dyn PlanProvider>,
}

impl PlanRequester {
    pub fn new(provider: Box<dyn PlanProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn PlanProvider {
        self.provider.as_ref()
    }

    async fn attempt(&self, profile: &Profile) -> Result<Plan> {
        let prompt = build_prompt(profile);
        let text = self
            .provider
            .generate_json(&prompt, plan_schema())
            .await?
            .ok_or_else(|| AtelierError::Provider("response contained no text".to_string()))?;
        Plan::from_json_str(&text)
    }

    /// @acp:summary "Make exactly one attempt; any failure becomes GenerationFailed"
    pub async fn request(&self, profile: &Profile) -> Result<Plan> {
        tracing::info!(
            "Requesting plan from {} ({})",
            self.provider.name(),
            self.provider.model()
        );
        match self.attempt(profile).await {
            Ok(plan) => {
                tracing::info!(
                    "Received plan \"{}\" with {} slides",
                    plan.title,
                    plan.slide_count()
                );
                Ok(plan)
            }
            Err(e) => {
                tracing::error!("Plan generation failed: {}", e);
                Err(AtelierError::GenerationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    struct Canned {
        reply: Mutex<Option<Result<Option<String>>>>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(reply: Result<Option<String>>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlanProvider for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn generate_json(&self, prompt: &str, _schema: &Value) -> Result<Option<String>> {
            self.seen.lock().unwrap().push(prompt.to_string());
            self.reply.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }

    fn plan_json() -> String {
        serde_json::to_string(&crate::plan::fixtures::velvet_and_ink()).unwrap()
    }

    #[test]
    fn test_prompt_embeds_every_field() {
        let mut profile = Profile::default();
        for (i, d) in FIELDS.iter().enumerate() {
            d.set(&mut profile, format!("marker-{}", i));
        }
        let prompt = build_prompt(&profile);
        for (i, d) in FIELDS.iter().enumerate() {
            assert!(prompt.contains(&format!("marker-{}", i)), "{}", d.key);
            assert!(prompt.contains(d.prompt_label), "{}", d.key);
        }
        assert!(prompt.contains("strict JSON"));
    }

    #[tokio::test]
    async fn test_request_returns_valid_plan() {
        let requester = PlanRequester::new(Box::new(Canned::new(Ok(Some(plan_json())))));
        let plan = requester.request(&Profile::default()).await.unwrap();
        assert_eq!(plan.title, "Velvet & Ink");
        assert_eq!(plan.slide_count(), 4);
    }

    #[tokio::test]
    async fn test_failures_collapse_to_generation_failed() {
        let cases: Vec<Result<Option<String>>> = vec![
            Err(AtelierError::Provider("no API key".to_string())),
            Ok(None),
            Ok(Some("not json".to_string())),
            Ok(Some(r#"{"title": "Half"}"#.to_string())),
        ];
        for reply in cases {
            let requester = PlanRequester::new(Box::new(Canned::new(reply)));
            let err = requester.request(&Profile::default()).await.unwrap_err();
            assert!(matches!(err, AtelierError::GenerationFailed));
            assert_eq!(err.to_string(), crate::error::GENERATION_FAILED_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_bad_layout_tag_rejected() {
        let json = plan_json().replace("\"quote\"", "\"collage\"");
        let requester = PlanRequester::new(Box::new(Canned::new(Ok(Some(json)))));
        assert!(requester.request(&Profile::default()).await.is_err());
    }
}
