//! @acp:module "Generation Provider"
//! @acp:summary "Text-generation backend seam and the Gemini implementation"
//! @acp:domain provider
//! @acp:layer integration
//!
//! A [`PlanProvider`] takes a prompt and a JSON Schema and returns the raw
//! JSON text the model produced. Parsing and validation happen in the
//! requester, so providers stay thin and tests can substitute a mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AtelierError, Result};
use crate::schema::to_provider_schema;

/// Default Gemini REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default environment variable holding the credential
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
/// Consulted when the configured variable is unset
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// @acp:summary "Trait implemented by every plan generation backend"
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Model identifier in use
    fn model(&self) -> &str;

    /// Ask for JSON conforming to `schema`.
    ///
    /// `Ok(None)` means the call succeeded but produced no text.
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<Option<String>>;
}

/// @acp:summary "Provider settings from the config file"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderOptions {
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl ProviderOptions {
    /// Read the credential from the environment; empty values count as absent
    pub fn api_key(&self) -> Option<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenate the first candidate's text parts
fn extract_text(response: &GenerateResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn http_error(status: u16, body: &str) -> AtelierError {
    let message = match status {
        400 => format!("invalid request: {}", body),
        401 | 403 => "authentication failed; check the API key".to_string(),
        404 => format!("model or endpoint not found: {}", body),
        429 => format!("rate limited: {}", body),
        500..=599 => format!("server error {}: {}", status, body),
        _ => format!("HTTP {}: {}", status, body),
    };
    AtelierError::Provider(message)
}

/// @acp:summary "Gemini generateContent client with structured JSON output"
pub struct GeminiProvider {
    options: ProviderOptions,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(options: ProviderOptions) -> Self {
        Self {
            options,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.options.endpoint.trim_end_matches('/'),
            self.options.model
        )
    }

    fn request_body(prompt: &str, schema: &Value) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": to_provider_schema(schema)
            }
        })
    }
}

#[async_trait]
impl PlanProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.options.model
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<Option<String>> {
        let api_key = self.options.api_key().ok_or_else(|| {
            AtelierError::Provider(format!(
                "no API key in {} or {}",
                self.options.api_key_env, FALLBACK_API_KEY_ENV
            ))
        })?;

        tracing::debug!("POST {} ({} prompt chars)", self.url(), prompt.len());

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(prompt, schema))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            return Err(http_error(status, &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        Ok(extract_text(&parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] }
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_extract_text_missing() {
        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(extract_text(&empty), None);

        let blocked: GenerateResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
                .unwrap();
        assert_eq!(extract_text(&blocked), None);
    }

    #[test]
    fn test_request_body_shape() {
        let schema = json!({ "type": "object", "properties": { "title": { "type": "string" } } });
        let body = GeminiProvider::request_body("hello", &schema);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_url() {
        let provider = GeminiProvider::new(ProviderOptions {
            endpoint: "https://example.test/v1beta/".to_string(),
            ..ProviderOptions::default()
        });
        assert_eq!(
            provider.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_http_error_mentions_key_on_auth_failure() {
        let err = http_error(401, "denied");
        assert!(err.to_string().contains("API key"));
    }
}
