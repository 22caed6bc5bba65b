//! @acp:module "Plan Model"
//! @acp:summary "Typed portfolio plan: concept, palette, slides and action steps"
//! @acp:domain plan
//! @acp:layer model
//!
//! A [`Plan`] is produced in one piece. [`Plan::from_json_str`] validates the
//! document against the plan schema before deserializing, so a caller either
//! holds a complete plan or an error.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema;

/// Fallback for palette entries that are not hex colors
pub const FALLBACK_HEX: &str = "808080";

static HEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap()
});

/// @acp:summary "Structured result of a generation request"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub title: String,
    pub concept_description: String,
    pub keywords: Vec<String>,
    pub color_palette: Palette,
    pub slides: Vec<Slide>,
    pub action_plan: Vec<String>,
}

/// @acp:summary "Five named hex colors used by preview and export"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

/// Named palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteRole {
    Primary,
    Secondary,
    Accent,
    Background,
    Text,
}

impl PaletteRole {
    pub const ALL: [PaletteRole; 5] = [
        PaletteRole::Primary,
        PaletteRole::Secondary,
        PaletteRole::Accent,
        PaletteRole::Background,
        PaletteRole::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PaletteRole::Primary => "primary",
            PaletteRole::Secondary => "secondary",
            PaletteRole::Accent => "accent",
            PaletteRole::Background => "background",
            PaletteRole::Text => "text",
        }
    }
}

impl Palette {
    /// Raw value as produced by the provider
    pub fn get(&self, role: PaletteRole) -> &str {
        match role {
            PaletteRole::Primary => &self.primary,
            PaletteRole::Secondary => &self.secondary,
            PaletteRole::Accent => &self.accent,
            PaletteRole::Background => &self.background,
            PaletteRole::Text => &self.text,
        }
    }

    /// Six upper-case hex digits without the `#` prefix.
    ///
    /// Values that are not 3- or 6-digit hex colors fall back to [`FALLBACK_HEX`].
    pub fn hex(&self, role: PaletteRole) -> String {
        let raw = self.get(role);
        match normalize_hex(raw) {
            Some(hex) => hex,
            None => {
                tracing::warn!("Palette {} is not a hex color: {:?}", role.name(), raw);
                FALLBACK_HEX.to_string()
            }
        }
    }

    /// CSS form (`#RRGGBB`) of [`Palette::hex`]
    pub fn css(&self, role: PaletteRole) -> String {
        format!("#{}", self.hex(role))
    }
}

/// Strip `#`, expand shorthand and upper-case a hex color
pub fn normalize_hex(value: &str) -> Option<String> {
    let value = value.trim();
    if !HEX_PATTERN.is_match(value) {
        return None;
    }
    let digits = value.trim_start_matches('#');
    let expanded = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        digits.to_string()
    };
    Some(expanded.to_ascii_uppercase())
}

/// @acp:summary "Closed set of slide templates"
///
/// Tags outside the set only come from hand-edited plan files; they
/// deserialize to `Unknown` and are rendered as nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutTag {
    Title,
    Split,
    Grid,
    Quote,
    #[serde(other)]
    Unknown,
}

impl LayoutTag {
    /// Every tag a template exists for
    pub const KNOWN: [LayoutTag; 4] = [
        LayoutTag::Title,
        LayoutTag::Split,
        LayoutTag::Grid,
        LayoutTag::Quote,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutTag::Title => "title",
            LayoutTag::Split => "split",
            LayoutTag::Grid => "grid",
            LayoutTag::Quote => "quote",
            LayoutTag::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LayoutTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// @acp:summary "One slide of the proposed deck"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub visual_direction: String,
    pub layout_type: LayoutTag,
}

impl Slide {
    /// Quoted text for the quote template: the body, or the title when the body is empty
    pub fn quote_text(&self) -> &str {
        if self.body.is_empty() {
            &self.title
        } else {
            &self.body
        }
    }
}

impl Plan {
    /// @acp:summary "Parse provider output, validating against the plan schema first"
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        schema::validate_plan(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load a plan file without schema checks (unknown layout tags are kept)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Four-slide plan covering every template
    pub fn velvet_and_ink() -> Plan {
        Plan {
            title: "Velvet & Ink".to_string(),
            concept_description: "Tailored shadows meet the empty page. Light falls like ink."
                .to_string(),
            keywords: vec!["Chiaroscuro".into(), "Restraint".into(), "Rebellion".into()],
            color_palette: Palette {
                primary: "#C9A227".to_string(),
                secondary: "#8C8C8C".to_string(),
                accent: "#7A1F2B".to_string(),
                background: "#0B0B0B".to_string(),
                text: "#F4F1EA".to_string(),
            },
            slides: vec![
                slide("Velvet & Ink", "A Portfolio", "", LayoutTag::Title),
                slide("Window Light", "Series I", "North light on linen.", LayoutTag::Split),
                slide("Empty Rooms", "Series II", "What is left out.", LayoutTag::Grid),
                slide("Restraint", "Ni Zan", "Style is refusal.", LayoutTag::Quote),
            ],
            action_plan: vec![
                "Edit the archive down to twelve frames".into(),
                "Shoot one window-lit portrait a week".into(),
            ],
        }
    }

    pub fn slide(title: &str, subtitle: &str, body: &str, tag: LayoutTag) -> Slide {
        Slide {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            body: body.to_string(),
            visual_direction: format!("{} in low light", title),
            layout_type: tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("#1a2b3c").as_deref(), Some("1A2B3C"));
        assert_eq!(normalize_hex("fff").as_deref(), Some("FFFFFF"));
        assert_eq!(normalize_hex(" #C9A227 ").as_deref(), Some("C9A227"));
        assert_eq!(normalize_hex("gold"), None);
        assert_eq!(normalize_hex("#12345"), None);
    }

    #[test]
    fn test_palette_fallback() {
        let mut palette = fixtures::velvet_and_ink().color_palette;
        palette.accent = "burgundy".to_string();
        assert_eq!(palette.hex(PaletteRole::Accent), FALLBACK_HEX);
        assert_eq!(palette.css(PaletteRole::Primary), "#C9A227");
    }

    #[test]
    fn test_unknown_layout_tag_deserializes() {
        let slide: Slide = serde_json::from_str(
            r#"{"title":"t","subtitle":"s","body":"b","visualDirection":"v","layoutType":"carousel"}"#,
        )
        .unwrap();
        assert_eq!(slide.layout_type, LayoutTag::Unknown);
    }

    #[test]
    fn test_from_json_str_rejects_unknown_tag() {
        let mut value = serde_json::to_value(fixtures::velvet_and_ink()).unwrap();
        value["slides"][0]["layoutType"] = serde_json::json!("carousel");
        let err = Plan::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, crate::AtelierError::SchemaViolation(_)));
    }

    #[test]
    fn test_from_json_str_rejects_missing_field() {
        let mut value = serde_json::to_value(fixtures::velvet_and_ink()).unwrap();
        value.as_object_mut().unwrap().remove("actionPlan");
        assert!(Plan::from_json_str(&value.to_string()).is_err());
    }

    #[test]
    fn test_from_json_str_accepts_valid_plan() {
        let plan = fixtures::velvet_and_ink();
        let text = serde_json::to_string(&plan).unwrap();
        assert_eq!(Plan::from_json_str(&text).unwrap(), plan);
    }

    #[test]
    fn test_quote_text_falls_back_to_title() {
        let slide = fixtures::slide("Silence", "", "", LayoutTag::Quote);
        assert_eq!(slide.quote_text(), "Silence");
    }

    #[test]
    fn test_quote_text_keeps_blank_body() {
        let slide = fixtures::slide("Silence", "", " ", LayoutTag::Quote);
        assert_eq!(slide.quote_text(), " ");
    }
}
