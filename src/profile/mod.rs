//! @acp:module "Profile"
//! @acp:summary "Aesthetic questionnaire answers and the ordered field table"
//! @acp:domain profile
//! @acp:layer model
//!
//! The questionnaire is driven by [`FIELDS`], an explicit ordered table of
//! field descriptors. Forms, prompts and serialization all walk this table
//! instead of enumerating struct members at runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// @acp:summary "Free-text answers to the aesthetic questionnaire"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub music: String,
    pub art: String,
    pub celebrities: String,
    pub fashion: String,
    pub movies: String,
    pub artists: String,
    pub calligraphers: String,
    pub vibe: String,
    pub photography_style: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            music: "Rock bands, Classical music".to_string(),
            art: "Appreciation of paintings & calligraphy".to_string(),
            celebrities: "Tang Wei, Gong Li".to_string(),
            fashion: "YSL style (Yves Saint Laurent)".to_string(),
            movies: "Aftersun, Summer 1993".to_string(),
            artists: "Vermeer".to_string(),
            calligraphers: "Xu Wei, Ni Zan".to_string(),
            vibe: "Beautiful and sorrowful things".to_string(),
            photography_style: "Quiet, serene, humanistic concern".to_string(),
        }
    }
}

/// Identifies one questionnaire field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Music,
    Art,
    Celebrities,
    Fashion,
    Movies,
    Artists,
    Calligraphers,
    Vibe,
    PhotographyStyle,
}

/// @acp:summary "Static description of one editable profile field"
pub struct FieldDescriptor {
    pub field: ProfileField,
    /// Serialized key (camelCase)
    pub key: &'static str,
    /// Label shown in forms
    pub label: &'static str,
    /// Label used when the field is written into the generation prompt
    pub prompt_label: &'static str,
    /// Reading guidance appended in the prompt, if any
    pub prompt_hint: Option<&'static str>,
    get: fn(&Profile) -> &str,
    set: fn(&mut Profile, String),
}

impl FieldDescriptor {
    pub fn get<'a>(&self, profile: &'a Profile) -> &'a str {
        (self.get)(profile)
    }

    pub fn set(&self, profile: &mut Profile, value: String) {
        (self.set)(profile, value)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("field", &self.field)
            .field("key", &self.key)
            .field("label", &self.label)
            .finish()
    }
}

/// Questionnaire fields in presentation order
pub static FIELDS: [FieldDescriptor; 9] = [
    FieldDescriptor {
        field: ProfileField::Music,
        key: "music",
        label: "Music",
        prompt_label: "Music",
        prompt_hint: None,
        get: |p| p.music.as_str(),
        set: |p, v| p.music = v,
    },
    FieldDescriptor {
        field: ProfileField::Art,
        key: "art",
        label: "Art",
        prompt_label: "Art Interest",
        prompt_hint: None,
        get: |p| p.art.as_str(),
        set: |p, v| p.art = v,
    },
    FieldDescriptor {
        field: ProfileField::Celebrities,
        key: "celebrities",
        label: "Celebrities",
        prompt_label: "Notable Figures",
        prompt_hint: Some("presence, restraint, the way they carry a frame"),
        get: |p| p.celebrities.as_str(),
        set: |p, v| p.celebrities = v,
    },
    FieldDescriptor {
        field: ProfileField::Fashion,
        key: "fashion",
        label: "Fashion",
        prompt_label: "Fashion",
        prompt_hint: Some("sharp tailoring, androgyny, elegance, black and gold"),
        get: |p| p.fashion.as_str(),
        set: |p, v| p.fashion = v,
    },
    FieldDescriptor {
        field: ProfileField::Movies,
        key: "movies",
        label: "Movies",
        prompt_label: "Movies",
        prompt_hint: Some("subtle, melancholic, naturalistic"),
        get: |p| p.movies.as_str(),
        set: |p, v| p.movies = v,
    },
    FieldDescriptor {
        field: ProfileField::Artists,
        key: "artists",
        label: "Artists",
        prompt_label: "Favorite Painters",
        prompt_hint: Some("light and shadow, quiet domesticity"),
        get: |p| p.artists.as_str(),
        set: |p, v| p.artists = v,
    },
    FieldDescriptor {
        field: ProfileField::Calligraphers,
        key: "calligraphers",
        label: "Calligraphers",
        prompt_label: "Favorite Calligraphers",
        prompt_hint: Some("wild expressionism against sparse, empty restraint"),
        get: |p| p.calligraphers.as_str(),
        set: |p, v| p.calligraphers = v,
    },
    FieldDescriptor {
        field: ProfileField::Vibe,
        key: "vibe",
        label: "Vibe",
        prompt_label: "Core Vibe",
        prompt_hint: None,
        get: |p| p.vibe.as_str(),
        set: |p, v| p.vibe = v,
    },
    FieldDescriptor {
        field: ProfileField::PhotographyStyle,
        key: "photographyStyle",
        label: "Photography Style",
        prompt_label: "Photography Style",
        prompt_hint: None,
        get: |p| p.photography_style.as_str(),
        set: |p, v| p.photography_style = v,
    },
];

impl ProfileField {
    /// Descriptor for this field
    pub fn descriptor(self) -> &'static FieldDescriptor {
        // FIELDS is declared in variant order
        &FIELDS[self as usize]
    }
}

impl std::str::FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FIELDS
            .iter()
            .find(|d| d.key.eq_ignore_ascii_case(s) || d.label.eq_ignore_ascii_case(s))
            .map(|d| d.field)
            .ok_or_else(|| format!("Unknown profile field: {}", s))
    }
}

impl Profile {
    /// Read one field
    pub fn get(&self, field: ProfileField) -> &str {
        field.descriptor().get(self)
    }

    /// Replace one field
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        field.descriptor().set(self, value.into());
    }

    /// Ordered (label, value) pairs
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        FIELDS.iter().map(|d| (d.label, d.get(self))).collect()
    }

    /// @acp:summary "Load a profile from a .json, .yaml or .yml file"
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// @acp:summary "Save a profile; format follows the file extension"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_cover_every_member_once() {
        let mut profile = Profile::default();
        for (i, descriptor) in FIELDS.iter().enumerate() {
            descriptor.set(&mut profile, format!("value-{}", i));
        }
        let values: Vec<&str> = FIELDS.iter().map(|d| d.get(&profile)).collect();
        for (i, value) in values.iter().enumerate() {
            assert_eq!(*value, format!("value-{}", i));
        }
    }

    #[test]
    fn test_keys_match_serialized_names() {
        let json = serde_json::to_value(Profile::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), FIELDS.len());
        for descriptor in &FIELDS {
            assert!(object.contains_key(descriptor.key), "missing {}", descriptor.key);
        }
    }

    #[test]
    fn test_descriptor_lookup_matches_variant() {
        for descriptor in &FIELDS {
            assert_eq!(descriptor.field.descriptor().key, descriptor.key);
        }
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("vibe".parse::<ProfileField>().unwrap(), ProfileField::Vibe);
        assert_eq!(
            "Photography Style".parse::<ProfileField>().unwrap(),
            ProfileField::PhotographyStyle
        );
        assert!("shoes".parse::<ProfileField>().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let profile: Profile = serde_json::from_str(r#"{"music": "Shoegaze"}"#).unwrap();
        assert_eq!(profile.music, "Shoegaze");
        assert_eq!(profile.artists, "Vermeer");
    }

    #[test]
    fn test_yaml_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.yaml");
        let mut profile = Profile::default();
        profile.set(ProfileField::Movies, "In the Mood for Love");
        profile.save(&path).unwrap();

        let loaded = Profile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }
}
