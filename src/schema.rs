//! @acp:module "Schema"
//! @acp:summary "Embedded plan schema, validation and provider dialect conversion"
//! @acp:domain plan
//! @acp:layer validation

use std::sync::LazyLock;

use serde_json::{Map, Value};

use crate::error::{AtelierError, Result};

/// Plan schema as shipped with the crate
pub const PLAN_SCHEMA: &str = include_str!("../schemas/plan.schema.json");

static PLAN_SCHEMA_VALUE: LazyLock<Value> =
    LazyLock::new(|| serde_json::from_str(PLAN_SCHEMA).expect("embedded plan schema is valid JSON"));

/// Keywords the generation provider understands in a response schema
const PROVIDER_KEYWORDS: &[&str] = &[
    "type",
    "format",
    "description",
    "nullable",
    "enum",
    "properties",
    "required",
    "items",
];

/// Parsed plan schema
pub fn plan_schema() -> &'static Value {
    &PLAN_SCHEMA_VALUE
}

/// @acp:summary "Validate a JSON document against the plan schema"
pub fn validate_plan(instance: &Value) -> Result<()> {
    let validator = jsonschema::validator_for(plan_schema())
        .map_err(|e| AtelierError::Other(format!("Invalid plan schema: {}", e)))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{}: {}", path, e)
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AtelierError::SchemaViolation(errors.join("; ")))
    }
}

/// @acp:summary "Rewrite a JSON Schema into the provider's response-schema dialect"
///
/// Type names are upper-cased and keywords the provider rejects (`$schema`,
/// `title`, ...) are dropped. Property names are kept as-is.
pub fn to_provider_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                if !PROVIDER_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let converted = match key.as_str() {
                    "type" => match value {
                        Value::String(t) => Value::String(t.to_ascii_uppercase()),
                        other => other.clone(),
                    },
                    "properties" => match value {
                        Value::Object(props) => Value::Object(
                            props
                                .iter()
                                .map(|(name, sub)| (name.clone(), to_provider_schema(sub)))
                                .collect(),
                        ),
                        other => other.clone(),
                    },
                    "items" => to_provider_schema(value),
                    _ => value.clone(),
                };
                out.insert(key.clone(), converted);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_schema_parses() {
        assert_eq!(plan_schema()["type"], "object");
    }

    #[test]
    fn test_provider_schema_uppercases_types() {
        let converted = to_provider_schema(plan_schema());
        assert_eq!(converted["type"], "OBJECT");
        assert_eq!(converted["properties"]["slides"]["type"], "ARRAY");
        assert_eq!(converted["properties"]["slides"]["items"]["type"], "OBJECT");
        assert_eq!(
            converted["properties"]["slides"]["items"]["properties"]["layoutType"]["enum"],
            json!(["title", "split", "grid", "quote"])
        );
    }

    #[test]
    fn test_provider_schema_drops_unsupported_keywords() {
        let converted = to_provider_schema(plan_schema());
        assert!(converted.get("$schema").is_none());
        assert!(converted.get("title").is_none());
        // "title" as a property name survives
        assert!(converted["properties"].get("title").is_some());
    }

    #[test]
    fn test_validate_reports_path() {
        let err = validate_plan(&json!({"title": 3})).unwrap_err().to_string();
        assert!(err.contains("Plan does not match schema"));
    }
}
