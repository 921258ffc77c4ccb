// Structured (JSON schema) outputs and their validation
use crate::error::GenerationError;
use crate::types::{SeoMetadata, ThumbnailConcept, VideoIdea};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// A result type the model is asked to return as JSON.
///
/// `schema` is sent as the response schema (Gemini's upper-case type names),
/// and `validate` rejects replies that parse but are missing required content.
pub trait StructuredOutput: DeserializeOwned + Send {
    fn schema() -> Value;

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl StructuredOutput for VideoIdea {
    fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "concept": { "type": "STRING" }
            },
            "required": ["title", "concept"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("idea has no title".to_string());
        }
        if self.concept.trim().is_empty() {
            return Err("idea has no concept".to_string());
        }
        Ok(())
    }
}

impl StructuredOutput for SeoMetadata {
    fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "tags": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["title", "description", "tags"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("metadata has no title".to_string());
        }
        Ok(())
    }
}

/// Prompt lists and schedule steps
impl StructuredOutput for Vec<String> {
    fn schema() -> Value {
        json!({ "type": "ARRAY", "items": { "type": "STRING" } })
    }

    fn validate(&self) -> Result<(), String> {
        if self.iter().all(|item| item.trim().is_empty()) {
            return Err("list is empty".to_string());
        }
        Ok(())
    }
}

impl StructuredOutput for Vec<ThumbnailConcept> {
    fn schema() -> Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "headline": { "type": "STRING" },
                    "visualDescription": { "type": "STRING" },
                    "reasoning": { "type": "STRING" }
                },
                "required": ["headline", "visualDescription", "reasoning"]
            }
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("no thumbnail concepts".to_string());
        }
        Ok(())
    }
}

/// Parse and validate a JSON reply; tolerates a surrounding Markdown code fence
pub fn parse<T: StructuredOutput>(text: &str) -> Result<T, GenerationError> {
    let value: T = serde_json::from_str(strip_code_fence(text))?;
    value.validate().map_err(GenerationError::MalformedResponse)?;
    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line ("```json")
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_idea() {
        let idea: VideoIdea = parse(r#"{"title":"Grow Up","concept":"Vertical farms in tiny flats."}"#).unwrap();
        assert_eq!(idea.title, "Grow Up");
    }

    #[test]
    fn test_missing_field_is_malformed_and_transient() {
        let err = parse::<VideoIdea>(r#"{"title":"Only a title"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
        assert!(err.is_transient());

        let err = parse::<VideoIdea>(r#"{"title":"","concept":"c"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(m) if m.contains("title")));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let text = "```json\n[\"one\", \"two\"]\n```";
        let list: Vec<String> = parse(text).unwrap();
        assert_eq!(list, vec!["one", "two"]);
    }

    #[test]
    fn test_empty_lists_rejected() {
        assert!(parse::<Vec<String>>("[]").is_err());
        assert!(parse::<Vec<ThumbnailConcept>>("[]").is_err());
    }

    #[test]
    fn test_schemas_use_upper_case_types() {
        assert_eq!(VideoIdea::schema()["type"], "OBJECT");
        assert_eq!(<Vec<ThumbnailConcept>>::schema()["items"]["properties"]["visualDescription"]["type"], "STRING");
    }
}
