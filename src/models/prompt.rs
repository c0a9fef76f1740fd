use crate::error::{PromptError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Advisory ceiling on the pretty-printed prompt object. Shown to the user, never enforced.
pub const PROMPT_CHAR_LIMIT: usize = 910;

/// Field names in serialisation order.
pub const PROMPT_FIELDS: [&str; 7] = [
    "concept",
    "composition",
    "color",
    "background",
    "mood",
    "style",
    "settings",
];

/// The seven-field image generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePrompt {
    pub concept: String,
    pub composition: String,
    pub color: String,
    pub background: String,
    pub mood: String,
    pub style: String,
    pub settings: String,
}

impl ImagePrompt {
    /// Two-space indented JSON, the form used for display, copy and embedding in prompts.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PromptError::SerializationError(e.to_string()))
    }

    pub fn char_count(&self) -> Result<CharCount> {
        Ok(CharCount::of(&self.to_pretty_json()?))
    }

    /// Response schema declared to the model for schema-enforced generation.
    pub fn response_schema() -> Value {
        let properties: serde_json::Map<String, Value> = PROMPT_FIELDS
            .iter()
            .map(|field| (field.to_string(), json!({ "type": "STRING" })))
            .collect();

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": PROMPT_FIELDS,
            "propertyOrdering": PROMPT_FIELDS,
        })
    }
}

/// Live length of the serialised prompt against [`PROMPT_CHAR_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharCount {
    pub count: usize,
    pub limit: usize,
    pub over_limit: bool,
}

impl CharCount {
    /// Counts Unicode scalar values, not bytes.
    pub fn of(serialized: &str) -> Self {
        let count = serialized.chars().count();
        CharCount {
            count,
            limit: PROMPT_CHAR_LIMIT,
            over_limit: count > PROMPT_CHAR_LIMIT,
        }
    }
}

impl fmt::Display for CharCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.count, self.limit)?;
        if self.over_limit {
            write!(f, " (over limit)")?;
        }
        Ok(())
    }
}

/// Partial rewrite applied to an existing prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationKind {
    Color,
    Style,
}

impl ModificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationKind::Color => "color",
            ModificationKind::Style => "style",
        }
    }

    /// Fields the model is asked to leave untouched.
    pub fn preserved_fields(&self) -> &'static [&'static str] {
        match self {
            ModificationKind::Color => &["concept", "composition", "mood", "style", "settings"],
            ModificationKind::Style => &["concept", "composition", "settings"],
        }
    }

    pub fn changed_fields(&self) -> &'static [&'static str] {
        match self {
            ModificationKind::Color => &["color", "background"],
            ModificationKind::Style => &["style", "color", "background", "mood"],
        }
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModificationKind {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Ok(ModificationKind::Color),
            "style" => Ok(ModificationKind::Style),
            other => Err(PromptError::ValidationError(format!(
                "Unknown modification kind: {}",
                other
            ))),
        }
    }
}
