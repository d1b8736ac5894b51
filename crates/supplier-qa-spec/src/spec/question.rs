use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable question identifier.
///
/// Authored ids are numeric (`1010`) or fractional (`1010.5`) and may arrive as JSON numbers
/// or strings. They are compared textually; sequence order comes from the question list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
#[schemars(transparent)]
pub struct Qid(String);

impl Qid {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Qid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Qid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Qid {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Qid {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Qid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Authored ids arrive as strings or as JSON/TOML numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQid {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Qid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let qid = match RawQid::deserialize(deserializer)? {
            RawQid::Text(text) => Qid::new(text),
            RawQid::Integer(value) => Qid(value.to_string()),
            // `1010.0` and `1010` name the same question.
            RawQid::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                Qid((value as i64).to_string())
            }
            RawQid::Float(value) => Qid(value.to_string()),
        };
        Ok(qid)
    }
}

/// Authored answer option carried next to the encoded response string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionOption {
    pub label: String,
    pub code: String,
    #[serde(default)]
    pub weight: f64,
}

/// Immutable definition of a single questionnaire question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub qid: Qid,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub surveyset: String,
    pub prompt: String,
    /// Encoded response shape, e.g. `Y/N` or `DROPDOWN:Level 1(AA);Level 2(AB)`.
    pub response: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_logic_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_logic_jump: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

impl Question {
    /// Minimal optional question; the remaining fields can be set with the builder helpers.
    pub fn new(qid: impl Into<Qid>, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            qid: qid.into(),
            page: 0,
            surveyset: String::new(),
            prompt: prompt.into(),
            response: response.into(),
            required: false,
            skip_logic_answer: None,
            skip_logic_jump: None,
            comment_type: None,
            options: Vec::new(),
            warning_message: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_skip(mut self, answer: impl Into<String>, jump: impl Into<String>) -> Self {
        self.skip_logic_answer = Some(answer.into());
        self.skip_logic_jump = Some(jump.into());
        self
    }

    pub fn with_comment_type(mut self, comment_type: impl Into<String>) -> Self {
        self.comment_type = Some(comment_type.into());
        self
    }

    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.warning_message = Some(message.into());
        self
    }
}
