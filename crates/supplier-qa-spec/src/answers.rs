use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use time::Date;
use time::format_description::well_known::Iso8601;

use crate::spec::question::Qid;
use crate::spec::questionnaire::Questionnaire;
use crate::spec::response::ResponseKind;

/// Answers keyed by question id.
pub type AnswerMap = BTreeMap<Qid, Answer>;

/// Recognizes the equivalent Yes/No encodings (`1`/`0`, `Y`/`N`, `Yes`/`No`, `true`/`false`).
pub fn normalize_yes_no(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" => Some(true),
        "0" | "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Current value of one question.
///
/// Crosses the persistence boundary as a plain JSON value: `null`, a string, a number, or an
/// ISO `YYYY-MM-DD` string for dates. Plain values carry no type, so a decoded `Date` is `Text`
/// and a decoded `Bitmask` is `Integer` until [`Answer::typed_for`] re-types it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Answer {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Date(Date),
    Bitmask(u32),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    /// Parses an ISO calendar date; anything else is kept as text.
    pub fn date_or_text(raw: &str) -> Self {
        match Date::parse(raw.trim(), &Iso8601::DATE) {
            Ok(date) => Answer::Date(date),
            Err(_) => Answer::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Empty => true,
            Answer::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form used for code comparisons and length checks.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            Answer::Empty => None,
            Answer::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Answer::Integer(value) => Some(value.to_string()),
            Answer::Date(date) => date.format(&Iso8601::DATE).ok(),
            Answer::Bitmask(mask) => Some(mask.to_string()),
        }
    }

    pub fn yes_no(&self) -> Option<bool> {
        match self {
            Answer::Text(text) => normalize_yes_no(text),
            Answer::Integer(1) => Some(true),
            Answer::Integer(0) => Some(false),
            _ => None,
        }
    }

    pub fn as_mask(&self) -> Option<u32> {
        match self {
            Answer::Bitmask(mask) => Some(*mask),
            Answer::Integer(value) => u32::try_from(*value).ok(),
            Answer::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// True when the answer equals `token` textually or under Yes/No normalization.
    pub fn matches_token(&self, token: &str) -> bool {
        let token = token.trim();
        if self.canonical_text().as_deref() == Some(token) {
            return true;
        }
        match (self.yes_no(), normalize_yes_no(token)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    pub fn to_plain(&self) -> Value {
        match self {
            Answer::Empty => Value::Null,
            Answer::Text(text) => Value::String(text.clone()),
            Answer::Integer(value) => Value::from(*value),
            Answer::Date(_) => self.canonical_text().map_or(Value::Null, Value::String),
            Answer::Bitmask(mask) => Value::from(*mask),
        }
    }

    /// Restores the typed form for a question's response kind.
    pub fn typed_for(self, kind: ResponseKind) -> Self {
        match (kind, self) {
            (ResponseKind::Date, Answer::Text(text)) => Answer::date_or_text(&text),
            (ResponseKind::MultiSelectBitmask, Answer::Integer(value)) => {
                u32::try_from(value).map_or(Answer::Integer(value), Answer::Bitmask)
            }
            (_, answer) => answer,
        }
    }

    pub fn from_plain(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Answer::Empty),
            Value::Bool(flag) => Ok(Answer::Integer(i64::from(*flag))),
            Value::String(text) => Ok(Answer::Text(text.clone())),
            Value::Number(number) => match number.as_i64() {
                Some(value) => Ok(Answer::Integer(value)),
                None => Ok(Answer::Text(number.to_string())),
            },
            Value::Array(_) | Value::Object(_) => {
                Err(format!("answer must be a plain value, got {value}"))
            }
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_text().as_deref().unwrap_or_default())
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<i64> for Answer {
    fn from(value: i64) -> Self {
        Answer::Integer(value)
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plain().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Answer::from_plain(&value).map_err(D::Error::custom)
    }
}

/// Optional metadata paired with an `AnswerSet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Answers handed to the persistence collaborator for one questionnaire version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub questionnaire_id: String,
    pub version: String,
    pub answers: AnswerMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl AnswerSet {
    /// Creates a fresh empty answer set for a questionnaire.
    pub fn new(questionnaire_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            questionnaire_id: questionnaire_id.into(),
            version: version.into(),
            answers: AnswerMap::new(),
            meta: None,
        }
    }

    /// Serializes the answer set as CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, ciborium::ser::Error<std::io::Error>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)?;
        Ok(bytes)
    }

    /// Decodes CBOR bytes. Answers come back in plain form; see [`AnswerSet::normalize`].
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, ciborium::de::Error<std::io::Error>> {
        ciborium::from_reader(bytes)
    }

    /// Re-types decoded answers against the questionnaire they were collected for.
    pub fn normalize(&mut self, questionnaire: &Questionnaire) {
        questionnaire.retype_answers(&mut self.answers);
    }

    /// Serializes the answer set as indented JSON for debugging.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Validation failures surfaced next to the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    RequiredMissing,
    LengthMismatch { expected: usize, actual: usize },
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::RequiredMissing => "REQUIRED_MISSING",
            ErrorKind::LengthMismatch { .. } => "LENGTH_MISMATCH",
        }
    }
}

/// Validation error metadata reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    pub qid: Qid,
    pub kind: ErrorKind,
    pub message: String,
}

/// Result returned from `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<Qid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<Qid>,
}

impl ValidationResult {
    pub fn error_for(&self, qid: &Qid) -> Option<&ValidationError> {
        self.errors.iter().find(|error| &error.qid == qid)
    }
}
