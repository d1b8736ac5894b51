use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FIXED_DIGITS_PREFIX: &str = "TEXT_NUMBER_";
const DROPDOWN_PREFIX: &str = "DROPDOWN:";
const LIST_PREFIX: &str = "LIST:";
const MULTI_SELECT_PREFIX: &str = "List2List:";
const OPTION_SEPARATOR: char = ';';
const MAX_BIT_POSITION: u8 = 31;

/// Response shapes understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseKind {
    YesNo,
    YesNoNa,
    Dropdown,
    SingleSelectList,
    MultiSelectBitmask,
    Text,
    FixedLengthDigits,
    Number,
    Dollar,
    Date,
    Checkbox,
}

/// One selectable option of a dropdown, list, or multi-select response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseOption {
    pub label: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit: Option<u8>,
}

impl ResponseOption {
    /// Bit weight for multi-select options (`2^bit`).
    pub fn weight(&self) -> Option<u32> {
        self.bit.map(|bit| 1u32 << bit)
    }
}

/// Typed interpretation of an encoded response string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseSpec {
    pub kind: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ResponseOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseSpecError {
    #[error("unrecognized response encoding '{0}'")]
    Unrecognized(String),
    #[error("fixed-length digit count '{0}' is not a positive integer")]
    InvalidLength(String),
    #[error("'{0}' declares no options")]
    NoOptions(String),
    #[error("multi-select option '{segment}' has invalid bit position")]
    InvalidBit { segment: String },
}

impl ResponseSpec {
    pub fn new(kind: ResponseKind) -> Self {
        Self {
            kind,
            length: None,
            options: Vec::new(),
        }
    }

    pub fn text() -> Self {
        Self::new(ResponseKind::Text)
    }

    /// Parses an encoded response, degrading to `TEXT` when the encoding is malformed.
    pub fn parse(encoded: &str) -> Self {
        match Self::try_parse_partial(encoded) {
            Ok((spec, dropped)) => {
                for err in &dropped {
                    tracing::debug!(encoded, error = %err, "dropping response option");
                }
                spec
            }
            Err(err) => {
                tracing::debug!(encoded, error = %err, "response spec parse fallback to TEXT");
                Self::text()
            }
        }
    }

    /// Strict parse used when authoring diagnostics are wanted.
    pub fn try_parse(encoded: &str) -> Result<Self, ResponseSpecError> {
        let (spec, dropped) = Self::try_parse_partial(encoded)?;
        match dropped.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(spec),
        }
    }

    /// Parses like [`ResponseSpec::parse`] but reports failures. Multi-select segments with an
    /// unusable bit are dropped and returned next to the spec.
    pub fn try_parse_partial(
        encoded: &str,
    ) -> Result<(Self, Vec<ResponseSpecError>), ResponseSpecError> {
        let trimmed = encoded.trim();
        let literal = match trimmed.to_ascii_uppercase().as_str() {
            "Y/N" => Some(ResponseKind::YesNo),
            "Y/N/NA" => Some(ResponseKind::YesNoNa),
            "CHECKBOX" => Some(ResponseKind::Checkbox),
            "TEXT" => Some(ResponseKind::Text),
            "NUMBER" => Some(ResponseKind::Number),
            "DOLLAR" => Some(ResponseKind::Dollar),
            "DATE" => Some(ResponseKind::Date),
            _ => None,
        };
        if let Some(kind) = literal {
            return Ok((Self::new(kind), Vec::new()));
        }

        if let Some(rest) = strip_prefix_ignore_case(trimmed, FIXED_DIGITS_PREFIX) {
            let length = rest
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|length| *length > 0)
                .ok_or_else(|| ResponseSpecError::InvalidLength(rest.to_string()))?;
            let spec = Self {
                kind: ResponseKind::FixedLengthDigits,
                length: Some(length),
                options: Vec::new(),
            };
            return Ok((spec, Vec::new()));
        }

        if let Some(rest) = strip_prefix_ignore_case(trimmed, DROPDOWN_PREFIX) {
            return coded_options(ResponseKind::Dropdown, rest, trimmed)
                .map(|spec| (spec, Vec::new()));
        }
        if let Some(rest) = strip_prefix_ignore_case(trimmed, LIST_PREFIX) {
            return coded_options(ResponseKind::SingleSelectList, rest, trimmed)
                .map(|spec| (spec, Vec::new()));
        }
        if let Some(rest) = strip_prefix_ignore_case(trimmed, MULTI_SELECT_PREFIX) {
            return bitmask_options(rest, trimmed);
        }

        Err(ResponseSpecError::Unrecognized(trimmed.to_string()))
    }

    pub fn is_yes_no(&self) -> bool {
        matches!(self.kind, ResponseKind::YesNo | ResponseKind::YesNoNa)
    }

    pub fn option(&self, code: &str) -> Option<&ResponseOption> {
        self.options.iter().find(|option| option.code == code)
    }

    /// ORs the weights of the selected multi-select codes; unknown codes are ignored.
    pub fn encode_selection<S: AsRef<str>>(&self, codes: &[S]) -> u32 {
        codes
            .iter()
            .filter_map(|code| self.option(code.as_ref().trim()))
            .filter_map(ResponseOption::weight)
            .fold(0, |mask, weight| mask | weight)
    }

    /// Options whose bit is set in `mask`, in declaration order.
    pub fn decode_selection(&self, mask: u32) -> Vec<&ResponseOption> {
        self.options
            .iter()
            .filter(|option| option.weight().is_some_and(|weight| mask & weight != 0))
            .collect()
    }
}

impl fmt::Display for ResponseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ResponseKind::YesNo => f.write_str("Y/N"),
            ResponseKind::YesNoNa => f.write_str("Y/N/NA"),
            ResponseKind::Checkbox => f.write_str("CHECKBOX"),
            ResponseKind::Text => f.write_str("TEXT"),
            ResponseKind::Number => f.write_str("NUMBER"),
            ResponseKind::Dollar => f.write_str("DOLLAR"),
            ResponseKind::Date => f.write_str("DATE"),
            ResponseKind::FixedLengthDigits => {
                write!(f, "{FIXED_DIGITS_PREFIX}{}", self.length.unwrap_or_default())
            }
            ResponseKind::Dropdown | ResponseKind::SingleSelectList => {
                let prefix = if self.kind == ResponseKind::Dropdown {
                    DROPDOWN_PREFIX
                } else {
                    LIST_PREFIX
                };
                let segments = self
                    .options
                    .iter()
                    .map(|option| format!("{}({})", option.label, option.code))
                    .collect::<Vec<_>>();
                write!(f, "{prefix}{}", segments.join(";"))
            }
            ResponseKind::MultiSelectBitmask => {
                let segments = self
                    .options
                    .iter()
                    .map(|option| {
                        format!(
                            "{}|{}|{}",
                            option.label,
                            option.description.as_deref().unwrap_or_default(),
                            option.bit.unwrap_or_default()
                        )
                    })
                    .collect::<Vec<_>>();
                write!(f, "{MULTI_SELECT_PREFIX}{}", segments.join(";"))
            }
        }
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

fn segments(body: &str) -> impl Iterator<Item = &str> {
    body.split(OPTION_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

fn option_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<label>.*?)\s*\((?P<code>[^()]+)\)\s*$").expect("option pattern compiles")
    })
}

fn coded_options(
    kind: ResponseKind,
    body: &str,
    encoded: &str,
) -> Result<ResponseSpec, ResponseSpecError> {
    let options = segments(body)
        .map(|segment| match option_pattern().captures(segment) {
            Some(captures) => ResponseOption {
                label: captures["label"].to_string(),
                code: captures["code"].trim().to_string(),
                description: None,
                bit: None,
            },
            None => ResponseOption {
                label: segment.to_string(),
                code: segment.to_string(),
                description: None,
                bit: None,
            },
        })
        .collect::<Vec<_>>();
    if options.is_empty() {
        return Err(ResponseSpecError::NoOptions(encoded.to_string()));
    }
    Ok(ResponseSpec {
        kind,
        length: None,
        options,
    })
}

/// Segments with a missing or out-of-range bit are dropped; the spec fails only when none is left.
fn bitmask_options(
    body: &str,
    encoded: &str,
) -> Result<(ResponseSpec, Vec<ResponseSpecError>), ResponseSpecError> {
    let mut options = Vec::new();
    let mut dropped = Vec::new();
    for segment in segments(body) {
        let mut parts = segment.splitn(3, '|').map(str::trim);
        let label = parts.next().unwrap_or_default().to_string();
        let description = parts.next().filter(|text| !text.is_empty());
        let bit = parts
            .next()
            .and_then(|raw| raw.parse::<u8>().ok())
            .filter(|bit| *bit <= MAX_BIT_POSITION);
        let Some(bit) = bit else {
            dropped.push(ResponseSpecError::InvalidBit {
                segment: segment.to_string(),
            });
            continue;
        };
        options.push(ResponseOption {
            code: label.clone(),
            label,
            description: description.map(str::to_string),
            bit: Some(bit),
        });
    }
    if options.is_empty() {
        return Err(dropped
            .into_iter()
            .next()
            .unwrap_or_else(|| ResponseSpecError::NoOptions(encoded.to_string())));
    }
    let spec = ResponseSpec {
        kind: ResponseKind::MultiSelectBitmask,
        length: None,
        options,
    };
    Ok((spec, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropdown_options_keep_declared_order() {
        let spec = ResponseSpec::parse("DROPDOWN:Level 1(AA);Level 2(AB);Level 3(AC)");
        assert_eq!(spec.kind, ResponseKind::Dropdown);
        let codes: Vec<_> = spec.options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, ["AA", "AB", "AC"]);
        assert_eq!(spec.options[1].label, "Level 2");
    }

    #[test]
    fn segment_without_code_uses_whole_text() {
        let spec = ResponseSpec::parse("LIST:Alpha;Beta(BB);;");
        assert_eq!(spec.kind, ResponseKind::SingleSelectList);
        assert_eq!(spec.options.len(), 2);
        assert_eq!(spec.options[0].label, "Alpha");
        assert_eq!(spec.options[0].code, "Alpha");
        assert_eq!(spec.options[1].code, "BB");
    }

    #[test]
    fn fixed_length_digits_carry_length() {
        let spec = ResponseSpec::parse("TEXT_NUMBER_6");
        assert_eq!(spec.kind, ResponseKind::FixedLengthDigits);
        assert_eq!(spec.length, Some(6));
    }

    #[test]
    fn malformed_encodings_fall_back_to_text() {
        for encoded in ["", "WHATEVER", "TEXT_NUMBER_x", "TEXT_NUMBER_0", "DROPDOWN:;;"] {
            assert_eq!(ResponseSpec::parse(encoded), ResponseSpec::text(), "{encoded}");
            assert!(ResponseSpec::try_parse(encoded).is_err(), "{encoded}");
        }
    }
}
