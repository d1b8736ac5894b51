//! Socioeconomic classification bitmask ("Z-Code").
//!
//! Six flags, each a fixed power-of-two weight. The table order is the canonical order of
//! decoded codes and of the binary rendering.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Highest valid Z-Code value (all six flags set).
pub const MAX_VALUE: i64 = 0b11_1111;

/// Number of classification flags.
pub const WIDTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ZCode {
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "SDB")]
    SmallDisadvantaged,
    #[serde(rename = "WOSB")]
    WomanOwned,
    #[serde(rename = "VOSB")]
    VeteranOwned,
    #[serde(rename = "SDVOSB")]
    ServiceDisabledVeteranOwned,
}

impl ZCode {
    /// Fixed table, highest weight first.
    pub const ALL: [ZCode; WIDTH] = [
        ZCode::Large,
        ZCode::Small,
        ZCode::SmallDisadvantaged,
        ZCode::WomanOwned,
        ZCode::VeteranOwned,
        ZCode::ServiceDisabledVeteranOwned,
    ];

    pub fn weight(self) -> u8 {
        match self {
            ZCode::Large => 32,
            ZCode::Small => 16,
            ZCode::SmallDisadvantaged => 8,
            ZCode::WomanOwned => 4,
            ZCode::VeteranOwned => 2,
            ZCode::ServiceDisabledVeteranOwned => 1,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ZCode::Large => "L",
            ZCode::Small => "S",
            ZCode::SmallDisadvantaged => "SDB",
            ZCode::WomanOwned => "WOSB",
            ZCode::VeteranOwned => "VOSB",
            ZCode::ServiceDisabledVeteranOwned => "SDVOSB",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZCode::Large => "Large Business",
            ZCode::Small => "Small Business",
            ZCode::SmallDisadvantaged => "Small Disadvantaged Business",
            ZCode::WomanOwned => "Woman-Owned Small Business",
            ZCode::VeteranOwned => "Veteran-Owned Small Business",
            ZCode::ServiceDisabledVeteranOwned => "Service-Disabled Veteran-Owned Small Business",
        }
    }
}

impl fmt::Display for ZCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown z-code '{0}'")]
pub struct UnknownZCode(pub String);

impl FromStr for ZCode {
    type Err = UnknownZCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        ZCode::ALL
            .into_iter()
            .find(|code| code.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownZCode(trimmed.to_string()))
    }
}

/// ORs the weights of the recognized codes. Unrecognized codes are skipped.
pub fn encode<S: AsRef<str>>(codes: &[S]) -> u8 {
    codes.iter().fold(0, |value, raw| match raw.as_ref().parse::<ZCode>() {
        Ok(code) => value | code.weight(),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring z-code");
            value
        }
    })
}

/// Codes whose weight is set in `value`, in table order.
pub fn decode(value: i64) -> Vec<ZCode> {
    ZCode::ALL
        .into_iter()
        .filter(|code| value & i64::from(code.weight()) != 0)
        .collect()
}

pub fn is_valid(value: i64) -> bool {
    (0..=MAX_VALUE).contains(&value)
}

/// Six-character binary rendering, most significant flag (`L`) first. `None` outside `0..=63`.
pub fn format_binary(value: i64) -> Option<String> {
    is_valid(value).then(|| format!("{value:0width$b}", width = WIDTH))
}
