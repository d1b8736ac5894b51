pub mod evaluate;
pub mod lint;
pub mod parse;
pub mod schema;
pub mod zcode;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::Serialize;
use supplier_qa_spec::{AnswerMap, Questionnaire};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Loads a questionnaire, choosing the format from the file extension.
pub fn load_questionnaire(path: &Path) -> Result<Questionnaire> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read questionnaire {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let questionnaire = match extension.as_deref() {
        Some("json") => Questionnaire::from_json(&raw),
        Some("toml") => Questionnaire::from_toml(&raw),
        _ => bail!(
            "questionnaire {} must have a .json or .toml extension",
            path.display()
        ),
    }
    .with_context(|| format!("failed to parse questionnaire {}", path.display()))?;
    tracing::debug!(
        id = %questionnaire.id,
        questions = questionnaire.len(),
        "questionnaire loaded"
    );
    Ok(questionnaire)
}

/// Loads a JSON object of `qid -> plain value`.
pub fn load_answers(path: &Path) -> Result<AnswerMap> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read answers {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("answers {} must be a JSON object of qid -> value", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
