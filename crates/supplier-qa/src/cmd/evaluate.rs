use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use supplier_qa_lib::QuestionnaireSession;
use supplier_qa_spec::{AnswerMap, Evaluation, WarningEvent};

use super::{OutputFormat, load_answers, load_questionnaire, print_json};

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Questionnaire file (.json or .toml)
    #[arg(long, short = 'Q', value_name = "PATH")]
    pub questionnaire: PathBuf,
    /// Answers as a JSON object of qid -> value
    #[arg(long, short = 'a', value_name = "PATH")]
    pub answers: Option<PathBuf>,
    /// Previously stored answers, only used to report warnings entered since then
    #[arg(long, value_name = "PATH")]
    pub previous: Option<PathBuf>,
    /// Finalize the answer set and print it as hex-encoded CBOR; fails when incomplete
    #[arg(long)]
    pub finish: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct EvaluateReport {
    #[serde(flatten)]
    evaluation: Evaluation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<WarningEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer_set_cbor_hex: Option<String>,
}

pub fn run(args: EvaluateArgs) -> Result<()> {
    let questionnaire = load_questionnaire(&args.questionnaire)?;
    let answers = match &args.answers {
        Some(path) => load_answers(path)?,
        None => AnswerMap::new(),
    };

    let session = QuestionnaireSession::new(questionnaire).with_answers(answers);
    let warnings = match &args.previous {
        Some(path) => session.warnings_since(&load_answers(path)?),
        None => session.initial_warnings(),
    };

    let evaluation = session.evaluate();
    let answer_set_cbor_hex = if args.finish {
        let result = session.finish().context("cannot finish questionnaire")?;
        Some(result.answer_set_cbor_hex)
    } else {
        None
    };

    let report = EvaluateReport {
        evaluation,
        warnings,
        answer_set_cbor_hex,
    };
    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", render(&report));
            Ok(())
        }
    }
}

fn render(report: &EvaluateReport) -> String {
    let evaluation = &report.evaluation;
    let progress = evaluation.progress;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "progress: {}/{} ({}%)",
        progress.answered, progress.total, progress.percent
    );
    match &evaluation.next_question {
        Some(qid) => {
            let _ = writeln!(out, "next: {qid}");
        }
        None => out.push_str("next: none\n"),
    }
    if !evaluation.reachability.unreachable.is_empty() {
        let skipped = evaluation
            .reachability
            .unreachable
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let _ = writeln!(out, "skipped: {}", skipped.join(", "));
    }
    for error in &evaluation.validation.errors {
        let _ = writeln!(out, "error {}: {}", error.qid, error.message);
    }
    for (qid, widgets) in &evaluation.widgets {
        let active = [
            ("comment", widgets.comment),
            ("upload", widgets.upload),
            ("due-date", widgets.due_date),
            ("warning", widgets.warning),
            ("calendar", widgets.calendar),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect::<Vec<_>>();
        let _ = writeln!(out, "widgets {qid}: {}", active.join(", "));
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "warning {}: {}", warning.qid, warning.message);
    }
    let _ = writeln!(
        out,
        "complete: {}",
        if evaluation.is_complete() { "yes" } else { "no" }
    );
    if let Some(hex) = &report.answer_set_cbor_hex {
        let _ = writeln!(out, "answer set: {hex}");
    }
    out
}
