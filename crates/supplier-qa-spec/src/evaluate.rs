use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerMap, ValidationResult};
use crate::progress::{ProgressSummary, next_question, progress_with};
use crate::reachability::{Reachability, compute_reachable};
use crate::spec::question::Qid;
use crate::spec::questionnaire::Questionnaire;
use crate::validate::validate_with;
use crate::widgets::{Widgets, widgets_for};

/// Everything the presentation layer needs after an answer change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Evaluation {
    pub reachability: Reachability,
    pub validation: ValidationResult,
    pub progress: ProgressSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Qid>,
    /// Only questions with at least one active widget are listed.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub widgets: BTreeMap<Qid, Widgets>,
}

impl Evaluation {
    pub fn is_complete(&self) -> bool {
        self.validation.valid && self.progress.is_complete()
    }
}

/// Recomputes reachability, validation, progress and widgets from scratch.
pub fn evaluate(questionnaire: &Questionnaire, answers: &AnswerMap) -> Evaluation {
    let reachability = compute_reachable(questionnaire, answers);
    let validation = validate_with(questionnaire, answers, &reachability);
    let progress = progress_with(questionnaire, answers, &reachability);
    let next_question = next_question(questionnaire, answers, &reachability);

    let widgets = questionnaire
        .questions()
        .iter()
        .filter(|question| reachability.is_reachable(question.qid()))
        .filter_map(|question| {
            let widgets = widgets_for(question.comment_type, answers.get(question.qid()));
            widgets.any().then(|| (question.qid().clone(), widgets))
        })
        .collect();

    Evaluation {
        reachability,
        validation,
        progress,
        next_question,
        widgets,
    }
}
