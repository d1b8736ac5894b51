use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerMap;
use crate::reachability::{Reachability, compute_reachable};
use crate::spec::question::Qid;
use crate::spec::questionnaire::{CompiledQuestion, Questionnaire};

/// Completion counters over required, reachable questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressSummary {
    pub answered: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressSummary {
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}

/// Completion percentage in `[0, 100]`; `0` when nothing required is reachable.
pub fn progress(questionnaire: &Questionnaire, answers: &AnswerMap) -> u8 {
    progress_summary(questionnaire, answers).percent
}

pub fn progress_summary(questionnaire: &Questionnaire, answers: &AnswerMap) -> ProgressSummary {
    let reachability = compute_reachable(questionnaire, answers);
    progress_with(questionnaire, answers, &reachability)
}

pub fn progress_with(
    questionnaire: &Questionnaire,
    answers: &AnswerMap,
    reachability: &Reachability,
) -> ProgressSummary {
    let (answered, total) = questionnaire
        .questions()
        .iter()
        .filter(|question| question.required() && reachability.is_reachable(question.qid()))
        .fold((0, 0), |(answered, total), question| {
            let done = is_answered(question, answers);
            (answered + usize::from(done), total + 1)
        });

    let percent = if total == 0 {
        0
    } else {
        ((answered as f64 * 100.0) / total as f64).round() as u8
    };

    ProgressSummary {
        answered,
        total,
        percent,
    }
}

/// First reachable, required, unanswered question in sequence order.
pub fn next_question(
    questionnaire: &Questionnaire,
    answers: &AnswerMap,
    reachability: &Reachability,
) -> Option<Qid> {
    questionnaire
        .questions()
        .iter()
        .filter(|question| reachability.is_reachable(question.qid()))
        .find(|question| question.required() && !is_answered(question, answers))
        .map(|question| question.qid().clone())
}

fn is_answered(question: &CompiledQuestion, answers: &AnswerMap) -> bool {
    answers
        .get(question.qid())
        .is_some_and(|answer| !answer.is_empty())
}
