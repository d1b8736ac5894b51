use std::collections::BTreeMap;

use crate::answers::{Answer, AnswerMap, ErrorKind, ValidationError, ValidationResult};
use crate::reachability::{Reachability, compute_reachable};
use crate::spec::question::Qid;
use crate::spec::questionnaire::{CompiledQuestion, Questionnaire};
use crate::spec::response::ResponseKind;

/// Validates one question's answer. Unreachable questions are never in error.
///
/// Rules short-circuit in order: required-and-empty, then fixed-length digit count.
pub fn validate_question(
    question: &CompiledQuestion,
    answer: Option<&Answer>,
    reachable: bool,
) -> Option<ValidationError> {
    if !reachable {
        return None;
    }

    let present = answer.filter(|answer| !answer.is_empty());
    let Some(answer) = present else {
        if question.required() {
            return Some(ValidationError {
                qid: question.qid().clone(),
                kind: ErrorKind::RequiredMissing,
                message: "an answer is required".into(),
            });
        }
        return None;
    };

    if question.response.kind == ResponseKind::FixedLengthDigits
        && let Some(expected) = question.response.length
        && let Some(text) = answer.canonical_text()
    {
        let actual = text.chars().count();
        if actual != expected {
            return Some(ValidationError {
                qid: question.qid().clone(),
                kind: ErrorKind::LengthMismatch { expected, actual },
                message: format!("expected {expected} characters, got {actual}"),
            });
        }
    }

    None
}

/// Validates every question against the current answers and their reachability.
pub fn validate(questionnaire: &Questionnaire, answers: &AnswerMap) -> ValidationResult {
    let reachability = compute_reachable(questionnaire, answers);
    validate_with(questionnaire, answers, &reachability)
}

pub fn validate_with(
    questionnaire: &Questionnaire,
    answers: &AnswerMap,
    reachability: &Reachability,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut missing_required = Vec::new();

    for question in questionnaire.questions() {
        let reachable = reachability.is_reachable(question.qid());
        if let Some(error) = validate_question(question, answers.get(question.qid()), reachable) {
            if error.kind == ErrorKind::RequiredMissing {
                missing_required.push(question.qid().clone());
            }
            errors.push(error);
        }
    }

    let unknown_fields = answers
        .keys()
        .filter(|qid| !questionnaire.contains(qid))
        .cloned()
        .collect::<Vec<_>>();

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

/// Per-question outcome, `None` meaning valid.
pub fn validation_map(
    questionnaire: &Questionnaire,
    result: &ValidationResult,
) -> BTreeMap<Qid, Option<ErrorKind>> {
    questionnaire
        .questions()
        .iter()
        .map(|question| {
            let kind = result.error_for(question.qid()).map(|error| error.kind);
            (question.qid().clone(), kind)
        })
        .collect()
}
