use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerMap;
use crate::spec::question::Qid;
use crate::spec::questionnaire::Questionnaire;
use crate::spec::skip::SkipTrigger;

/// A triggered skip: everything strictly between `from` and `target` is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkipEvent {
    pub from: Qid,
    pub trigger: SkipTrigger,
    pub target: Qid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Reachability {
    pub reachable: BTreeSet<Qid>,
    pub unreachable: BTreeSet<Qid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_events: Vec<SkipEvent>,
}

impl Reachability {
    /// Unknown ids count as reachable.
    pub fn is_reachable(&self, qid: &Qid) -> bool {
        !self.unreachable.contains(qid)
    }
}

/// Evaluates every configured skip against the live answers.
///
/// Each question's trigger is evaluated even when an earlier skip already made that question
/// unreachable, so skips cascade from hidden questions that still hold answers. Unresolved
/// targets and targets at or before the source are ignored.
pub fn compute_reachable(questionnaire: &Questionnaire, answers: &AnswerMap) -> Reachability {
    let questions = questionnaire.questions();
    let mut skipped = vec![false; questions.len()];
    let mut skip_events = Vec::new();

    for (source_index, question) in questions.iter().enumerate() {
        let Some(rule) = &question.skip else {
            continue;
        };
        if !rule.trigger.is_triggered(answers.get(question.qid())) {
            continue;
        }
        let Some(target) = rule.jump.resolve(question.qid(), answers) else {
            tracing::trace!(qid = %question.qid(), "skip triggered but no jump clause matched");
            continue;
        };
        let Some(target_index) = questionnaire.position(target) else {
            tracing::debug!(qid = %question.qid(), %target, "skip target unresolved; ignoring");
            continue;
        };
        if target_index <= source_index {
            tracing::debug!(qid = %question.qid(), %target, "backward skip target; ignoring");
            continue;
        }

        for flag in &mut skipped[source_index + 1..target_index] {
            *flag = true;
        }
        skip_events.push(SkipEvent {
            from: question.qid().clone(),
            trigger: rule.trigger.clone(),
            target: target.clone(),
        });
    }

    let mut reachability = Reachability {
        skip_events,
        ..Reachability::default()
    };
    for (question, skipped) in questions.iter().zip(skipped) {
        let qid = question.qid().clone();
        if skipped {
            reachability.unreachable.insert(qid);
        } else {
            reachability.reachable.insert(qid);
        }
    }
    // A duplicated id is unreachable if any of its occurrences is.
    reachability
        .reachable
        .retain(|qid| !reachability.unreachable.contains(qid));
    reachability
}
