use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::{Answer, AnswerMap};
use crate::spec::question::Qid;

/// Condition on the source question's answer that activates a skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum SkipTrigger {
    /// `"0"`: answered No.
    No,
    /// `"1"`: answered Yes.
    Yes,
    /// `"D"`: any dropdown selection.
    AnySelection,
    /// `"M"`: multi-select mask with at least one bit set.
    AnyBit,
    /// `"A"`: any answer at all.
    Answered,
    /// Exact option code.
    Code(String),
}

impl SkipTrigger {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trigger = match trimmed {
            "" => return None,
            "0" => SkipTrigger::No,
            "1" => SkipTrigger::Yes,
            "D" => SkipTrigger::AnySelection,
            "M" => SkipTrigger::AnyBit,
            "A" => SkipTrigger::Answered,
            code => SkipTrigger::Code(code.to_string()),
        };
        Some(trigger)
    }

    pub fn is_triggered(&self, answer: Option<&Answer>) -> bool {
        let Some(answer) = answer.filter(|answer| !answer.is_empty()) else {
            return false;
        };
        match self {
            SkipTrigger::No => answer.yes_no() == Some(false),
            SkipTrigger::Yes => answer.yes_no() == Some(true),
            SkipTrigger::AnySelection | SkipTrigger::Answered => true,
            SkipTrigger::AnyBit => answer.as_mask().is_some_and(|mask| mask > 0),
            SkipTrigger::Code(code) => answer.canonical_text().as_deref() == Some(code.as_str()),
        }
    }
}

/// One `qid=value` term, or a bare `value` compared against the source question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qid: Option<Qid>,
    pub value: String,
}

impl AnswerCondition {
    fn matches(&self, source: &Qid, answers: &AnswerMap) -> bool {
        let qid = self.qid.as_ref().unwrap_or(source);
        answers
            .get(qid)
            .is_some_and(|answer| answer.matches_token(&self.value))
    }
}

/// `cond&cond:target` clause of a conditional jump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JumpClause {
    pub conditions: Vec<AnswerCondition>,
    pub target: Qid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpTarget {
    Direct { target: Qid },
    Conditional { clauses: Vec<JumpClause> },
}

impl JumpTarget {
    /// Parses `1011` or `1002=1&1003=AA:1011;1002=0:1020`. Malformed clauses are dropped.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !trimmed.contains(':') {
            return Some(JumpTarget::Direct {
                target: Qid::new(trimmed),
            });
        }

        let clauses = trimmed
            .split(';')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .filter_map(parse_clause)
            .collect::<Vec<_>>();
        if clauses.is_empty() {
            tracing::debug!(jump = trimmed, "skip jump has no usable clause");
            return None;
        }
        Some(JumpTarget::Conditional { clauses })
    }

    /// First target whose conditions all hold against the live answers, left to right.
    pub fn resolve(&self, source: &Qid, answers: &AnswerMap) -> Option<&Qid> {
        match self {
            JumpTarget::Direct { target } => Some(target),
            JumpTarget::Conditional { clauses } => clauses
                .iter()
                .find(|clause| {
                    clause
                        .conditions
                        .iter()
                        .all(|condition| condition.matches(source, answers))
                })
                .map(|clause| &clause.target),
        }
    }

    pub fn targets(&self) -> Vec<&Qid> {
        match self {
            JumpTarget::Direct { target } => vec![target],
            JumpTarget::Conditional { clauses } => {
                clauses.iter().map(|clause| &clause.target).collect()
            }
        }
    }
}

fn parse_clause(clause: &str) -> Option<JumpClause> {
    let (predicate, target) = clause.rsplit_once(':')?;
    let target = Qid::new(target);
    if target.is_empty() {
        return None;
    }
    let conditions = predicate
        .split('&')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| match term.split_once('=') {
            Some((qid, value)) => AnswerCondition {
                qid: Some(Qid::new(qid)),
                value: value.trim().to_string(),
            },
            None => AnswerCondition {
                qid: None,
                value: term.to_string(),
            },
        })
        .collect::<Vec<_>>();
    if conditions.is_empty() {
        return None;
    }
    Some(JumpClause { conditions, target })
}

/// Parsed skip-logic pair of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkipRule {
    pub trigger: SkipTrigger,
    pub jump: JumpTarget,
}

impl SkipRule {
    pub fn parse(answer: Option<&str>, jump: Option<&str>) -> Option<Self> {
        let trigger = SkipTrigger::parse(answer?)?;
        let jump = JumpTarget::parse(jump?)?;
        Some(Self { trigger, jump })
    }
}
