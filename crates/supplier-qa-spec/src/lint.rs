use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Qid;
use crate::spec::questionnaire::Questionnaire;
use crate::spec::response::ResponseSpec;
use crate::widgets::CommentType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    ParseFallback { encoded: String, reason: String },
    DroppedOption { encoded: String, reason: String },
    SkipTargetUnresolved { target: Qid },
    BackwardSkip { target: Qid },
    IncompleteSkip,
    UnknownCommentType { tag: String },
    DuplicateQid,
}

/// Authoring problem found when a questionnaire is imported. None of these stop evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthoringIssue {
    pub qid: Qid,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for AuthoringIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::ParseFallback { encoded, reason } => write!(
                f,
                "{}: response '{}' rendered as TEXT ({})",
                self.qid, encoded, reason
            ),
            IssueKind::DroppedOption { encoded, reason } => write!(
                f,
                "{}: response '{}' drops an option ({})",
                self.qid, encoded, reason
            ),
            IssueKind::SkipTargetUnresolved { target } => {
                write!(f, "{}: skip target {} does not exist", self.qid, target)
            }
            IssueKind::BackwardSkip { target } => write!(
                f,
                "{}: skip target {} is not after the question and will be ignored",
                self.qid, target
            ),
            IssueKind::IncompleteSkip => {
                write!(f, "{}: skip logic has no usable trigger or jump", self.qid)
            }
            IssueKind::UnknownCommentType { tag } => {
                write!(f, "{}: unknown comment type '{}'", self.qid, tag)
            }
            IssueKind::DuplicateQid => write!(f, "{}: duplicate question id", self.qid),
        }
    }
}

pub fn lint(questionnaire: &Questionnaire) -> Vec<AuthoringIssue> {
    let mut issues = Vec::new();
    let mut seen = BTreeSet::new();

    for (index, compiled) in questionnaire.questions().iter().enumerate() {
        let question = &compiled.question;
        let qid = compiled.qid();
        let mut push = |kind| {
            issues.push(AuthoringIssue {
                qid: qid.clone(),
                kind,
            })
        };

        if !seen.insert(qid.clone()) {
            push(IssueKind::DuplicateQid);
        }

        match ResponseSpec::try_parse_partial(&question.response) {
            Ok((_, dropped)) => {
                for err in dropped {
                    push(IssueKind::DroppedOption {
                        encoded: question.response.clone(),
                        reason: err.to_string(),
                    });
                }
            }
            Err(err) => push(IssueKind::ParseFallback {
                encoded: question.response.clone(),
                reason: err.to_string(),
            }),
        }

        if let Some(tag) = question
            .comment_type
            .as_deref()
            .filter(|tag| !tag.trim().is_empty())
            && tag.parse::<CommentType>().is_err()
        {
            push(IssueKind::UnknownCommentType {
                tag: tag.to_string(),
            });
        }

        let has_answer = question
            .skip_logic_answer
            .as_deref()
            .is_some_and(|raw| !raw.trim().is_empty());
        let has_jump = question
            .skip_logic_jump
            .as_deref()
            .is_some_and(|raw| !raw.trim().is_empty());
        match &compiled.skip {
            Some(rule) => {
                for target in rule.jump.targets() {
                    match questionnaire.position(target) {
                        None => push(IssueKind::SkipTargetUnresolved {
                            target: target.clone(),
                        }),
                        Some(target_index) if target_index <= index => {
                            push(IssueKind::BackwardSkip {
                                target: target.clone(),
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
            None if has_answer || has_jump => push(IssueKind::IncompleteSkip),
            None => {}
        }
    }

    issues
}
