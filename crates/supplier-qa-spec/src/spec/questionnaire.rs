use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answers::AnswerMap;
use crate::spec::question::{Qid, Question};
use crate::spec::response::ResponseSpec;
use crate::spec::skip::SkipRule;
use crate::widgets::CommentType;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid questionnaire json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid questionnaire toml: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Authored questionnaire document, as imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionnaireSpec {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

fn default_version() -> String {
    "1.0.0".into()
}

impl QuestionnaireSpec {
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_toml(raw: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(raw)?)
    }
}

/// A question together with its parsed response shape, skip rule and comment type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuestion {
    pub question: Question,
    pub response: ResponseSpec,
    pub skip: Option<SkipRule>,
    pub comment_type: Option<CommentType>,
}

impl CompiledQuestion {
    pub fn compile(question: Question) -> Self {
        let response = ResponseSpec::parse(&question.response);
        let skip = SkipRule::parse(
            question.skip_logic_answer.as_deref(),
            question.skip_logic_jump.as_deref(),
        );
        let comment_type = question
            .comment_type
            .as_deref()
            .filter(|tag| !tag.trim().is_empty())
            .and_then(|tag| match tag.parse() {
                Ok(comment_type) => Some(comment_type),
                Err(err) => {
                    tracing::debug!(qid = %question.qid, error = %err, "ignoring comment type");
                    None
                }
            });
        Self {
            question,
            response,
            skip,
            comment_type,
        }
    }

    pub fn qid(&self) -> &Qid {
        &self.question.qid
    }

    pub fn required(&self) -> bool {
        self.question.required
    }
}

/// Ordered, immutable question sequence consumed by every engine function.
#[derive(Debug, Clone, PartialEq)]
pub struct Questionnaire {
    pub id: String,
    pub title: String,
    pub version: String,
    questions: Vec<CompiledQuestion>,
    positions: BTreeMap<Qid, usize>,
}

impl Questionnaire {
    pub fn new(questions: Vec<Question>) -> Self {
        Self::from_spec(QuestionnaireSpec {
            id: String::new(),
            title: String::new(),
            version: default_version(),
            description: None,
            questions,
        })
    }

    pub fn from_spec(spec: QuestionnaireSpec) -> Self {
        let questions = spec
            .questions
            .into_iter()
            .map(CompiledQuestion::compile)
            .collect::<Vec<_>>();
        let mut positions = BTreeMap::new();
        for (index, question) in questions.iter().enumerate() {
            positions.entry(question.qid().clone()).or_insert(index);
        }
        Self {
            id: spec.id,
            title: spec.title,
            version: spec.version,
            questions,
            positions,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        QuestionnaireSpec::from_json(raw).map(Self::from_spec)
    }

    pub fn from_toml(raw: &str) -> Result<Self, LoadError> {
        QuestionnaireSpec::from_toml(raw).map(Self::from_spec)
    }

    pub fn questions(&self) -> &[CompiledQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Sequence position of the first question with this id.
    pub fn position(&self, qid: &Qid) -> Option<usize> {
        self.positions.get(qid).copied()
    }

    pub fn get(&self, qid: &Qid) -> Option<&CompiledQuestion> {
        self.position(qid).map(|index| &self.questions[index])
    }

    pub fn contains(&self, qid: &Qid) -> bool {
        self.positions.contains_key(qid)
    }

    /// Re-types plain answers by each question's response kind. Unknown ids are left as is.
    pub fn retype_answers(&self, answers: &mut AnswerMap) {
        for (qid, answer) in answers.iter_mut() {
            if let Some(question) = self.get(qid) {
                *answer = std::mem::take(answer).typed_for(question.response.kind);
            }
        }
    }
}
