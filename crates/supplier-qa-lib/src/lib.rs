use std::collections::BTreeSet;

use serde_json::Value;
use supplier_qa_spec::{
    Answer, AnswerMap, AnswerSet, Evaluation, LoadError, Qid, Questionnaire, ResponseKind,
    WarningEvent, evaluate, warning_transition,
};
use thiserror::Error;

pub use supplier_qa_spec as spec;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub questionnaire_json: String,
    pub initial_answers_json: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("unknown question '{0}'")]
    UnknownQuestion(Qid),
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
    #[error("invalid answer for '{qid}': {reason}")]
    InvalidAnswer { qid: Qid, reason: String },
    #[error("questionnaire is not complete ({percent}%)")]
    Incomplete { percent: u8 },
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result of one answer mutation.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub evaluation: Evaluation,
    /// Warnings whose condition was entered by this mutation; display is up to the caller.
    pub warnings: Vec<WarningEvent>,
}

#[derive(Clone, Debug)]
pub struct SessionResult {
    pub answer_set: AnswerSet,
    pub answer_set_cbor_hex: String,
}

/// Owns one questionnaire and its answers; every mutation re-runs the engine from scratch.
pub struct QuestionnaireSession {
    questionnaire: Questionnaire,
    answers: AnswerMap,
}

impl QuestionnaireSession {
    pub fn new(questionnaire: Questionnaire) -> Self {
        Self {
            questionnaire,
            answers: AnswerMap::new(),
        }
    }

    pub fn from_config(config: SessionConfig) -> Result<Self, SessionError> {
        let questionnaire = Questionnaire::from_json(&config.questionnaire_json)?;
        let answers = match config.initial_answers_json {
            Some(raw) => serde_json::from_str(&raw)?,
            None => AnswerMap::new(),
        };
        Ok(Self::new(questionnaire).with_answers(answers))
    }

    /// Seeds stored answers without treating them as transitions. Plain stored values are
    /// re-typed the same way a patch would be.
    pub fn with_answers(mut self, mut answers: AnswerMap) -> Self {
        self.questionnaire.retype_answers(&mut answers);
        self.answers = answers;
        self
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn evaluate(&self) -> Evaluation {
        evaluate(&self.questionnaire, &self.answers)
    }

    /// Warnings implied by stored answers at initial load, with no transition history.
    pub fn initial_warnings(&self) -> Vec<WarningEvent> {
        self.warnings_since(&AnswerMap::new())
    }

    /// Warnings entered between `previous` and the stored answers, over every id in either map.
    pub fn warnings_since(&self, previous: &AnswerMap) -> Vec<WarningEvent> {
        let mut previous = previous.clone();
        self.questionnaire.retype_answers(&mut previous);
        let qids = previous
            .keys()
            .chain(self.answers.keys())
            .collect::<BTreeSet<_>>();
        qids.into_iter()
            .filter_map(|qid| self.warning_for(qid, previous.get(qid), self.answers.get(qid)))
            .collect()
    }

    pub fn set_answer(
        &mut self,
        qid: impl Into<Qid>,
        answer: Answer,
    ) -> Result<SubmitOutcome, SessionError> {
        let qid = qid.into();
        let warning = self.apply(qid, answer)?;
        Ok(self.outcome(warning.into_iter().collect()))
    }

    pub fn clear_answer(&mut self, qid: impl Into<Qid>) -> Result<SubmitOutcome, SessionError> {
        let qid = qid.into();
        if !self.questionnaire.contains(&qid) {
            return Err(SessionError::UnknownQuestion(qid));
        }
        self.answers.remove(&qid);
        Ok(self.outcome(Vec::new()))
    }

    pub fn reset(&mut self) {
        self.answers.clear();
    }

    /// Applies a JSON object of `qid -> plain value`. Arrays of codes are accepted for
    /// multi-select questions and stored as a bitmask.
    pub fn submit_patch_json(&mut self, patch_json: &str) -> Result<SubmitOutcome, SessionError> {
        let patch_value: Value = serde_json::from_str(patch_json)?;
        let patch_object = patch_value.as_object().ok_or_else(|| {
            SessionError::InvalidPatch("patch must be a JSON object map of qid -> value".into())
        })?;
        if patch_object.is_empty() {
            return Err(SessionError::InvalidPatch("patch cannot be empty".into()));
        }

        let mut staged = Vec::with_capacity(patch_object.len());
        for (raw_qid, value) in patch_object {
            let qid = Qid::new(raw_qid);
            let answer = self.decode_answer(&qid, value)?;
            staged.push((qid, answer));
        }

        self.submit_answers(staged)
    }

    /// Applies several answers, collecting the warnings each one enters. Nothing is applied
    /// when any id is unknown.
    pub fn submit_answers(
        &mut self,
        answers: impl IntoIterator<Item = (Qid, Answer)>,
    ) -> Result<SubmitOutcome, SessionError> {
        let staged = answers.into_iter().collect::<Vec<_>>();
        if let Some((qid, _)) = staged
            .iter()
            .find(|(qid, _)| !self.questionnaire.contains(qid))
        {
            return Err(SessionError::UnknownQuestion(qid.clone()));
        }

        let mut warnings = Vec::new();
        for (qid, answer) in staged {
            warnings.extend(self.apply(qid, answer)?);
        }
        Ok(self.outcome(warnings))
    }

    pub fn finish(self) -> Result<SessionResult, SessionError> {
        let evaluation = self.evaluate();
        if !evaluation.is_complete() {
            return Err(SessionError::Incomplete {
                percent: evaluation.progress.percent,
            });
        }

        let answer_set = AnswerSet {
            questionnaire_id: self.questionnaire.id.clone(),
            version: self.questionnaire.version.clone(),
            answers: self.answers,
            meta: None,
        };
        let cbor = answer_set
            .to_cbor()
            .map_err(|err| SessionError::Serialization(err.to_string()))?;

        Ok(SessionResult {
            answer_set,
            answer_set_cbor_hex: hex::encode(cbor),
        })
    }

    fn apply(&mut self, qid: Qid, answer: Answer) -> Result<Option<WarningEvent>, SessionError> {
        if !self.questionnaire.contains(&qid) {
            return Err(SessionError::UnknownQuestion(qid));
        }
        let previous = if answer.is_empty() {
            self.answers.remove(&qid)
        } else {
            self.answers.insert(qid.clone(), answer.clone())
        };
        tracing::debug!(%qid, answer = %answer, "answer updated");
        Ok(self.warning_for(&qid, previous.as_ref(), Some(&answer)))
    }

    fn warning_for(
        &self,
        qid: &Qid,
        previous: Option<&Answer>,
        current: Option<&Answer>,
    ) -> Option<WarningEvent> {
        let question = self.questionnaire.get(qid)?;
        warning_transition(
            qid,
            question.comment_type,
            question.question.warning_message.as_deref(),
            previous,
            current,
        )
    }

    fn decode_answer(&self, qid: &Qid, value: &Value) -> Result<Answer, SessionError> {
        let question = self
            .questionnaire
            .get(qid)
            .ok_or_else(|| SessionError::UnknownQuestion(qid.clone()))?;

        if let Value::Array(items) = value {
            if question.response.kind != ResponseKind::MultiSelectBitmask {
                return Err(SessionError::InvalidAnswer {
                    qid: qid.clone(),
                    reason: "only multi-select questions accept a list of codes".into(),
                });
            }
            let codes = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>();
            return Ok(Answer::Bitmask(question.response.encode_selection(&codes)));
        }

        let answer = Answer::from_plain(value).map_err(|reason| SessionError::InvalidAnswer {
            qid: qid.clone(),
            reason,
        })?;
        Ok(answer.typed_for(question.response.kind))
    }

    fn outcome(&self, warnings: Vec<WarningEvent>) -> SubmitOutcome {
        SubmitOutcome {
            evaluation: self.evaluate(),
            warnings,
        }
    }
}
