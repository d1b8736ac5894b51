#![allow(missing_docs)]

pub mod answers;
pub mod evaluate;
pub mod lint;
pub mod progress;
pub mod reachability;
pub mod spec;
pub mod validate;
pub mod widgets;
pub mod zcode;

pub use answers::{
    Answer, AnswerMap, AnswerSet, ErrorKind, Meta, ValidationError, ValidationResult,
    normalize_yes_no,
};
pub use evaluate::{Evaluation, evaluate};
pub use lint::{AuthoringIssue, IssueKind, lint};
pub use progress::{ProgressSummary, next_question, progress, progress_summary};
pub use reachability::{Reachability, SkipEvent, compute_reachable};
pub use spec::{
    CompiledQuestion, LoadError, Qid, Question, QuestionOption, Questionnaire, QuestionnaireSpec,
    ResponseKind, ResponseOption, ResponseSpec, ResponseSpecError, SkipRule, SkipTrigger,
};
pub use validate::{validate, validate_question, validation_map};
pub use widgets::{CommentType, WarningEvent, Widgets, warning_transition, widgets_for};
pub use zcode::ZCode;

/// JSON Schema of the authored questionnaire document.
pub fn questionnaire_schema() -> schemars::Schema {
    schemars::schema_for!(QuestionnaireSpec)
}
