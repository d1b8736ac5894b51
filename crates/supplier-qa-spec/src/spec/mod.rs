pub mod question;
pub mod questionnaire;
pub mod response;
pub mod skip;

pub use question::{Qid, Question, QuestionOption};
pub use questionnaire::{CompiledQuestion, LoadError, Questionnaire, QuestionnaireSpec};
pub use response::{ResponseKind, ResponseOption, ResponseSpec, ResponseSpecError};
pub use skip::{AnswerCondition, JumpClause, JumpTarget, SkipRule, SkipTrigger};
