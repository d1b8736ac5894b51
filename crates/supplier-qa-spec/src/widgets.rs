use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::Answer;
use crate::spec::question::Qid;

/// Tag selecting which secondary input a question reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentType {
    YnCommentY,
    YnCommentN,
    YnUploadY,
    YnUploadN,
    YnDuedateY,
    #[serde(rename = "COMMENTONLY")]
    CommentOnly,
    #[serde(rename = "UPLOADONLY")]
    UploadOnly,
    YnWarningY,
    YnWarningN,
    Calendar,
}

impl FromStr for CommentType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let comment_type = match raw.trim().to_ascii_uppercase().as_str() {
            "YN_COMMENT_Y" => CommentType::YnCommentY,
            "YN_COMMENT_N" => CommentType::YnCommentN,
            "YN_UPLOAD_Y" => CommentType::YnUploadY,
            "YN_UPLOAD_N" => CommentType::YnUploadN,
            "YN_DUEDATE_Y" => CommentType::YnDuedateY,
            "COMMENTONLY" => CommentType::CommentOnly,
            "UPLOADONLY" => CommentType::UploadOnly,
            "YN_WARNING_Y" => CommentType::YnWarningY,
            "YN_WARNING_N" => CommentType::YnWarningN,
            "CALENDAR" => CommentType::Calendar,
            other => return Err(format!("unknown comment type '{other}'")),
        };
        Ok(comment_type)
    }
}

/// Secondary inputs active for one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Widgets {
    pub comment: bool,
    pub upload: bool,
    pub due_date: bool,
    pub warning: bool,
    pub calendar: bool,
}

impl Widgets {
    pub fn any(&self) -> bool {
        self.comment || self.upload || self.due_date || self.warning || self.calendar
    }
}

/// Warning raised when an answer moves into a warning condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WarningEvent {
    pub qid: Qid,
    pub message: String,
}

pub fn widgets_for(comment_type: Option<CommentType>, answer: Option<&Answer>) -> Widgets {
    let Some(comment_type) = comment_type else {
        return Widgets::default();
    };
    let yes_no = answer.and_then(Answer::yes_no);
    let is_yes = yes_no == Some(true);
    let is_no = yes_no == Some(false);

    let mut widgets = Widgets::default();
    match comment_type {
        CommentType::YnCommentY => widgets.comment = is_yes,
        CommentType::YnCommentN => widgets.comment = is_no,
        CommentType::YnUploadY => widgets.upload = is_yes,
        CommentType::YnUploadN => widgets.upload = is_no,
        CommentType::YnDuedateY => widgets.due_date = is_yes,
        CommentType::CommentOnly => widgets.comment = true,
        CommentType::UploadOnly => widgets.upload = true,
        CommentType::YnWarningY => widgets.warning = is_yes,
        CommentType::YnWarningN => widgets.warning = is_no,
        CommentType::Calendar => widgets.calendar = true,
    }
    widgets
}

/// Fires only on the edge into the warning condition. `previous == None` means initial load.
pub fn warning_transition(
    qid: &Qid,
    comment_type: Option<CommentType>,
    warning_message: Option<&str>,
    previous: Option<&Answer>,
    current: Option<&Answer>,
) -> Option<WarningEvent> {
    let was_warning = widgets_for(comment_type, previous).warning;
    let is_warning = widgets_for(comment_type, current).warning;
    if was_warning || !is_warning {
        return None;
    }
    Some(WarningEvent {
        qid: qid.clone(),
        message: warning_message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Please review your answer to question {qid}.")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_follows_yes() {
        let widgets = widgets_for(Some(CommentType::YnUploadY), Some(&Answer::text("Y")));
        assert_eq!(
            widgets,
            Widgets {
                upload: true,
                ..Widgets::default()
            }
        );
        assert!(!widgets_for(Some(CommentType::YnUploadY), Some(&Answer::Integer(0))).any());
    }

    #[test]
    fn comment_only_ignores_answer() {
        for answer in [None, Some(Answer::Empty), Some(Answer::text("No"))] {
            assert!(widgets_for(Some(CommentType::CommentOnly), answer.as_ref()).comment);
        }
    }

    #[test]
    fn unset_comment_type_shows_nothing() {
        assert!(!widgets_for(None, Some(&Answer::text("Yes"))).any());
    }

    #[test]
    fn parses_authored_tags() {
        assert_eq!("yn_duedate_y".parse(), Ok(CommentType::YnDuedateY));
        assert_eq!("COMMENTONLY".parse(), Ok(CommentType::CommentOnly));
        assert!("SOMETHING".parse::<CommentType>().is_err());
    }
}
