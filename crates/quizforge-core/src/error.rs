//! Engine error types.
//!
//! Every fallible engine operation returns a [`QuizError`]. File-boundary
//! helpers wrap it in `anyhow::Error`, so hosts can still downcast and
//! classify failures without string matching.

use thiserror::Error;

use crate::model::OptionKey;
use crate::session::{NavigationMode, SessionStatus};

/// Errors produced by the quiz engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The bank source is malformed. Fatal to loading that bank.
    #[error("{}", format_data_error(.question_id, .field, .message))]
    DataFormat {
        question_id: Option<u32>,
        field: String,
        message: String,
    },

    /// A session or score was requested over zero questions.
    #[error("selection is empty: at least one question is required")]
    EmptySelection,

    /// A submission was rejected before evaluation.
    #[error("invalid answer: {0}")]
    InvalidAnswer(#[from] InvalidAnswer),

    /// No question with this id exists in the bank.
    #[error("question {0} not found")]
    NotFound(u32),

    /// The operation is not valid in the session's current status.
    #[error("cannot {operation} while session is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// The operation is not available under the session's navigation mode.
    #[error("cannot {operation} in {mode} mode")]
    ModeRestricted {
        operation: &'static str,
        mode: NavigationMode,
    },

    /// A jump target lies outside the session sequence.
    #[error("index {index} is out of range for {len} question(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl QuizError {
    pub(crate) fn data_format(
        question_id: Option<u32>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        QuizError::DataFormat {
            question_id,
            field: field.into(),
            message: message.into(),
        }
    }
}

fn format_data_error(question_id: &Option<u32>, field: &str, message: &str) -> String {
    match question_id {
        Some(id) => format!("question {id}: field `{field}`: {message}"),
        None => format!("field `{field}`: {message}"),
    }
}

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAnswer {
    /// No option was selected.
    #[error("at least one option must be selected")]
    Empty,

    /// The key does not name one of the question's options.
    #[error("option {0} does not exist for this question")]
    UnknownOption(OptionKey),

    /// A single-answer question received more than one key.
    #[error("single-answer question accepts one option, got {submitted}")]
    TooManyForSingle { submitted: usize },

    /// Free text could not be read as option keys.
    #[error("cannot read `{0}` as an option key")]
    Unreadable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_format_names_question_and_field() {
        let err = QuizError::data_format(Some(7), "answer", "key E not in options");
        assert_eq!(
            err.to_string(),
            "question 7: field `answer`: key E not in options"
        );

        let err = QuizError::data_format(None, "document", "expected `[`");
        assert_eq!(err.to_string(), "field `document`: expected `[`");
    }

    #[test]
    fn invalid_answer_converts_into_quiz_error() {
        let err: QuizError = InvalidAnswer::TooManyForSingle { submitted: 2 }.into();
        assert!(matches!(
            err,
            QuizError::InvalidAnswer(InvalidAnswer::TooManyForSingle { submitted: 2 })
        ));
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn state_errors_render_status_and_mode() {
        let err = QuizError::InvalidState {
            operation: "submit an answer",
            status: SessionStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "cannot submit an answer while session is completed"
        );

        let err = QuizError::ModeRestricted {
            operation: "jump to a question",
            mode: NavigationMode::Sequential,
        };
        assert_eq!(err.to_string(), "cannot jump to a question in sequential mode");
    }
}
