//! Answer validation and set-based correctness.

use crate::error::{InvalidAnswer, QuizError};
use crate::model::{AnswerSet, OptionKey, Question};

/// Check that a submission is acceptable for a question without judging it.
///
/// Rejects an empty set, a key the question does not offer, and more than
/// one key for a single-answer question.
pub fn validate_submission(question: &Question, submitted: &AnswerSet) -> Result<(), QuizError> {
    if submitted.is_empty() {
        return Err(InvalidAnswer::Empty.into());
    }
    if let Some(&unknown) = submitted.iter().find(|k| !question.has_option(**k)) {
        return Err(InvalidAnswer::UnknownOption(unknown).into());
    }
    if !question.is_multi_answer() && submitted.len() > 1 {
        return Err(InvalidAnswer::TooManyForSingle {
            submitted: submitted.len(),
        }
        .into());
    }
    Ok(())
}

/// Validate a submission, then report whether it matches the correct answer
/// exactly as a set.
pub fn evaluate(question: &Question, submitted: &AnswerSet) -> Result<bool, QuizError> {
    validate_submission(question, submitted)?;
    Ok(submitted == question.correct_answer())
}

/// Correctness for scoring. Unanswered is incorrect; never fails.
pub fn is_correct(question: &Question, response: Option<&AnswerSet>) -> bool {
    response.is_some_and(|r| r == question.correct_answer())
}

/// Read free text such as `a, c` or `B D` into a set of keys.
///
/// Duplicates collapse. An empty result is returned as-is and rejected later
/// by [`validate_submission`].
pub fn parse_keys(text: &str) -> Result<AnswerSet, QuizError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<OptionKey>()
                .map_err(|_| QuizError::from(InvalidAnswer::Unreadable(t.to_string())))
        })
        .collect()
}
