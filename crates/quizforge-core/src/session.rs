//! The quiz session state machine.
//!
//! A session moves `NotStarted -> InProgress -> Completed`. The only way
//! back from `Completed` is [`Session::restart`]. Every failing operation
//! leaves the session exactly as it was.
//!
//! Two navigation modes share one implementation:
//!
//! - `sequential` (exam flow): only the current question can be answered,
//!   and each accepted answer advances; the last one completes the session.
//! - `free` (study flow): [`Session::next_question`],
//!   [`Session::previous_question`] and [`Session::jump_to`] move freely
//!   without answering, answers never move the position, and
//!   [`Session::finish`] ends the session.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::evaluator::evaluate;
use crate::model::{AnswerSet, OptionKey, Question};
use crate::report::ScoreReport;

/// How a session may be navigated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Answer in order, auto-advancing. Used for timed exams.
    #[default]
    #[serde(alias = "exam")]
    Sequential,
    /// Move anywhere, answer anything. Used for study.
    #[serde(alias = "study")]
    Free,
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationMode::Sequential => write!(f, "sequential"),
            NavigationMode::Free => write!(f, "free"),
        }
    }
}

impl FromStr for NavigationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "exam" => Ok(NavigationMode::Sequential),
            "free" | "study" => Ok(NavigationMode::Free),
            other => Err(format!("unknown navigation mode: {other}")),
        }
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::NotStarted => write!(f, "not started"),
            SessionStatus::InProgress => write!(f, "in progress"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Result of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub question_id: u32,
    pub correct: bool,
    /// True when this submission completed the session.
    pub completed: bool,
}

/// What a host needs to display the question at the current position.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView<'a> {
    /// Zero-based position in the sequence.
    pub index: usize,
    pub total: usize,
    pub id: u32,
    pub text: &'a str,
    pub options: &'a BTreeMap<OptionKey, String>,
    pub answered: bool,
    pub response: Option<&'a AnswerSet>,
    pub multi_answer: bool,
    /// How many options the correct answer has ("select N").
    pub expected_selections: usize,
}

/// Answered count against position, for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
    pub answered: usize,
}

/// One user's attempt at a sequence of questions.
#[derive(Debug, Clone)]
pub struct Session {
    mode: NavigationMode,
    sequence: Vec<Arc<Question>>,
    position: usize,
    responses: HashMap<u32, AnswerSet>,
    status: SessionStatus,
}

impl Session {
    /// A session with no questions yet. Call [`Session::start`] to begin.
    pub fn new(mode: NavigationMode) -> Self {
        Self {
            mode,
            sequence: Vec::new(),
            position: 0,
            responses: HashMap::new(),
            status: SessionStatus::NotStarted,
        }
    }

    /// Begin a session over `sequence`, replacing any previous one.
    pub fn start(&mut self, sequence: Vec<Arc<Question>>) -> Result<(), QuizError> {
        check_sequence(&sequence)?;
        self.sequence = sequence;
        self.position = 0;
        self.responses.clear();
        self.status = SessionStatus::InProgress;
        tracing::debug!(
            "session started: {} question(s), {} mode",
            self.sequence.len(),
            self.mode
        );
        Ok(())
    }

    /// Start a `NotStarted` session over the sequence it already holds.
    pub fn begin(&mut self) -> Result<(), QuizError> {
        if self.status != SessionStatus::NotStarted {
            return Err(QuizError::InvalidState {
                operation: "begin",
                status: self.status,
            });
        }
        check_sequence(&self.sequence)?;
        self.position = 0;
        self.responses.clear();
        self.status = SessionStatus::InProgress;
        tracing::debug!(
            "session started: {} question(s), {} mode",
            self.sequence.len(),
            self.mode
        );
        Ok(())
    }

    /// Reset to `NotStarted` with no responses, keeping the sequence unless a
    /// new one is given.
    pub fn restart(&mut self, sequence: Option<Vec<Arc<Question>>>) -> Result<(), QuizError> {
        if let Some(sequence) = sequence {
            check_sequence(&sequence)?;
            self.sequence = sequence;
        }
        self.position = 0;
        self.responses.clear();
        self.status = SessionStatus::NotStarted;
        tracing::debug!("session restarted with {} question(s)", self.sequence.len());
        Ok(())
    }

    /// Answer the question at the current position.
    ///
    /// A resubmission overwrites the earlier answer. In sequential mode the
    /// position then advances, and answering the last question completes
    /// the session.
    pub fn submit_answer(&mut self, submitted: AnswerSet) -> Result<SubmitOutcome, QuizError> {
        self.require_in_progress("submit an answer")?;

        let question = Arc::clone(&self.sequence[self.position]);
        let correct = evaluate(&question, &submitted)?;
        self.responses.insert(question.id(), submitted);

        if self.mode == NavigationMode::Sequential {
            if self.position + 1 == self.sequence.len() {
                self.status = SessionStatus::Completed;
                tracing::debug!("session completed");
            } else {
                self.position += 1;
            }
        }

        tracing::debug!(
            "question {} answered ({})",
            question.id(),
            if correct { "correct" } else { "incorrect" }
        );

        Ok(SubmitOutcome {
            question_id: question.id(),
            correct,
            completed: self.status == SessionStatus::Completed,
        })
    }

    /// Move forward one question. Returns `false` at the last question.
    pub fn next_question(&mut self) -> Result<bool, QuizError> {
        self.require_free("move to the next question")?;
        if self.position + 1 < self.sequence.len() {
            self.position += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Move back one question. Returns `false` at the first question.
    pub fn previous_question(&mut self) -> Result<bool, QuizError> {
        self.require_free("move to the previous question")?;
        if self.position > 0 {
            self.position -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Move to a zero-based position.
    pub fn jump_to(&mut self, index: usize) -> Result<(), QuizError> {
        self.require_free("jump to a question")?;
        if index >= self.sequence.len() {
            return Err(QuizError::IndexOutOfRange {
                index,
                len: self.sequence.len(),
            });
        }
        self.position = index;
        Ok(())
    }

    /// The correct answer of the current question. Available in free mode,
    /// or in any mode once the session is completed.
    pub fn reveal(&self) -> Result<&AnswerSet, QuizError> {
        match self.status {
            SessionStatus::Completed => {}
            SessionStatus::InProgress if self.mode == NavigationMode::Free => {}
            SessionStatus::InProgress => {
                return Err(QuizError::ModeRestricted {
                    operation: "reveal the answer",
                    mode: self.mode,
                })
            }
            SessionStatus::NotStarted => {
                return Err(QuizError::InvalidState {
                    operation: "reveal the answer",
                    status: self.status,
                })
            }
        }
        Ok(self.sequence[self.position].correct_answer())
    }

    /// End the session now. Unanswered questions stay unanswered.
    pub fn finish(&mut self) -> Result<(), QuizError> {
        self.require_in_progress("finish")?;
        self.status = SessionStatus::Completed;
        tracing::debug!(
            "session finished with {}/{} answered",
            self.responses.len(),
            self.sequence.len()
        );
        Ok(())
    }

    /// Score the responses so far. Unanswered questions count as incorrect.
    pub fn score(&self) -> Result<ScoreReport, QuizError> {
        ScoreReport::compute(&self.sequence, &self.responses)
    }

    /// The question at the current position, once the session has started.
    pub fn current(&self) -> Option<QuestionView<'_>> {
        if self.status == SessionStatus::NotStarted {
            return None;
        }
        let question = self.sequence.get(self.position)?;
        let response = self.responses.get(&question.id());
        Some(QuestionView {
            index: self.position,
            total: self.sequence.len(),
            id: question.id(),
            text: question.text(),
            options: question.options(),
            answered: response.is_some(),
            response,
            multi_answer: question.is_multi_answer(),
            expected_selections: question.correct_answer().len(),
        })
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: self.position,
            total: self.sequence.len(),
            answered: self.responses.len(),
        }
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn sequence(&self) -> &[Arc<Question>] {
        &self.sequence
    }

    pub fn responses(&self) -> &HashMap<u32, AnswerSet> {
        &self.responses
    }

    fn require_in_progress(&self, operation: &'static str) -> Result<(), QuizError> {
        if self.status == SessionStatus::InProgress {
            Ok(())
        } else {
            Err(QuizError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }

    fn require_free(&self, operation: &'static str) -> Result<(), QuizError> {
        if self.mode != NavigationMode::Free {
            return Err(QuizError::ModeRestricted {
                operation,
                mode: self.mode,
            });
        }
        self.require_in_progress(operation)
    }
}

/// A sequence must be non-empty, and responses are keyed by id, so ids
/// must be unique.
fn check_sequence(sequence: &[Arc<Question>]) -> Result<(), QuizError> {
    if sequence.is_empty() {
        return Err(QuizError::EmptySelection);
    }
    let mut seen = HashSet::with_capacity(sequence.len());
    for q in sequence {
        if !seen.insert(q.id()) {
            return Err(QuizError::data_format(
                Some(q.id()),
                "id",
                "question appears twice in the session sequence",
            ));
        }
    }
    Ok(())
}
