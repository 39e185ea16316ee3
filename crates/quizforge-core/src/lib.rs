//! quizforge-core: question banks, range selection, answer evaluation, and
//! the quiz session engine.
//!
//! Typical flow: load a [`QuestionBank`], optionally narrow it with a range
//! expression via [`selection`], start a [`Session`] over the resulting
//! sequence, submit answers, and read a [`ScoreReport`].

pub mod bank;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod model;
pub mod report;
pub mod selection;
pub mod session;

pub use bank::QuestionBank;
pub use error::{InvalidAnswer, QuizError};
pub use model::{AnswerSet, OptionKey, Question};
pub use report::ScoreReport;
pub use session::{NavigationMode, Session, SessionStatus};
