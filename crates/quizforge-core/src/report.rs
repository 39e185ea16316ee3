//! Score reports derived from a session's responses.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::evaluator::is_correct;
use crate::model::{format_keys, AnswerSet, Question};

/// Summary of a session, recomputed from its responses on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Number of questions in the sequence.
    pub total: usize,
    /// Questions whose response matches the correct answer exactly.
    pub correct_count: usize,
    /// Questions with any stored response.
    pub answered_count: usize,
    /// `correct_count / total` as a whole percentage, ties rounded up.
    pub percentage: u32,
    /// Per-question review, in sequence order.
    pub outcomes: Vec<QuestionOutcome>,
}

/// Review line for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub id: u32,
    pub text: String,
    /// The stored response, if the question was answered.
    pub submitted: Option<AnswerSet>,
    pub correct_answer: AnswerSet,
    pub correct: bool,
}

impl ScoreReport {
    /// Score a sequence against stored responses. Unanswered questions count
    /// as incorrect. An empty sequence has no defined score.
    pub fn compute(
        sequence: &[Arc<Question>],
        responses: &HashMap<u32, AnswerSet>,
    ) -> Result<Self, QuizError> {
        if sequence.is_empty() {
            return Err(QuizError::EmptySelection);
        }

        let outcomes: Vec<QuestionOutcome> = sequence
            .iter()
            .map(|q| {
                let submitted = responses.get(&q.id());
                QuestionOutcome {
                    id: q.id(),
                    text: q.text().to_string(),
                    submitted: submitted.cloned(),
                    correct_answer: q.correct_answer().clone(),
                    correct: is_correct(q, submitted),
                }
            })
            .collect();

        let total = outcomes.len();
        let correct_count = outcomes.iter().filter(|o| o.correct).count();
        let answered_count = outcomes.iter().filter(|o| o.submitted.is_some()).count();

        Ok(Self {
            total,
            correct_count,
            answered_count,
            percentage: round_percentage(correct_count, total),
            outcomes,
        })
    }

    /// Ids answered wrongly or not at all, in sequence order.
    pub fn incorrect_ids(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|o| !o.correct)
            .map(|o| o.id)
            .collect()
    }

    /// Ids never answered, in sequence order.
    pub fn unanswered_ids(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|o| o.submitted.is_none())
            .map(|o| o.id)
            .collect()
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {}/{} correct ({}%), {} answered\n\n",
            self.correct_count, self.total, self.percentage, self.answered_count
        ));

        md.push_str("| # | Question | Your answer | Correct answer | Result |\n");
        md.push_str("|---|----------|-------------|----------------|--------|\n");
        for o in &self.outcomes {
            let submitted = o
                .submitted
                .as_ref()
                .map(format_keys)
                .unwrap_or_else(|| "-".to_string());
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                o.id,
                o.text.replace('|', "\\|").replace('\n', " "),
                submitted,
                format_keys(&o.correct_answer),
                if o.correct { "correct" } else { "incorrect" }
            ));
        }

        md
    }
}

/// `round(100 * correct / total)` with ties rounded up, in integer math.
fn round_percentage(correct: usize, total: usize) -> u32 {
    let correct = correct as u64;
    let total = total as u64;
    ((200 * correct + total) / (2 * total)) as u32
}
