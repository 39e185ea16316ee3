//! The immutable question catalog.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::QuizError;
use crate::model::Question;

/// An ordered, read-only catalog of questions.
///
/// Questions are reference counted so that shuffled banks and session
/// sequences share them instead of copying. A bank can be reused by any
/// number of sessions without synchronization.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Arc<Question>>,
    index: HashMap<u32, usize>,
}

impl QuestionBank {
    /// Build a bank from questions in load order. Fails on a duplicate id.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, QuizError> {
        Self::from_shared(questions.into_iter().map(Arc::new).collect())
    }

    /// Build a bank over already shared questions, e.g. a resolved selection
    /// that should be shuffled on its own.
    pub fn from_shared(questions: Vec<Arc<Question>>) -> Result<Self, QuizError> {
        let mut index = HashMap::with_capacity(questions.len());
        for (pos, q) in questions.iter().enumerate() {
            if index.insert(q.id(), pos).is_some() {
                return Err(QuizError::data_format(
                    Some(q.id()),
                    "id",
                    "duplicate question id",
                ));
            }
        }
        Ok(Self { questions, index })
    }

    /// Look up a question by id.
    pub fn by_id(&self, id: u32) -> Result<&Arc<Question>, QuizError> {
        self.index
            .get(&id)
            .map(|&pos| &self.questions[pos])
            .ok_or(QuizError::NotFound(id))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    /// Questions in bank order.
    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    /// The whole bank as a session sequence.
    pub fn sequence(&self) -> Vec<Arc<Question>> {
        self.questions.clone()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.questions.iter().map(|q| q.id())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Return a new bank with a uniformly random order. The original bank is
    /// untouched. A seed makes the permutation reproducible.
    pub fn shuffle(&self, seed: Option<u64>) -> QuestionBank {
        let mut questions = self.questions.clone();
        match seed {
            Some(seed) => questions.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => questions.shuffle(&mut rand::thread_rng()),
        }
        let index = questions
            .iter()
            .enumerate()
            .map(|(pos, q)| (q.id(), pos))
            .collect();
        QuestionBank { questions, index }
    }

    /// Questions for the given ids, in the order the ids are listed.
    pub fn select(&self, ids: &[u32]) -> Result<Vec<Arc<Question>>, QuizError> {
        ids.iter()
            .map(|&id| self.by_id(id).map(Arc::clone))
            .collect()
    }
}
