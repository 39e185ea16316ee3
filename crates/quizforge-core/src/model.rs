//! Core data model types for quizforge.
//!
//! A [`Question`] is validated once at construction and is immutable
//! afterwards; sessions and reports only ever read it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::QuizError;

/// A set of option keys. Ordering is by letter, so two sets compare equal
/// regardless of the order the keys were submitted in.
pub type AnswerSet = BTreeSet<OptionKey>;

/// Single-letter identifier of a choice within a question (`A`..`Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OptionKey(char);

impl OptionKey {
    /// Build a key from a letter, normalizing to uppercase.
    pub fn new(letter: char) -> Result<Self, ParseOptionKeyError> {
        if letter.is_ascii_alphabetic() {
            Ok(OptionKey(letter.to_ascii_uppercase()))
        } else {
            Err(ParseOptionKeyError(letter.to_string()))
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text that is not a single ASCII letter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option key must be a single letter A-Z, got `{0}`")]
pub struct ParseOptionKeyError(pub String);

impl FromStr for OptionKey {
    type Err = ParseOptionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                OptionKey::new(letter).map_err(|_| ParseOptionKeyError(trimmed.to_string()))
            }
            _ => Err(ParseOptionKeyError(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for OptionKey {
    type Error = ParseOptionKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OptionKey> for String {
    fn from(key: OptionKey) -> Self {
        key.0.to_string()
    }
}

/// Render a set of keys the way the bank writes them, e.g. `A,C`.
pub fn format_keys(keys: &AnswerSet) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: u32,
    text: String,
    options: BTreeMap<OptionKey, String>,
    correct_answer: AnswerSet,
}

impl Question {
    /// Build a question, enforcing the data model invariants: a positive id,
    /// at least one option, unique option keys, and a non-empty correct
    /// answer drawn from the option keys.
    pub fn new(
        id: u32,
        text: impl Into<String>,
        options: impl IntoIterator<Item = (OptionKey, String)>,
        correct_answer: impl IntoIterator<Item = OptionKey>,
    ) -> Result<Self, QuizError> {
        if id == 0 {
            return Err(QuizError::data_format(
                Some(id),
                "id",
                "question id must be a positive integer",
            ));
        }

        let mut option_map = BTreeMap::new();
        for (key, text) in options {
            if option_map.insert(key, text).is_some() {
                return Err(QuizError::data_format(
                    Some(id),
                    "options",
                    format!("duplicate option key {key}"),
                ));
            }
        }
        if option_map.is_empty() {
            return Err(QuizError::data_format(
                Some(id),
                "options",
                "question has no options",
            ));
        }

        let correct_answer: AnswerSet = correct_answer.into_iter().collect();
        if correct_answer.is_empty() {
            return Err(QuizError::data_format(
                Some(id),
                "answer",
                "correct answer is empty",
            ));
        }
        if let Some(missing) = correct_answer.iter().find(|k| !option_map.contains_key(k)) {
            return Err(QuizError::data_format(
                Some(id),
                "answer",
                format!("correct answer key {missing} is not one of the options"),
            ));
        }

        Ok(Self {
            id,
            text: text.into(),
            options: option_map,
            correct_answer,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Options in key order.
    pub fn options(&self) -> &BTreeMap<OptionKey, String> {
        &self.options
    }

    pub fn has_option(&self, key: OptionKey) -> bool {
        self.options.contains_key(&key)
    }

    pub fn correct_answer(&self) -> &AnswerSet {
        &self.correct_answer
    }

    /// True when more than one option is correct.
    pub fn is_multi_answer(&self) -> bool {
        self.correct_answer.len() > 1
    }
}
