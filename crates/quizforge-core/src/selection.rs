//! Free-text question selection.
//!
//! Expressions are comma-separated terms, each either a single id (`7`) or an
//! inclusive range (`5~10` or `5-10`). Parsing is forgiving: a term that is
//! not a number or a well-formed range is skipped and recorded, never fatal.
//! Callers that need strict input should check [`ParsedSelection::is_empty`]
//! and [`ParsedSelection::skipped`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::model::Question;

/// Widest range a single term may expand to. Wider terms are skipped.
pub const MAX_RANGE_SPAN: u32 = 100_000;

/// The ids requested by a selection expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSelection {
    ids: Vec<u32>,
    skipped: Vec<String>,
}

impl ParsedSelection {
    /// Requested ids, ascending and unique.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Terms that did not parse, trimmed, in input order.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Parse a selection expression. Never fails.
pub fn parse_selection(text: &str) -> ParsedSelection {
    let mut ids = BTreeSet::new();
    let mut skipped = Vec::new();

    for term in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_term(term) {
            Some((start, end)) => ids.extend(start..=end),
            None => skipped.push(term.to_string()),
        }
    }

    ParsedSelection {
        ids: ids.into_iter().collect(),
        skipped,
    }
}

fn parse_term(term: &str) -> Option<(u32, u32)> {
    match term.split_once(|c: char| c == '~' || c == '-') {
        Some((start, end)) => {
            let start = start.trim().parse::<u32>().ok()?;
            let end = end.trim().parse::<u32>().ok()?;
            (start <= end && end - start < MAX_RANGE_SPAN).then_some((start, end))
        }
        None => term.parse::<u32>().ok().map(|id| (id, id)),
    }
}

/// A parsed selection split against a bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    /// Requested ids present in the bank, ascending.
    pub present: Vec<u32>,
    /// Requested ids missing from the bank, ascending.
    pub absent: Vec<u32>,
}

impl ResolvedSelection {
    /// Session sequence for the present ids, in ascending id order.
    pub fn sequence(&self, bank: &QuestionBank) -> Result<Vec<Arc<Question>>, QuizError> {
        bank.select(&self.present)
    }
}

/// Partition requested ids into those the bank has and those it lacks.
pub fn resolve(parsed: &ParsedSelection, bank: &QuestionBank) -> ResolvedSelection {
    let (present, absent): (Vec<u32>, Vec<u32>) =
        parsed.ids().iter().copied().partition(|&id| bank.contains(id));

    if !absent.is_empty() {
        tracing::debug!(
            "{} requested question(s) not in bank: {}",
            absent.len(),
            format_ranges(&absent)
        );
    }

    ResolvedSelection { present, absent }
}

/// A maximal run of consecutive ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeToken {
    Single(u32),
    Span(u32, u32),
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeToken::Single(id) => write!(f, "{id}"),
            RangeToken::Span(start, end) => write!(f, "{start}~{end}"),
        }
    }
}

/// Collapse sorted, unique ids into the fewest runs of consecutive ids.
pub fn collapse_to_ranges(ids: &[u32]) -> Vec<RangeToken> {
    let mut tokens = Vec::new();
    let mut iter = ids.iter().copied();

    let Some(mut start) = iter.next() else {
        return tokens;
    };
    let mut end = start;

    for id in iter {
        if end.checked_add(1) == Some(id) {
            end = id;
        } else {
            tokens.push(run(start, end));
            start = id;
            end = id;
        }
    }
    tokens.push(run(start, end));
    tokens
}

fn run(start: u32, end: u32) -> RangeToken {
    if start == end {
        RangeToken::Single(start)
    } else {
        RangeToken::Span(start, end)
    }
}

/// Human-readable form of an id list, e.g. `1,5~10,15`.
pub fn format_ranges(ids: &[u32]) -> String {
    collapse_to_ranges(ids)
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
