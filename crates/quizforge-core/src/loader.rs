//! Question bank loader.
//!
//! Loads banks from JSON or TOML files and directories, and lints them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::model::{OptionKey, Question};

/// On-disk encoding of a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFormat {
    Json,
    Toml,
}

impl BankFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFormat::Json => write!(f, "json"),
            BankFormat::Toml => write!(f, "toml"),
        }
    }
}

impl FromStr for BankFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(BankFormat::Json),
            "toml" => Ok(BankFormat::Toml),
            other => Err(format!("unknown bank format: {other}")),
        }
    }
}

/// Intermediate record for one question, before validation.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    #[serde(alias = "number")]
    id: i64,
    #[serde(alias = "question")]
    text: String,
    #[serde(default, deserialize_with = "option_entries")]
    options: Vec<(String, String)>,
    #[serde(alias = "correct_answer")]
    answer: AnswerField,
}

/// Read an options table as its entries in source order. Repeated keys are
/// kept so that validation can reject them instead of letting the last win.
fn option_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, String)>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Entries;

    impl<'de> serde::de::Visitor<'de> for Entries {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a table of option key to option text")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, String>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(Entries)
}

/// The correct answer as written in the source: `"A,C"` or `["A", "C"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerField {
    Text(String),
    Keys(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    questions: Vec<QuestionRecord>,
}

/// Load a bank file, choosing the format by extension.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let format = BankFormat::from_path(path).with_context(|| {
        format!(
            "unsupported bank file extension (expected .json or .toml): {}",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    let bank = parse_bank_str(&content, format)
        .with_context(|| format!("invalid bank: {}", path.display()))?;
    tracing::debug!("loaded {} question(s) from {}", bank.len(), path.display());
    Ok(bank)
}

/// Parse bank content in the given format into a validated bank.
pub fn parse_bank_str(content: &str, format: BankFormat) -> Result<QuestionBank, QuizError> {
    let records = match format {
        BankFormat::Json => serde_json::from_str::<Vec<QuestionRecord>>(content)
            .map_err(|e| QuizError::data_format(None, "document", e.to_string()))?,
        BankFormat::Toml => {
            toml::from_str::<TomlBankFile>(content)
                .map_err(|e| QuizError::data_format(None, "document", e.to_string()))?
                .questions
        }
    };

    let questions = records
        .into_iter()
        .map(into_question)
        .collect::<Result<Vec<_>, _>>()?;

    QuestionBank::from_questions(questions)
}

fn into_question(record: QuestionRecord) -> Result<Question, QuizError> {
    let id = u32::try_from(record.id)
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| {
            QuizError::data_format(
                None,
                "id",
                format!("question id must be a positive integer, got {}", record.id),
            )
        })?;

    let options = record
        .options
        .into_iter()
        .map(|(key, text)| {
            key.parse::<OptionKey>()
                .map(|k| (k, text))
                .map_err(|e| QuizError::data_format(Some(id), "options", e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let answer_tokens: Vec<String> = match record.answer {
        AnswerField::Text(text) => text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        AnswerField::Keys(keys) => keys,
    };
    let correct = answer_tokens
        .iter()
        .map(|t| {
            t.parse::<OptionKey>()
                .map_err(|e| QuizError::data_format(Some(id), "answer", e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Question::new(id, record.text, options, correct)
}

/// Recursively load every `.json` and `.toml` bank under a directory.
///
/// Files that fail to load are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<(PathBuf, QuestionBank)>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if BankFormat::from_path(&path).is_some() {
            match load_bank(&path) {
                Ok(bank) => banks.push((path, bank)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A non-fatal issue found in a loaded bank.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Lint a bank for issues that do not break the data model.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank contains no questions".into(),
        });
    }

    for q in bank.questions() {
        if q.text().trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id()),
                message: "question text is empty".into(),
            });
        }

        if q.options().len() < 2 {
            warnings.push(ValidationWarning {
                question_id: Some(q.id()),
                message: "question has a single option".into(),
            });
        }

        for (key, text) in q.options() {
            if text.trim().is_empty() {
                warnings.push(ValidationWarning {
                    question_id: Some(q.id()),
                    message: format!("option {key} has no text"),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"
[
  {
    "number": 1,
    "question": "Which module handles purchasing?",
    "options": { "A": "MM", "B": "SD", "C": "FI", "D": "HR" },
    "answer": "A"
  },
  {
    "number": 2,
    "question": "Select the two logistics modules.",
    "options": { "A": "MM", "B": "FI", "C": "SD", "D": "CO" },
    "answer": "A,C"
  }
]
"#;

    const VALID_TOML: &str = r#"
[[questions]]
id = 10
text = "Pick B"
answer = "B"

[questions.options]
A = "first"
B = "second"

[[questions]]
id = 11
text = "Pick A and B"
answer = ["A", "B"]

[questions.options]
A = "first"
B = "second"
C = "third"
"#;

    fn field_of(err: &QuizError) -> (Option<u32>, String) {
        match err {
            QuizError::DataFormat {
                question_id, field, ..
            } => (*question_id, field.clone()),
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn parse_valid_json() {
        let bank = parse_bank_str(VALID_JSON, BankFormat::Json).unwrap();
        assert_eq!(bank.len(), 2);
        let q2 = bank.by_id(2).unwrap();
        assert!(q2.is_multi_answer());
        assert_eq!(q2.options().len(), 4);
    }

    #[test]
    fn parse_valid_toml() {
        let bank = parse_bank_str(VALID_TOML, BankFormat::Toml).unwrap();
        let ids: Vec<u32> = bank.ids().collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(bank.by_id(11).unwrap().correct_answer().len(), 2);
    }

    #[test]
    fn answer_with_spaces_and_lowercase() {
        let json = r#"[{"number": 1, "question": "q", "options": {"a": "x", "b": "y", "c": "z"}, "answer": "a, c"}]"#;
        let bank = parse_bank_str(json, BankFormat::Json).unwrap();
        let q = bank.by_id(1).unwrap();
        let keys: Vec<String> = q.correct_answer().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["A", "C"]);
    }

    #[test]
    fn answer_outside_options_names_question() {
        let json = r#"[{"number": 4, "question": "q", "options": {"A": "x"}, "answer": "B"}]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (Some(4), "answer".into()));
    }

    #[test]
    fn missing_options_is_rejected() {
        let json = r#"[{"number": 5, "question": "q", "answer": "A"}]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (Some(5), "options".into()));
    }

    #[test]
    fn empty_answer_is_rejected() {
        let json = r#"[{"number": 6, "question": "q", "options": {"A": "x"}, "answer": " , "}]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (Some(6), "answer".into()));
    }

    #[test]
    fn repeated_option_key_is_rejected() {
        let json = r#"[{"number": 8, "question": "q", "options": {"A": "first", "B": "b", "A": "second"}, "answer": "A"}]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (Some(8), "options".into()));
        assert!(err.to_string().contains("duplicate option key A"));
    }

    #[test]
    fn case_variant_option_key_is_rejected() {
        let json = r#"[{"number": 9, "question": "q", "options": {"a": "x", "A": "y"}, "answer": "A"}]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (Some(9), "options".into()));
    }

    #[test]
    fn bad_option_key_is_rejected() {
        let json = r#"[{"number": 7, "question": "q", "options": {"AA": "x"}, "answer": "A"}]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (Some(7), "options".into()));
    }

    #[test]
    fn duplicate_and_invalid_ids_are_rejected() {
        let json = r#"[
            {"number": 1, "question": "q", "options": {"A": "x"}, "answer": "A"},
            {"number": 1, "question": "q", "options": {"A": "x"}, "answer": "A"}
        ]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (Some(1), "id".into()));

        let json = r#"[{"number": -3, "question": "q", "options": {"A": "x"}, "answer": "A"}]"#;
        let err = parse_bank_str(json, BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (None, "id".into()));
    }

    #[test]
    fn malformed_document() {
        let err = parse_bank_str("this is not [valid json", BankFormat::Json).unwrap_err();
        assert_eq!(field_of(&err), (None, "document".into()));

        let err = parse_bank_str("not [valid toml }{", BankFormat::Toml).unwrap_err();
        assert_eq!(field_of(&err), (None, "document".into()));
    }

    #[test]
    fn load_file_keeps_error_downcastable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"[{"number": 1, "question": "q", "options": {}, "answer": "A"}]"#)
            .unwrap();

        let err = load_bank(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::DataFormat { .. })
        ));
    }

    #[test]
    fn load_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.yaml");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_bank(&path).is_err());
    }

    #[test]
    fn load_directory_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), VALID_JSON).unwrap();
        std::fs::write(dir.path().join("b.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("c.json"), "{ broken").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 2);
        assert!(banks[0].0.ends_with("a.json"));
        assert_eq!(banks[1].1.len(), 2);
    }

    #[test]
    fn validate_reports_lints() {
        let json = r#"[
            {"number": 1, "question": "  ", "options": {"A": "x", "B": ""}, "answer": "A"},
            {"number": 2, "question": "only one", "options": {"A": "x"}, "answer": "A"}
        ]"#;
        let bank = parse_bank_str(json, BankFormat::Json).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings
            .iter()
            .any(|w| w.question_id == Some(1) && w.message.contains("text is empty")));
        assert!(warnings
            .iter()
            .any(|w| w.question_id == Some(1) && w.message.contains("option B")));
        assert!(warnings
            .iter()
            .any(|w| w.question_id == Some(2) && w.message.contains("single option")));

        let empty = parse_bank_str("[]", BankFormat::Json).unwrap();
        assert_eq!(validate_bank(&empty).len(), 1);
    }
}
