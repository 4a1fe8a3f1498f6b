//! Column-name normalization into canonical question identifiers.
//!
//! Yearly exports name their columns in three ways:
//!
//! - `Q3`: a single-answer question, one column.
//! - `Q26_A_Part_1`: a lettered sub-question of a multi-select block; the
//!   identifier folds the letter into the prefix (`Q26A`).
//! - `Q7_Part_3`, `Q23_OTHER`: one option column of a multi-select question;
//!   the identifier is the prefix alone (`Q7`, `Q23`).
//!
//! The rules are evaluated in the order of [`COLUMN_RULES`] and the first
//! match wins. Reordering them changes the output for names such as `Q9_B`.

use std::{fmt, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

pub const QUESTION_ID_SEPARATOR: char = '_';
pub const DESCRIPTION_SEPARATOR: &str = " - ";

/// Answer cardinality, derived from the column naming alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    SingleChoice,
    MultiSelect,
}

impl QuestionType {
    /// Label stored in the `question_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "Multiple choice",
            QuestionType::MultiSelect => "Multiple selection",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Multiple choice" => Ok(QuestionType::SingleChoice),
            "Multiple selection" => Ok(QuestionType::MultiSelect),
            other => Err(SurveyError::UnknownQuestionType(other.to_string())),
        }
    }
}

/// Naming convention a raw column matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPattern {
    Bare,
    LetteredSubQuestion,
    Suffixed,
}

/// Evaluation order of the column rules.
pub const COLUMN_RULES: &[ColumnPattern] = &[
    ColumnPattern::Bare,
    ColumnPattern::LetteredSubQuestion,
    ColumnPattern::Suffixed,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedColumn {
    pub question_index: String,
    pub question_type: QuestionType,
    pub pattern: ColumnPattern,
}

impl ColumnPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnPattern::Bare => "bare",
            ColumnPattern::LetteredSubQuestion => "lettered",
            ColumnPattern::Suffixed => "suffixed",
        }
    }

    /// Applies this rule to the `_`-separated parts of a column name.
    pub fn matches(&self, parts: &[&str]) -> Option<NormalizedColumn> {
        let (question_index, question_type) = match (self, parts) {
            (ColumnPattern::Bare, [only]) => ((*only).to_string(), QuestionType::SingleChoice),
            (ColumnPattern::LetteredSubQuestion, [prefix, second, ..]) => {
                let letter = single_uppercase(second)?;
                (format!("{prefix}{letter}"), QuestionType::MultiSelect)
            }
            (ColumnPattern::Suffixed, [prefix, _, ..]) => {
                ((*prefix).to_string(), QuestionType::MultiSelect)
            }
            _ => return None,
        };
        Some(NormalizedColumn {
            question_index,
            question_type,
            pattern: *self,
        })
    }
}

fn single_uppercase(segment: &str) -> Option<char> {
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_uppercase() => Some(ch),
        _ => None,
    }
}

pub fn classify_column(name: &str) -> NormalizedColumn {
    let parts = name.split(QUESTION_ID_SEPARATOR).collect::<Vec<_>>();
    COLUMN_RULES
        .iter()
        .find_map(|rule| rule.matches(&parts))
        // `split` always yields at least one part, so `Bare` or `Suffixed` applies.
        .unwrap_or_else(|| NormalizedColumn {
            question_index: name.to_string(),
            question_type: QuestionType::SingleChoice,
            pattern: ColumnPattern::Bare,
        })
}

/// Keeps the question text before the first `" - "`, dropping suffixes such
/// as `- Selected Choice`.
pub fn normalize_description(raw: &str) -> &str {
    raw.split(DESCRIPTION_SEPARATOR).next().unwrap_or(raw)
}

/// One deduplicated question for one survey year. Field order defines the
/// sort order of the stored `questions` table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_index: String,
    pub question_type: QuestionType,
    pub description: String,
    pub surveyed_year: i32,
}

/// Normalizer output for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    /// Identifier of every raw column, in column order.
    pub column_indexes: Vec<String>,
    pub records: Vec<QuestionRecord>,
}

pub fn normalize_questions(columns: &[String], descriptions: &[String], year: i32) -> QuestionSet {
    let mut column_indexes = Vec::with_capacity(columns.len());
    let mut records = Vec::with_capacity(columns.len());
    for (column, description) in columns.iter().zip(descriptions) {
        let normalized = classify_column(column);
        records.push(QuestionRecord {
            question_index: normalized.question_index.clone(),
            question_type: normalized.question_type,
            description: normalize_description(description).to_string(),
            surveyed_year: year,
        });
        column_indexes.push(normalized.question_index);
    }
    let records = records.into_iter().sorted().dedup().collect();
    QuestionSet {
        column_indexes,
        records,
    }
}
