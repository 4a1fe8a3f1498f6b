//! Wide-to-long reshaping of respondent answers.

use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

/// One answered question for one respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Row ordinal within its year; not comparable across years.
    pub respondent_id: i64,
    pub question_index: String,
    pub response: String,
    pub responded_in: i32,
}

/// Cell values read as "no answer" by default: blanks plus the usual NA
/// spellings. Matching is exact, so `" "` is an answer.
pub const DEFAULT_MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Decides which cells count as unanswered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPolicy {
    tokens: Vec<String>,
}

impl Default for MissingPolicy {
    fn default() -> Self {
        Self {
            tokens: DEFAULT_MISSING_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl MissingPolicy {
    /// Default tokens plus `extra`.
    pub fn with_tokens<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = Self::default();
        for token in extra.into_iter().map(Into::into) {
            if !policy.tokens.contains(&token) {
                policy.tokens.push(token);
            }
        }
        policy
    }

    pub fn is_missing(&self, value: &str) -> bool {
        self.tokens.iter().any(|token| token == value)
    }
}

/// Pivots `rows` (one per respondent) into long records, column by column.
///
/// `column_indexes` renames each column positionally; repeated identifiers
/// stay separate so every option column of a multi-select question yields its
/// own record.
pub fn melt_responses(
    rows: &[Vec<String>],
    column_indexes: &[String],
    year: i32,
    missing: &MissingPolicy,
) -> Result<Vec<ResponseRecord>, SurveyError> {
    if let Some(row) = rows.iter().find(|row| row.len() != column_indexes.len()) {
        return Err(SurveyError::IdentifierCountMismatch {
            year,
            expected: row.len(),
            actual: column_indexes.len(),
        });
    }

    let mut records = Vec::new();
    for (column, question_index) in column_indexes.iter().enumerate() {
        for (respondent_id, row) in rows.iter().enumerate() {
            let value = &row[column];
            if missing.is_missing(value) {
                continue;
            }
            records.push(ResponseRecord {
                respondent_id: respondent_id as i64,
                question_index: question_index.clone(),
                response: value.clone(),
                responded_in: year,
            });
        }
    }
    Ok(records)
}

pub fn count_answered_cells(rows: &[Vec<String>], missing: &MissingPolicy) -> usize {
    rows.iter()
        .flatten()
        .filter(|cell| !missing.is_missing(cell))
        .count()
}
