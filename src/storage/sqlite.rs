//! rusqlite-backed survey store

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, OpenFlags, params, params_from_iter, types::Value};
use serde::Serialize;

use super::schema;
use crate::{
    normalize::{QuestionRecord, QuestionType},
    reshape::ResponseRecord,
    topics::QuestionSelector,
};

/// One row of `aggregated_responses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseCount {
    pub surveyed_year: i32,
    pub question_index: String,
    pub question_type: String,
    pub question_description: String,
    pub response: String,
    pub response_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub questions: usize,
    pub responses: usize,
    pub aggregated_rows: usize,
}

pub struct SurveyStore {
    conn: Connection,
}

impl SurveyStore {
    /// Open a database file, creating it if needed
    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Opening survey database {path:?}"))?;
        Ok(Self { conn })
    }

    /// Open an existing database for reading; a missing file is an error
    /// rather than a fresh empty database.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Opening survey database {path:?} (run `build` first?)"))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replace both tables and the view with the given records in one
    /// transaction.
    pub fn replace_all(
        &mut self,
        questions: &[QuestionRecord],
        responses: &[ResponseRecord],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        for stmt in schema::rebuild_statements() {
            tx.execute(stmt, []).with_context(|| format!("Executing {stmt}"))?;
        }
        {
            let mut insert = tx.prepare(schema::INSERT_QUESTION)?;
            for question in questions {
                insert.execute(params![
                    question.question_index,
                    question.question_type.as_str(),
                    question.description,
                    question.surveyed_year,
                ])?;
            }
        }
        {
            let mut insert = tx.prepare(schema::INSERT_RESPONSE)?;
            for response in responses {
                insert.execute(params![
                    response.respondent_id,
                    response.question_index,
                    response.response,
                    response.responded_in,
                ])?;
            }
        }
        tx.execute(schema::CREATE_AGGREGATED_VIEW, [])
            .context("Creating aggregated_responses view")?;
        tx.commit().context("Committing survey tables")?;
        debug!(
            "Stored {} question(s) and {} response(s)",
            questions.len(),
            responses.len()
        );
        Ok(())
    }

    pub fn questions(&self) -> Result<Vec<QuestionRecord>> {
        self.query_questions(
            "SELECT question_index, question_type, question_description, surveyed_year
               FROM questions ORDER BY rowid",
            [],
        )
    }

    pub fn questions_for_year(&self, year: i32) -> Result<Vec<QuestionRecord>> {
        self.query_questions(
            "SELECT question_index, question_type, question_description, surveyed_year
               FROM questions WHERE surveyed_year = ?1 ORDER BY rowid",
            [year],
        )
    }

    fn query_questions<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<QuestionRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i32>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(question_index, kind, description, surveyed_year)| -> Result<_> {
                Ok(QuestionRecord {
                    question_index,
                    question_type: kind.parse::<QuestionType>()?,
                    description,
                    surveyed_year,
                })
            })
            .collect()
    }

    pub fn responses(&self) -> Result<Vec<ResponseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT respondent_id, question_index, response, responded_in
               FROM responses ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ResponseRecord {
                    respondent_id: row.get(0)?,
                    question_index: row.get(1)?,
                    response: row.get(2)?,
                    responded_in: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Counts for the selected (question, year) pairs, ordered by year and
    /// then ascending count.
    pub fn response_counts(&self, selectors: &[QuestionSelector]) -> Result<Vec<ResponseCount>> {
        let (filter, values) = selector_filter(selectors);
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT surveyed_year, question_index, question_type, question_description,
                    response, response_count
               FROM aggregated_responses
              WHERE {filter}
              ORDER BY surveyed_year, response_count, response"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(ResponseCount {
                    surveyed_year: row.get(0)?,
                    question_index: row.get(1)?,
                    question_type: row.get(2)?,
                    question_description: row.get(3)?,
                    response: row.get(4)?,
                    response_count: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn table_counts(&self) -> Result<StoreCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .with_context(|| format!("Counting rows in {table}"))?;
            Ok(n as usize)
        };
        Ok(StoreCounts {
            questions: count("questions")?,
            responses: count("responses")?,
            aggregated_rows: count("aggregated_responses")?,
        })
    }
}

/// Builds `(question_index = ? AND surveyed_year IN (?, ...)) OR ...` with its
/// positional parameters. Selectors without years are skipped.
fn selector_filter(selectors: &[QuestionSelector]) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();
    for selector in selectors.iter().filter(|s| !s.years.is_empty()) {
        values.push(Value::Text(selector.question_index.clone()));
        let question_slot = values.len();
        let mut year_slots = Vec::with_capacity(selector.years.len());
        for year in &selector.years {
            values.push(Value::Integer(i64::from(*year)));
            year_slots.push(format!("?{}", values.len()));
        }
        clauses.push(format!(
            "(question_index = ?{question_slot} AND surveyed_year IN ({}))",
            year_slots.join(", ")
        ));
    }
    (clauses.join(" OR "), values)
}
