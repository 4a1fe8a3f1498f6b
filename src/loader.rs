//! Raw survey export loading.
//!
//! A yearly export carries one header row of column codes, one row of
//! human-readable question text, and then respondent rows. The first column of
//! every row is a completion-time field that is not part of the survey and is
//! dropped here.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;

use crate::{error::SurveyError, io_utils};

/// One year's export split into column codes, question text, and answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSurvey {
    pub columns: Vec<String>,
    pub descriptions: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSurvey {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn respondent_count(&self) -> usize {
        self.rows.len()
    }
}

pub fn load_survey(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<RawSurvey> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, false)?;
    let mut records = reader.byte_records();

    let header = match records.next() {
        Some(record) => record.with_context(|| format!("Reading header row of {path:?}"))?,
        None => return Err(SurveyError::NoQuestionColumns { path: path.into() }.into()),
    };
    let mut columns = io_utils::decode_headers(&header, encoding)
        .with_context(|| format!("Decoding header row of {path:?}"))?;
    if columns.len() < 2 {
        return Err(SurveyError::NoQuestionColumns { path: path.into() }.into());
    }

    let description_row = match records.next() {
        Some(record) => record.with_context(|| format!("Reading description row of {path:?}"))?,
        None => return Err(SurveyError::MissingDescriptionRow { path: path.into() }.into()),
    };
    let mut descriptions = io_utils::decode_record(&description_row, encoding)
        .with_context(|| format!("Decoding description row of {path:?}"))?;

    drop(records);
    let mut rows = io_utils::read_all_records(&mut reader, encoding, 3)
        .with_context(|| format!("Reading responses from {path:?}"))?;

    columns.remove(0);
    descriptions.remove(0);
    for row in &mut rows {
        row.remove(0);
    }

    debug!(
        "Loaded {:?}: {} question column(s), {} respondent(s)",
        path,
        columns.len(),
        rows.len()
    );
    Ok(RawSurvey {
        columns,
        descriptions,
        rows,
    })
}
