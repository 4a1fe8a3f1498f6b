//! Load → normalize → reshape for every configured year, then persist.
//!
//! Every year is prepared before the store is opened, so a bad export aborts
//! the run without touching the existing database.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::info;

use crate::{
    config::SurveyConfig,
    io_utils, loader,
    normalize::{QuestionRecord, normalize_questions},
    reshape::{MissingPolicy, ResponseRecord, melt_responses},
    storage::{StoreCounts, SurveyStore},
};

/// Records derived from one survey edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearBatch {
    pub year: i32,
    pub respondents: usize,
    pub questions: Vec<QuestionRecord>,
    pub responses: Vec<ResponseRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

pub fn prepare_year(
    path: &Path,
    year: i32,
    options: ReadOptions,
    missing: &MissingPolicy,
) -> Result<YearBatch> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let survey = loader::load_survey(path, delimiter, options.encoding)?;
    let question_set = normalize_questions(&survey.columns, &survey.descriptions, year);
    let responses = melt_responses(&survey.rows, &question_set.column_indexes, year, missing)
        .with_context(|| format!("Reshaping responses from {path:?}"))?;
    info!(
        "{year}: {} column(s) -> {} question(s), {} respondent(s) -> {} response(s)",
        survey.column_count(),
        question_set.records.len(),
        survey.respondent_count(),
        responses.len()
    );
    Ok(YearBatch {
        year,
        respondents: survey.respondent_count(),
        questions: question_set.records,
        responses,
    })
}

/// Concatenates batches in the order given.
pub fn combine(batches: &[YearBatch]) -> (Vec<QuestionRecord>, Vec<ResponseRecord>) {
    let questions = batches
        .iter()
        .flat_map(|batch| batch.questions.iter().cloned())
        .collect();
    let responses = batches
        .iter()
        .flat_map(|batch| batch.responses.iter().cloned())
        .collect();
    (questions, responses)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub years: Vec<i32>,
    /// Respondent rows per year, in build order.
    pub respondents: Vec<(i32, usize)>,
    pub counts: StoreCounts,
}

pub fn prepare_all(config: &SurveyConfig) -> Result<Vec<YearBatch>> {
    let options = ReadOptions {
        delimiter: config.delimiter_byte(),
        encoding: io_utils::resolve_encoding(config.input_encoding.as_deref())?,
    };
    let missing = MissingPolicy::with_tokens(config.missing_tokens.iter().cloned());
    config
        .ordered_years()
        .into_iter()
        .map(|year| {
            let path = config.survey_path(year);
            prepare_year(&path, year, options, &missing)
                .with_context(|| format!("Preparing {year} survey from {path:?}"))
        })
        .collect()
}

/// Rebuilds the store at `config.database` from every configured year.
pub fn build_database(config: &SurveyConfig) -> Result<BuildSummary> {
    let batches = prepare_all(config)?;
    if let Some(parent) = config.database.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Creating database directory {parent:?}"))?;
    }
    let mut store = SurveyStore::open(&config.database)?;
    write_batches(&mut store, &batches)?;
    let counts = store.table_counts()?;
    info!(
        "Wrote {} question(s) and {} response(s) to {:?} ({} aggregated row(s))",
        counts.questions, counts.responses, config.database, counts.aggregated_rows
    );
    for batch in &batches {
        info!("{}: {} respondent(s) stored", batch.year, batch.respondents);
    }
    Ok(BuildSummary {
        years: batches.iter().map(|batch| batch.year).collect(),
        respondents: batches
            .iter()
            .map(|batch| (batch.year, batch.respondents))
            .collect(),
        counts,
    })
}

pub fn write_batches(store: &mut SurveyStore, batches: &[YearBatch]) -> Result<()> {
    let (questions, responses) = combine(batches);
    store
        .replace_all(&questions, &responses)
        .context("Replacing survey tables")
}
