//! `columns` and `questions`: look at how exports normalize and what was stored.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::{ColumnsArgs, QuestionsArgs},
    config::SurveyConfig,
    io_utils, loader,
    normalize::{classify_column, normalize_description},
    storage::SurveyStore,
    table::{self, Align},
};

pub fn execute_columns(args: &ColumnsArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let survey = loader::load_survey(&args.input, delimiter, encoding)
        .with_context(|| format!("Loading survey export {:?}", args.input))?;

    let rows = survey
        .columns
        .iter()
        .zip(&survey.descriptions)
        .enumerate()
        .map(|(idx, (column, description))| {
            let normalized = classify_column(column);
            vec![
                (idx + 1).to_string(),
                column.clone(),
                normalized.pattern.as_str().to_string(),
                normalized.question_index,
                normalized.question_type.to_string(),
                normalize_description(description).to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "column", "rule", "question", "type", "description"]
        .map(String::from)
        .to_vec();
    table::print_table(&headers, &rows, &[Align::Right]);
    info!(
        "Normalized {} column(s) from {:?} ({} respondent row(s))",
        survey.column_count(),
        args.input,
        survey.respondent_count()
    );
    Ok(())
}

pub fn execute_questions(args: &QuestionsArgs) -> Result<()> {
    let config = SurveyConfig::load_or_default(args.config.as_deref())?;
    let database = args.database.as_ref().unwrap_or(&config.database);
    let store = SurveyStore::open_read_only(database)?;
    let questions = store
        .questions_for_year(args.year)
        .with_context(|| format!("Reading {} questions from {database:?}", args.year))?;
    if questions.is_empty() {
        info!("No questions stored for {}", args.year);
        return Ok(());
    }
    let rows = questions
        .iter()
        .map(|q| {
            vec![
                q.question_index.clone(),
                q.question_type.to_string(),
                q.description.clone(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["question", "type", "description"].map(String::from).to_vec();
    table::print_table(&headers, &rows, &[]);
    info!("Listed {} question(s) for {}", questions.len(), args.year);
    Ok(())
}
