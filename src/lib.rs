pub mod cli;
pub mod config;
pub mod error;
pub mod inspect;
pub mod io_utils;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod reshape;
pub mod storage;
pub mod table;
pub mod topics;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    config::SurveyConfig,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("survey_warehouse", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => handle_build(&args),
        Commands::Columns(args) => inspect::execute_columns(&args),
        Commands::Questions(args) => inspect::execute_questions(&args),
        Commands::Query(args) => report::execute_query(&args),
        Commands::Report(args) => report::execute_report(&args),
    }
}

fn handle_build(args: &BuildArgs) -> Result<()> {
    let config = build_config(args)?;
    info!(
        "Building {:?} from {:?} for year(s) {:?}",
        config.database,
        config.data_dir,
        config.ordered_years()
    );
    let summary = pipeline::build_database(&config)
        .with_context(|| format!("Building survey database {:?}", config.database))?;
    let respondents: usize = summary.respondents.iter().map(|(_, n)| n).sum();
    info!(
        "✓ {} year(s): {} respondent(s), {} question(s), {} response(s), {} aggregated row(s)",
        summary.years.len(),
        respondents,
        summary.counts.questions,
        summary.counts.responses,
        summary.counts.aggregated_rows
    );
    Ok(())
}

/// Layers command-line overrides on top of the (optional) config file.
pub fn build_config(args: &BuildArgs) -> Result<SurveyConfig> {
    let mut config = SurveyConfig::load_or_default(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(database) = &args.database {
        config.database = database.clone();
    }
    if !args.years.is_empty() {
        config.years = args.years.clone();
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = Some(delimiter as char);
    }
    if let Some(encoding) = &args.input_encoding {
        config.input_encoding = Some(encoding.clone());
    }
    config
        .missing_tokens
        .extend(args.missing_tokens.iter().cloned());
    config.validate()?;
    debug!("Resolved configuration: {config:?}");
    Ok(config)
}
