use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::topics::QuestionSelector;

#[derive(Debug, Parser)]
#[command(author, version, about = "Build a SQLite warehouse from yearly Kaggle survey exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize every configured survey year and rebuild the database
    Build(BuildArgs),
    /// Show how the columns of one survey export normalize into questions
    Columns(ColumnsArgs),
    /// List the stored questions of one survey year
    Questions(QuestionsArgs),
    /// Query aggregated response counts for (question, year) selections
    Query(QueryArgs),
    /// Run the predefined topic queries across survey years
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory holding the yearly CSV exports
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,
    /// SQLite database to (re)create
    #[arg(short, long)]
    pub database: Option<PathBuf>,
    /// Survey year to include (repeatable; replaces the configured years)
    #[arg(short, long = "year", action = clap::ArgAction::Append)]
    pub years: Vec<i32>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Cell value treated as unanswered in addition to blanks and NA spellings (repeatable)
    #[arg(long = "missing-token", action = clap::ArgAction::Append)]
    pub missing_tokens: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Survey export to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Survey year stamped on the derived questions
    #[arg(short, long, default_value_t = 0)]
    pub year: i32,
    /// CSV delimiter character
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct QuestionsArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// SQLite database to read
    #[arg(short, long)]
    pub database: Option<PathBuf>,
    /// Survey year to list
    #[arg(short, long)]
    pub year: i32,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// SQLite database to read
    #[arg(short, long)]
    pub database: Option<PathBuf>,
    /// Selection of the form `Q5:2020,2021` (repeatable)
    #[arg(short, long = "select", required = true, action = clap::ArgAction::Append)]
    pub selectors: Vec<QuestionSelector>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
    /// Output file for csv/json formats (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// SQLite database to read
    #[arg(short, long)]
    pub database: Option<PathBuf>,
    /// Topic to run (repeatable; defaults to every configured topic)
    #[arg(short, long = "topic", action = clap::ArgAction::Append)]
    pub topics: Vec<String>,
    /// Write one `<topic>.csv` per topic here instead of printing tables
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Width of the text bars in printed panels
    #[arg(long = "bar-width", default_value_t = 40)]
    pub bar_width: usize,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
