//! Pipeline configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command-line flags. Every field has a default, so an empty file (or no
//! file at all) describes the 2020–2022 build into `data/kaggle_survey.db`.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::topics::{TopicQuery, builtin_topics};

pub const DEFAULT_YEARS: [i32; 3] = [2020, 2021, 2022];
pub const DEFAULT_FILE_TEMPLATE: &str = "kaggle_survey_{year}_responses.csv";
const YEAR_PLACEHOLDER: &str = "{year}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub data_dir: PathBuf,
    /// File name inside `data_dir`; `{year}` is substituted per edition.
    pub file_template: String,
    pub database: PathBuf,
    pub years: Vec<i32>,
    pub delimiter: Option<char>,
    pub input_encoding: Option<String>,
    /// Cell values treated as unanswered on top of blanks and the NA spellings.
    pub missing_tokens: Vec<String>,
    pub topics: Vec<TopicQuery>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_template: DEFAULT_FILE_TEMPLATE.to_string(),
            database: PathBuf::from("data").join("kaggle_survey.db"),
            years: DEFAULT_YEARS.to_vec(),
            delimiter: None,
            input_encoding: None,
            missing_tokens: Vec::new(),
            topics: builtin_topics(),
        }
    }
}

impl SurveyConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: SurveyConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config file {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise starts from the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.file_template.contains(YEAR_PLACEHOLDER),
            "file_template '{}' must contain {YEAR_PLACEHOLDER}",
            self.file_template
        );
        if let Some(delimiter) = self.delimiter {
            ensure!(delimiter.is_ascii(), "delimiter must be ASCII");
        }
        Ok(())
    }

    pub fn survey_path(&self, year: i32) -> PathBuf {
        self.data_dir
            .join(self.file_template.replace(YEAR_PLACEHOLDER, &year.to_string()))
    }

    /// Years in processing order: ascending, without repeats.
    pub fn ordered_years(&self) -> Vec<i32> {
        let mut years = self.years.clone();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter.map(|c| c as u8)
    }
}
