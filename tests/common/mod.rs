#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const SURVEY_2020: &str = "\
Time from Start to Finish (seconds),Q1,Q5,Q7_Part_1,Q7_Part_2,Q7_OTHER,Q29_A_Part_1,Q29_B_Part_1
Duration (in seconds),What is your age (# years)?,\"Select the title most similar to your current role (or most recent title if retired): - Selected Choice\",What programming languages do you use on a regular basis? (Select all that apply) - Selected Choice - Python,What programming languages do you use on a regular basis? (Select all that apply) - Selected Choice - R,What programming languages do you use on a regular basis? (Select all that apply) - Selected Choice - Other,Which of the following big data products do you use on a regular basis? (Select all that apply) - Selected Choice - MySQL,Which of the following big data products do you hope to become more familiar with in the next 2 years? - Selected Choice - MySQL
510,22-24,Data Scientist,Python,R,,MySQL,
423,30-34,Data Analyst,Python,,,,MySQL
900,22-24,Data Scientist,,,Other,MySQL,MySQL
";

pub const SURVEY_2021: &str = "\
Time from Start to Finish (seconds),Q1,Q5,Q7_Part_1,Q7_Part_2
Duration (in seconds),What is your age (# years)?,\"Select the title most similar to your current role (or most recent title if retired): - Selected Choice\",What programming languages do you use on a regular basis? (Select all that apply) - Selected Choice - Python,What programming languages do you use on a regular basis? (Select all that apply) - Selected Choice - R
1,25-29,Data Engineer,Python,R
";

pub const SURVEY_2022: &str = "\
Duration (in seconds),Q2,Q5,Q23,Q12_1,Q12_2
Duration (in seconds),What is your gender? - Selected Choice,Are you currently a student? (high school; university; or graduate),Select the title most similar to your current role (or most recent title if retired),What programming languages do you use on a regular basis? (Select all that apply) - Selected Choice - Python,What programming languages do you use on a regular basis? (Select all that apply) - Selected Choice - R
60,Man,No,Data Scientist,Python,
75,Woman,Yes,,Python,R
";

/// Non-empty answer cells per fixture year.
pub const ANSWERED_CELLS: [(i32, usize); 3] = [(2020, 14), (2021, 4), (2022, 8)];
/// Distinct questions per fixture year.
pub const QUESTION_COUNTS: [(i32, usize); 3] = [(2020, 5), (2021, 3), (2022, 4)];

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Lays out the three fixture exports under `data/` with the default
    /// Kaggle file names and returns that directory.
    pub fn write_surveys(&self) -> PathBuf {
        for (year, contents) in [(2020, SURVEY_2020), (2021, SURVEY_2021), (2022, SURVEY_2022)] {
            self.write(&format!("data/kaggle_survey_{year}_responses.csv"), contents);
        }
        self.path().join("data")
    }

    pub fn database(&self) -> PathBuf {
        self.path().join("data").join("kaggle_survey.db")
    }
}
