//! Year-spanning question selectors for downstream consumers.
//!
//! Question identifiers are renumbered between survey editions, so a
//! conceptual question ("what is your job title?") is addressed by one
//! selector per identifier, each listing the years in which that identifier
//! meant the question.

use std::{collections::BTreeMap, fmt, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{error::SurveyError, storage::ResponseCount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSelector {
    #[serde(rename = "question")]
    pub question_index: String,
    pub years: Vec<i32>,
}

impl QuestionSelector {
    pub fn new(question_index: &str, years: &[i32]) -> Self {
        Self {
            question_index: question_index.to_string(),
            years: years.to_vec(),
        }
    }
}

impl FromStr for QuestionSelector {
    type Err = SurveyError;

    /// Parses `Q5:2020,2021`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SurveyError::InvalidSelector(s.to_string());
        let (question, years) = s.split_once(':').ok_or_else(invalid)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(invalid());
        }
        let years = years
            .split(',')
            .map(|year| year.trim().parse::<i32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            question_index: question.to_string(),
            years,
        })
    }
}

impl fmt::Display for QuestionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.question_index, self.years.iter().join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicQuery {
    pub name: String,
    pub title: String,
    pub selectors: Vec<QuestionSelector>,
    /// Render every year against the same category list.
    #[serde(default)]
    pub shared_axis: bool,
}

impl TopicQuery {
    fn builtin(name: &str, title: &str, selectors: Vec<QuestionSelector>, shared_axis: bool) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            selectors,
            shared_axis,
        }
    }
}

/// Topics charted for the 2020–2022 editions.
pub fn builtin_topics() -> Vec<TopicQuery> {
    vec![
        TopicQuery::builtin(
            "job_titles",
            "Data science job titles",
            vec![
                QuestionSelector::new("Q5", &[2020, 2021]),
                QuestionSelector::new("Q23", &[2022]),
            ],
            false,
        ),
        TopicQuery::builtin(
            "job_tasks",
            "Data science job tasks",
            vec![
                QuestionSelector::new("Q23", &[2020]),
                QuestionSelector::new("Q24", &[2021]),
                QuestionSelector::new("Q28", &[2022]),
            ],
            true,
        ),
        TopicQuery::builtin(
            "programming_languages",
            "Programming languages used regularly",
            vec![
                QuestionSelector::new("Q7", &[2020, 2021]),
                QuestionSelector::new("Q12", &[2022]),
            ],
            false,
        ),
        TopicQuery::builtin(
            "databases",
            "Database products used regularly",
            vec![
                QuestionSelector::new("Q29A", &[2020]),
                QuestionSelector::new("Q32A", &[2021]),
                QuestionSelector::new("Q35", &[2022]),
            ],
            false,
        ),
        TopicQuery::builtin(
            "machine_learning",
            "Machine learning frameworks used regularly",
            vec![
                QuestionSelector::new("Q17", &[2020, 2021]),
                QuestionSelector::new("Q18", &[2022]),
            ],
            false,
        ),
    ]
}

pub fn find_topic<'a>(topics: &'a [TopicQuery], name: &str) -> Result<&'a TopicQuery, SurveyError> {
    topics
        .iter()
        .find(|topic| topic.name == name)
        .ok_or_else(|| SurveyError::UnknownTopic(name.to_string()))
}

/// Response counts of one year, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearPanel {
    pub year: i32,
    pub bars: Vec<(String, i64)>,
}

/// Splits query results into one panel per year.
///
/// Without a shared axis each year keeps only its own categories, in the
/// order the query returned them. With a shared axis every panel lists the
/// union of categories in first-seen order, with zero for absent answers.
pub fn year_panels(counts: &[ResponseCount], shared_axis: bool) -> Vec<YearPanel> {
    let mut by_year: BTreeMap<i32, Vec<(String, i64)>> = BTreeMap::new();
    for count in counts {
        by_year
            .entry(count.surveyed_year)
            .or_default()
            .push((count.response.clone(), count.response_count));
    }

    if !shared_axis {
        return by_year
            .into_iter()
            .map(|(year, bars)| YearPanel { year, bars })
            .collect();
    }

    let categories = counts
        .iter()
        .map(|count| count.response.as_str())
        .unique()
        .collect::<Vec<_>>();
    by_year
        .into_iter()
        .map(|(year, bars)| {
            let lookup = bars.into_iter().collect::<BTreeMap<_, _>>();
            let bars = categories
                .iter()
                .map(|category| {
                    let value = lookup.get(*category).copied().unwrap_or(0);
                    (category.to_string(), value)
                })
                .collect();
            YearPanel { year, bars }
        })
        .collect()
}
