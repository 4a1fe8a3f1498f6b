//! SQLite persistence for questions, responses and the aggregated view.
//!
//! - questions(question_index, question_type, question_description, surveyed_year)
//! - responses(respondent_id, question_index, response, responded_in)
//! - aggregated_responses(surveyed_year, question_index, question_type,
//!   question_description, response, response_count)

pub mod schema;
pub mod sqlite;

pub use sqlite::{ResponseCount, StoreCounts, SurveyStore};
