//! SQL for the survey warehouse.
//!
//! Both tables are dropped and recreated on every build; there is no
//! migration path and no foreign key between them.

pub const DROP_VIEW: &str = "DROP VIEW IF EXISTS aggregated_responses";
pub const DROP_QUESTIONS: &str = "DROP TABLE IF EXISTS questions";
pub const DROP_RESPONSES: &str = "DROP TABLE IF EXISTS responses";

pub const CREATE_QUESTIONS_TABLE: &str = r#"
CREATE TABLE questions (
    question_index TEXT,
    question_type TEXT,
    question_description TEXT,
    surveyed_year INTEGER
)
"#;

pub const CREATE_RESPONSES_TABLE: &str = r#"
CREATE TABLE responses (
    respondent_id INTEGER,
    question_index TEXT,
    response TEXT,
    responded_in INTEGER
)
"#;

/// Respondents per distinct answer, per question, per year. The join key is
/// the identifier together with the year because identifiers are renumbered
/// between survey editions. Questions are collapsed to one row per key first:
/// option columns of one question can carry different description heads, and
/// each response must be counted once.
pub const CREATE_AGGREGATED_VIEW: &str = r#"
CREATE VIEW aggregated_responses AS
SELECT questions.surveyed_year,
       questions.question_index,
       questions.question_type,
       questions.question_description,
       responses.response,
       COUNT(responses.respondent_id) AS response_count
  FROM responses
  JOIN (SELECT question_index,
               surveyed_year,
               MIN(question_type) AS question_type,
               MIN(question_description) AS question_description
          FROM questions
         GROUP BY question_index, surveyed_year) AS questions
    ON responses.question_index = questions.question_index AND
       responses.responded_in = questions.surveyed_year
 GROUP BY questions.surveyed_year,
          questions.question_index,
          responses.response
"#;

pub const INSERT_QUESTION: &str = r#"
INSERT INTO questions (question_index, question_type, question_description, surveyed_year)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const INSERT_RESPONSE: &str = r#"
INSERT INTO responses (respondent_id, question_index, response, responded_in)
VALUES (?1, ?2, ?3, ?4)
"#;

/// Statements that rebuild the schema, in execution order.
pub fn rebuild_statements() -> [&'static str; 5] {
    [
        DROP_VIEW,
        DROP_QUESTIONS,
        DROP_RESPONSES,
        CREATE_QUESTIONS_TABLE,
        CREATE_RESPONSES_TABLE,
    ]
}
