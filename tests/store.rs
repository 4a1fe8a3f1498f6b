use survey_warehouse::{
    normalize::{QuestionRecord, QuestionType},
    reshape::ResponseRecord,
    storage::SurveyStore,
    topics::QuestionSelector,
};

fn question(index: &str, description: &str, year: i32) -> QuestionRecord {
    QuestionRecord {
        question_index: index.to_string(),
        question_type: QuestionType::MultiSelect,
        description: description.to_string(),
        surveyed_year: year,
    }
}

fn response(id: i64, index: &str, answer: &str, year: i32) -> ResponseRecord {
    ResponseRecord {
        respondent_id: id,
        question_index: index.to_string(),
        response: answer.to_string(),
        responded_in: year,
    }
}

#[test]
fn responses_without_a_question_are_left_out_of_the_view() {
    let mut store = SurveyStore::open_in_memory().unwrap();
    store
        .replace_all(
            &[question("Q7", "Languages?", 2020)],
            &[
                response(0, "Q7", "Python", 2020),
                response(0, "Q7", "Python", 2021),
                response(1, "Q8", "Yes", 2020),
            ],
        )
        .unwrap();
    let counts = store.table_counts().unwrap();
    assert_eq!(counts.responses, 3);
    assert_eq!(counts.aggregated_rows, 1);
}

#[test]
fn view_exposes_question_metadata() {
    let mut store = SurveyStore::open_in_memory().unwrap();
    store
        .replace_all(
            &[question("Q29A", "Which products?", 2020)],
            &[
                response(0, "Q29A", "MySQL", 2020),
                response(1, "Q29A", "MySQL", 2020),
            ],
        )
        .unwrap();
    let counts = store
        .response_counts(&[QuestionSelector::new("Q29A", &[2020])])
        .unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].question_type, "Multiple selection");
    assert_eq!(counts[0].question_description, "Which products?");
    assert_eq!(counts[0].response_count, 2);
}

#[test]
fn view_is_queryable_with_raw_sql() {
    let mut store = SurveyStore::open_in_memory().unwrap();
    store
        .replace_all(
            &[question("Q7", "Languages?", 2020)],
            &[response(0, "Q7", "R", 2020)],
        )
        .unwrap();
    let columns = store
        .connection()
        .prepare("SELECT * FROM aggregated_responses")
        .unwrap()
        .column_names()
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    assert_eq!(
        columns,
        vec![
            "surveyed_year",
            "question_index",
            "question_type",
            "question_description",
            "response",
            "response_count"
        ]
    );
}

#[test]
fn split_question_rows_do_not_inflate_counts() {
    let mut store = SurveyStore::open_in_memory().unwrap();
    store
        .replace_all(
            &[
                question("Q7", "Languages (other)?", 2020),
                question("Q7", "Languages?", 2020),
            ],
            &[
                response(0, "Q7", "Python", 2020),
                response(1, "Q7", "Python", 2020),
                response(1, "Q7", "R", 2020),
            ],
        )
        .unwrap();
    let counts = store
        .response_counts(&[QuestionSelector::new("Q7", &[2020])])
        .unwrap();
    let pairs = counts
        .iter()
        .map(|c| (c.response.as_str(), c.response_count))
        .collect::<Vec<_>>();
    assert_eq!(pairs, vec![("R", 1), ("Python", 2)]);
    assert_eq!(counts[0].question_description, "Languages (other)?");
    assert_eq!(store.table_counts().unwrap().aggregated_rows, 2);
}

#[test]
fn read_only_open_does_not_create_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typo.db");
    assert!(SurveyStore::open_read_only(&path).is_err());
    assert!(!path.exists());
}
