use std::path::PathBuf;

/// Structural failures detected while turning survey exports into records.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("{path:?} has no question description row below the header")]
    MissingDescriptionRow { path: PathBuf },

    #[error("{path:?} has no question columns after the leading timestamp column")]
    NoQuestionColumns { path: PathBuf },

    #[error("expected {expected} question identifier(s) for {year}, got {actual}")]
    IdentifierCountMismatch {
        year: i32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid question selector '{0}' (expected QUESTION:YEAR[,YEAR...])")]
    InvalidSelector(String),

    #[error("unknown topic '{0}'")]
    UnknownTopic(String),

    #[error("unknown question type label '{0}'")]
    UnknownQuestionType(String),
}
