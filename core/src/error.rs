use crate::schema::ValidationError;
use thiserror::Error;

/// The two subprocess-backed steps of a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Migrations,
    Seed,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Migrations => f.write_str("migrations"),
            Step::Seed => f.write_str("seed data"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AlexError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{step} step failed with exit code {}", exit_code_text(.code))]
    StepFailed {
        step: Step,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Usage error: {0}")]
    Usage(String),
}

pub type AlexResult<T> = Result<T, AlexError>;

fn exit_code_text(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}
