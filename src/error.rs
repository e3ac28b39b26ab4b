//! Error kinds surfaced by an outstanding-action query.

use thiserror::Error;

/// Advisory returned when filtering leaves nothing to report.
pub const NO_MATCHING_REQUEST: &str =
    "There is no such request given the condition, check your command or update your options.";

#[derive(Debug, Error)]
pub enum QueryError {
    /// A parameter failed its grammar. Carries the offending value.
    #[error("An error occurred during validate the input parameters: \"{0}\"")]
    Validation(String),

    /// The console reported a nonzero status. Carries the console response.
    #[error("An error occurred during issue the operator command, the response is \"{0}\"")]
    OperatorCommand(String),

    #[error("{}", NO_MATCHING_REQUEST)]
    NoMatchingRequest,

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        QueryError::Unexpected(err.to_string())
    }
}

impl From<regex::Error> for QueryError {
    fn from(err: regex::Error) -> Self {
        QueryError::Unexpected(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
