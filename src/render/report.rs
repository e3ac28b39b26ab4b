use crate::exec::tso::{TsoOutcome, TsoRequest};
use crate::model::MergedRecord;
use crate::query::RawCriteria;
use serde::Serialize;

pub const QUERY_SUCCEEDED: &str = "Successfully queried the operator for outstanding actions.";

#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamMessage {
    pub stdout: String,
    pub stderr: String,
}

/// Result of an outstanding-action query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport<'a> {
    pub changed: bool,
    pub original_message: &'a RawCriteria,
    pub message: StreamMessage,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<&'a [MergedRecord]>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl<'a> QueryReport<'a> {
    /// Parameters validated, nothing issued.
    pub fn checked(params: &'a RawCriteria) -> Self {
        Self {
            changed: false,
            original_message: params,
            message: StreamMessage::default(),
            requests_count: None,
            requests: None,
            failed: false,
            msg: None,
        }
    }

    pub fn success(params: &'a RawCriteria, requests: &'a [MergedRecord]) -> Self {
        Self {
            message: StreamMessage {
                stdout: QUERY_SUCCEEDED.to_string(),
                stderr: String::new(),
            },
            requests_count: Some(requests.len()),
            requests: Some(requests),
            ..Self::checked(params)
        }
    }

    pub fn failure(params: &'a RawCriteria, err: &dyn std::error::Error) -> Self {
        let msg = err.to_string();
        Self {
            message: StreamMessage {
                stdout: String::new(),
                stderr: msg.clone(),
            },
            failed: true,
            msg: Some(msg),
            ..Self::checked(params)
        }
    }
}

/// Failure of a subcommand that has no parameters to echo.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub failed: bool,
    pub msg: String,
}

impl FailureReport {
    pub fn new(err: &dyn std::error::Error) -> Self {
        Self {
            failed: true,
            msg: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TsoMessage {
    pub msg: String,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TsoResult {
    pub code: i32,
    pub content: Vec<String>,
}

/// Result of a TSO command.
#[derive(Debug, Clone, Serialize)]
pub struct TsoReport<'a> {
    pub changed: bool,
    pub original_message: &'a TsoRequest,
    pub message: TsoMessage,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TsoResult>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl<'a> TsoReport<'a> {
    pub fn from_outcome(request: &'a TsoRequest, outcome: &TsoOutcome) -> Self {
        let succeeded = outcome.succeeded();
        Self {
            changed: succeeded,
            original_message: request,
            message: TsoMessage {
                msg: outcome.message().to_string(),
                stdout: outcome.stdout.clone(),
                stderr: outcome.stderr.clone(),
            },
            result: Some(TsoResult {
                code: outcome.rc,
                content: outcome.content.clone(),
            }),
            failed: !succeeded,
            msg: (!succeeded).then(|| outcome.message().to_string()),
        }
    }

    pub fn failure(request: &'a TsoRequest, err: &dyn std::error::Error) -> Self {
        Self {
            changed: false,
            original_message: request,
            message: TsoMessage::default(),
            result: None,
            failed: true,
            msg: Some(err.to_string()),
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }
}
