//! Query parameters: raw shape as supplied, and the validated form.
//!
//! Validation runs before any console command is issued. Every name-like
//! criterion is reduced to the literal the filter searches for: wildcards
//! stripped, upper-cased, and checked against `^[A-Za-z0-9]{1,8}$`.

use crate::error::{QueryError, Result};
use regex::Regex;
use serde::Serialize;

pub const WILDCARD: &str = "*";
pub const ALL_REQUESTS: &str = "all";

const REQUEST_NUMBER_RE: &str = r"^[0-9]{2,}$";
const NAME_RE: &str = r"^[A-Za-z0-9]{1,8}$";

/// Parameters as received, echoed back to the caller unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawCriteria {
    pub request_number_list: Vec<String>,
    pub system: Option<String>,
    pub message_id: Option<String>,
    pub jobname: Option<String>,
}

/// Validated, normalized selection criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCriteria {
    pub request_number_list: Vec<String>,
    pub system: Option<String>,
    pub job_name: Option<String>,
    pub message_id: Option<String>,
}

impl Default for QueryCriteria {
    fn default() -> Self {
        Self {
            request_number_list: vec![ALL_REQUESTS.to_string()],
            system: None,
            job_name: None,
            message_id: None,
        }
    }
}

impl QueryCriteria {
    /// True when no number-based narrowing applies.
    pub fn selects_all(&self) -> bool {
        self.request_number_list
            .iter()
            .any(|n| n.eq_ignore_ascii_case(ALL_REQUESTS))
    }
}

impl RawCriteria {
    pub fn validate(&self) -> Result<QueryCriteria> {
        Ok(QueryCriteria {
            request_number_list: validate_request_numbers(&self.request_number_list)?,
            system: self.system.as_deref().map(validate_name).transpose()?,
            job_name: self.jobname.as_deref().map(validate_name).transpose()?,
            message_id: self.message_id.as_deref().map(validate_name).transpose()?,
        })
    }
}

/// Remove leading and trailing `*`. A lone `*` is returned as is.
pub fn strip_wildcard(value: &str) -> &str {
    if value == WILDCARD {
        value
    } else {
        value.trim_matches('*')
    }
}

/// Each entry is the literal `all` or two or more digits, taken as given.
///
/// Empty entries are dropped; an empty list selects everything.
pub fn validate_request_numbers(list: &[String]) -> Result<Vec<String>> {
    let re = Regex::new(REQUEST_NUMBER_RE)?;

    let mut out = Vec::with_capacity(list.len());
    for entry in list {
        if entry.is_empty() {
            continue;
        }
        if entry != ALL_REQUESTS && !re.is_match(entry) {
            return Err(QueryError::Validation(entry.clone()));
        }
        out.push(entry.clone());
    }

    if out.is_empty() {
        out.push(ALL_REQUESTS.to_string());
    }
    Ok(out)
}

/// Normalize a system name, job name or message id.
///
/// `*` on its own matches everything and is kept as is.
pub fn validate_name(value: &str) -> Result<String> {
    if value == WILDCARD {
        return Ok(value.to_string());
    }

    let re = Regex::new(NAME_RE)?;
    let stripped = strip_wildcard(value);
    if !re.is_match(stripped) {
        return Err(QueryError::Validation(value.to_string()));
    }
    Ok(stripped.to_ascii_uppercase())
}
