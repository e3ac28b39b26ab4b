//! Outstanding-action query: validated criteria in, matching records out.
//!
//! Pipeline:
//! - issue `D R,A,S` and `D R,A,JN` through the console executor
//! - parse each display into partial rows
//! - join the rows on request number
//! - filter the joined set by the criteria

pub mod criteria;
pub mod filter;

pub use criteria::{QueryCriteria, RawCriteria};
pub use filter::filter_requests;

use crate::console::{self, DISPLAY_REPLIES_BY_JOBNAME, DISPLAY_REPLIES_BY_SYSTEM};
use crate::error::{QueryError, Result};
use crate::exec::{ConsoleExecutor, issue_command};
use crate::model::{MergedRecord, merge_records};

/// Issue both displays and join them, without filtering.
pub fn collect_merged(executor: &dyn ConsoleExecutor) -> Result<Vec<MergedRecord>> {
    // Both commands must succeed before either output is parsed.
    let by_system = issue_command(executor, DISPLAY_REPLIES_BY_SYSTEM)?;
    let by_jobname = issue_command(executor, DISPLAY_REPLIES_BY_JOBNAME)?;

    let replies = console::parse_replies(&by_system)?;
    let jobs = console::parse_jobname_replies(&by_jobname)?;
    let merged = merge_records(&replies, &jobs);

    tracing::debug!(
        replies = replies.len(),
        jobs = jobs.len(),
        merged = merged.len(),
        "joined outstanding actions"
    );
    Ok(merged)
}

/// Run a full query. An empty result is a [`QueryError::NoMatchingRequest`].
pub fn find_requests(
    executor: &dyn ConsoleExecutor,
    criteria: &QueryCriteria,
) -> Result<Vec<MergedRecord>> {
    let merged = collect_merged(executor)?;
    let requests = filter_requests(&merged, criteria)?;

    if requests.is_empty() {
        return Err(QueryError::NoMatchingRequest);
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandResponse, ReplayConsole};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io;

    const BY_SYSTEM: &str = "\
IEE112I 12.03.17 PENDING REQUESTS 432
 RM=0   IM=0     CEM=0     EM=0     RU=0    IR=0    AMRF
 ID:   R/K     T SYSNAME  JOB ID   MESSAGE TEXT
 001 R MV27 STC01537 *399 HWSC0000I *IMS CONNECT READY*
       IM5HCONN
 002 R MV27 STC01533 *400 DFS3139I IMS INITIALIZED, AUTOMATIC
       RESTART PROCEEDING IM5H
 003 R MV29 *401 DSI802A CNM01 REPLY WITH VALID NCCF
       SYSTEM OPERATOR COMMAND
 004 R MV29 STC01540 *402 ONLY IN THIS DISPLAY
";

    const BY_JOBNAME: &str = "\
IEE112I 12.03.17 PENDING REQUESTS 433
 ID:   R/K     T JOB NAME MESSAGE TEXT
 001 R IM5HCONN *399 HWSC0000I *IMS CONNECT READY*  IM5HCONN
 002 R IM5HCTRL *400 DFS3139I IMS INITIALIZED, AUTOMATIC RESTART
 003 R NETVIEW *401 DSI802A CNM01 REPLY WITH VALID NCCF
 005 R ORPHAN *403 XYZ001I ONLY IN THIS DISPLAY
";

    fn console() -> ReplayConsole {
        ReplayConsole::new()
            .with_response(DISPLAY_REPLIES_BY_SYSTEM, BY_SYSTEM)
            .with_response(DISPLAY_REPLIES_BY_JOBNAME, BY_JOBNAME)
    }

    fn numbers(records: &[MergedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.number.as_str()).collect()
    }

    #[test]
    fn default_query_returns_numbers_common_to_both_displays() {
        let out = find_requests(&console(), &QueryCriteria::default()).unwrap();
        assert_eq!(numbers(&out), vec!["001", "002", "003"]);
        assert_eq!(
            out[1].message_text,
            "*400 DFS3139I IMS INITIALIZED, AUTOMATIC RESTART PROCEEDING IM5H"
        );
        assert_eq!(out[1].jobname, "IM5HCTRL");
        assert_eq!(out[2].job_id, None);
        assert_eq!(out[2].message_id, "DSI802A");
    }

    #[test]
    fn raw_parameters_drive_the_filter() {
        let raw = RawCriteria {
            request_number_list: vec!["all".to_string()],
            system: Some("mv2*".to_string()),
            message_id: Some("dsi*".to_string()),
            jobname: None,
        };
        let out = find_requests(&console(), &raw.validate().unwrap()).unwrap();
        assert_eq!(numbers(&out), vec!["003"]);
    }

    #[test]
    fn empty_result_is_no_matching_request() {
        let criteria = QueryCriteria {
            job_name: Some("MQ".to_string()),
            ..QueryCriteria::default()
        };
        let err = find_requests(&console(), &criteria).unwrap_err();
        assert!(matches!(err, QueryError::NoMatchingRequest));
        assert_eq!(err.to_string(), crate::error::NO_MATCHING_REQUEST);
    }

    /// Records issued commands; fails the ones listed in `failing`.
    struct ScriptedConsole {
        issued: RefCell<Vec<String>>,
        failing: &'static str,
    }

    impl ConsoleExecutor for ScriptedConsole {
        fn execute(&self, command: &str) -> io::Result<CommandResponse> {
            self.issued.borrow_mut().push(command.to_string());
            if command == self.failing {
                return Ok(CommandResponse {
                    status_code: 4,
                    output_text: "IEE345I DISPLAY AUTHORITY INVALID".to_string(),
                });
            }
            Ok(CommandResponse {
                status_code: 0,
                output_text: String::new(),
            })
        }
    }

    #[test]
    fn first_command_failure_stops_the_query() {
        let console = ScriptedConsole {
            issued: RefCell::new(Vec::new()),
            failing: DISPLAY_REPLIES_BY_SYSTEM,
        };
        match find_requests(&console, &QueryCriteria::default()) {
            Err(QueryError::OperatorCommand(msg)) => {
                assert_eq!(msg, "IEE345I DISPLAY AUTHORITY INVALID")
            }
            other => panic!("expected operator command error, got {other:?}"),
        }
        assert_eq!(*console.issued.borrow(), vec![DISPLAY_REPLIES_BY_SYSTEM]);
    }

    #[test]
    fn second_command_failure_stops_the_query() {
        let console = ScriptedConsole {
            issued: RefCell::new(Vec::new()),
            failing: DISPLAY_REPLIES_BY_JOBNAME,
        };
        assert!(matches!(
            find_requests(&console, &QueryCriteria::default()),
            Err(QueryError::OperatorCommand(_))
        ));
        assert_eq!(console.issued.borrow().len(), 2);
    }
}
