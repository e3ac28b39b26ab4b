use crate::console::row::{JobNameRow, ReplyRow};
use crate::error::Result;
use regex::{Captures, Regex};
use std::collections::HashSet;

// `D R,A,S` header with a job id:
// 1) number  2) type  3) system  4) job id  5) start of message text
const HEADER_WITH_JOB_ID_RE: &str =
    r"^([0-9]{2,}) ([A-Z]) ([A-Z0-9]{1,8})\s+([A-Z0-9]{1,8})\s+(.*)$";

// `D R,A,S` header without a job id:
// 1) number  2) type  3) system  4) start of message text, if any
const HEADER_WITHOUT_JOB_ID_RE: &str = r"^([0-9]{2,}) ([A-Z]) ([A-Za-z0-9]{1,8})(?:\s+(.*))?$";

// `D R,A,JN` header: number, type, job name, then the message.
const JOBNAME_HEADER_RE: &str = r"^[0-9]{2,} [A-Z] [A-Z0-9]{1,8}\s+";

/// Header grammar for the `D R,A,S` display.
///
/// The with-job-id form is more specific and is always tried first, so a
/// line like `001 R MV27 STC01537 *399 ...` never has its job id folded
/// into the message text.
pub struct ReplyGrammar {
    with_job_id: Regex,
    without_job_id: Regex,
}

impl ReplyGrammar {
    pub fn new() -> Result<Self> {
        Ok(Self {
            with_job_id: Regex::new(HEADER_WITH_JOB_ID_RE)?,
            without_job_id: Regex::new(HEADER_WITHOUT_JOB_ID_RE)?,
        })
    }

    /// Match a trimmed line against both header forms.
    pub fn header(&self, line: &str) -> Option<ReplyRow> {
        self.header_with_job_id(line)
            .or_else(|| self.header_without_job_id(line))
    }

    pub fn header_with_job_id(&self, line: &str) -> Option<ReplyRow> {
        let caps = self.with_job_id.captures(line)?;
        Some(ReplyRow {
            number: group(&caps, 1),
            reply_type: reply_type(&caps)?,
            system: group(&caps, 3),
            job_id: Some(group(&caps, 4)),
            message_text: group(&caps, 5).trim().to_string(),
        })
    }

    pub fn header_without_job_id(&self, line: &str) -> Option<ReplyRow> {
        let caps = self.without_job_id.captures(line)?;
        Some(ReplyRow {
            number: group(&caps, 1),
            reply_type: reply_type(&caps)?,
            system: group(&caps, 3),
            job_id: None,
            message_text: group(&caps, 4).trim().to_string(),
        })
    }
}

fn group(caps: &Captures<'_>, idx: usize) -> String {
    caps.get(idx)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn reply_type(caps: &Captures<'_>) -> Option<char> {
    caps.get(2)?.as_str().chars().next()
}

/// Parse `D R,A,S` output into one row per outstanding action.
///
/// Example:
/// ```text
/// IEE112I 12.03.17 PENDING REQUESTS 432
///  RM=0   IM=0     CEM=0     EM=0     RU=0    IR=0    AMRF
///  ID:   R/K     T SYSNAME  JOB ID   MESSAGE TEXT
///  001 R MV27 STC01537 *399 HWSC0000I *IMS CONNECT READY*
///        IM5HCONN
///  002 R MV28 *400 DFS3139I IMS INITIALIZED
/// ```
///
/// Lines that are not headers continue the message text of the open row.
/// The open row is flushed when the next header starts and again at end of
/// input, so a header on the final line is never lost.
pub fn parse_replies(text: &str) -> Result<Vec<ReplyRow>> {
    let grammar = ReplyGrammar::new()?;

    let mut out: Vec<ReplyRow> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut open: Option<ReplyRow> = None;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match grammar.header(line) {
            Some(row) => {
                if let Some(done) = open.replace(row) {
                    push_reply(&mut out, &mut seen, done, lineno + 1);
                }
            }
            None => {
                // Banner lines before the first header have nowhere to go.
                if let Some(row) = open.as_mut() {
                    if !row.message_text.is_empty() {
                        row.message_text.push(' ');
                    }
                    row.message_text.push_str(line);
                }
            }
        }
    }

    if let Some(done) = open.take() {
        let lines = text.lines().count();
        push_reply(&mut out, &mut seen, done, lines);
    }

    tracing::debug!(rows = out.len(), "parsed D R,A,S output");
    Ok(out)
}

fn push_reply(out: &mut Vec<ReplyRow>, seen: &mut HashSet<String>, row: ReplyRow, lno: usize) {
    if seen.insert(row.number.clone()) {
        out.push(row);
    } else {
        tracing::warn!(
            number = %row.number,
            line = lno,
            "duplicate request number in D R,A,S output, keeping the first"
        );
    }
}

/// Parse `D R,A,JN` output into one row per outstanding action.
///
/// Expected columns (whitespace-separated):
/// number  type  jobname  *number  message_id  text...
///
/// Example:
/// 215 R IM5GCONN *215 HWSC0000I *IMS CONNECT READY*  IM5GCONN
pub fn parse_jobname_replies(text: &str) -> Result<Vec<JobNameRow>> {
    let re = Regex::new(JOBNAME_HEADER_RE)?;

    let mut out: Vec<JobNameRow> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = line.trim();

        if !re.is_match(line) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().take(6).collect();
        if fields.len() < 5 {
            tracing::warn!(line = lno, text = line, "D R,A,JN line has no message id, skipping");
            continue;
        }

        let row = JobNameRow {
            number: fields[0].to_string(),
            jobname: fields[2].to_string(),
            message_id: fields[4].to_string(),
        };

        if !seen.insert(row.number.clone()) {
            tracing::warn!(
                number = %row.number,
                line = lno,
                "duplicate request number in D R,A,JN output, keeping the first"
            );
            continue;
        }
        out.push(row);
    }

    tracing::debug!(rows = out.len(), "parsed D R,A,JN output");
    Ok(out)
}
