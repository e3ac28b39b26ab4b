//! Merged model: join the two console displays on request number.

use crate::console::{JobNameRow, ReplyRow};
use serde::Serialize;
use std::collections::HashMap;

/// An outstanding action seen in both `D R,A,S` and `D R,A,JN` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub number: String,
    #[serde(rename = "type")]
    pub reply_type: char,
    pub system: String,
    pub job_id: Option<String>,
    pub message_text: String,
    pub jobname: String,
    pub message_id: String,
}

impl MergedRecord {
    fn join(reply: &ReplyRow, job: &JobNameRow) -> Self {
        Self {
            number: job.number.clone(),
            reply_type: reply.reply_type,
            system: reply.system.clone(),
            job_id: reply.job_id.clone(),
            message_text: reply.message_text.clone(),
            jobname: job.jobname.clone(),
            message_id: job.message_id.clone(),
        }
    }
}

/// Inner join of the two displays, in `D R,A,S` order.
///
/// Numbers present in only one display are dropped. Each side is expected to
/// hold a number at most once; if not, every matching pair is emitted.
pub fn merge_records(replies: &[ReplyRow], jobs: &[JobNameRow]) -> Vec<MergedRecord> {
    let mut by_number: HashMap<&str, Vec<&JobNameRow>> = HashMap::new();
    for job in jobs {
        by_number.entry(job.number.as_str()).or_default().push(job);
    }

    let mut out = Vec::new();
    for reply in replies {
        let Some(matches) = by_number.get(reply.number.as_str()) else {
            tracing::debug!(number = %reply.number, "no D R,A,JN entry for request, dropping");
            continue;
        };
        out.extend(matches.iter().map(|job| MergedRecord::join(reply, job)));
    }
    out
}
