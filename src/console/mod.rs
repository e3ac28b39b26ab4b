//! Parsing for the operator console displays of outstanding actions.

pub mod parse;
pub mod row;

pub use parse::{parse_jobname_replies, parse_replies};
pub use row::{JobNameRow, ReplyRow};

/// Lists outstanding actions with system name and job id (Form A).
pub const DISPLAY_REPLIES_BY_SYSTEM: &str = "D R,A,S";

/// Lists outstanding actions with job name and message id (Form B).
pub const DISPLAY_REPLIES_BY_JOBNAME: &str = "D R,A,JN";
