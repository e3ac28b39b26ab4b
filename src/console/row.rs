/// One outstanding action from the `D R,A,S` display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRow {
    pub number: String,
    pub reply_type: char,
    pub system: String,
    pub job_id: Option<String>,
    /// Header remainder plus every continuation line, space-joined.
    pub message_text: String,
}

/// One outstanding action from the `D R,A,JN` display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobNameRow {
    pub number: String,
    pub jobname: String,
    pub message_id: String,
}
