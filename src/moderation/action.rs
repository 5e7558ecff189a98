//! Side-effect intents returned by the pipeline.

use std::time::Duration;

use super::model::LogEntry;

/// One side effect the transport (or the store, for log entries) performs.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationAction {
    DeleteMessage { chat_id: i64, message_id: i32 },
    /// Ban immediately followed by unban: removes the user, who may rejoin.
    Kick { chat_id: i64, user_id: u64 },
    MuteFor { chat_id: i64, user_id: u64, duration: Duration },
    /// HTML-formatted notice. Notices are permanent records.
    SendMessage { chat_id: i64, text: String },
    AppendLog(LogEntry),
}

impl ModerationAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeleteMessage { .. } => "delete_message",
            Self::Kick { .. } => "kick",
            Self::MuteFor { .. } => "mute",
            Self::SendMessage { .. } => "send_message",
            Self::AppendLog(_) => "append_log",
        }
    }
}
