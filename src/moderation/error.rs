use thiserror::Error;

/// Persistence collaborator failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

/// Chat transport failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Request(String),

    /// The ban step of a kick failed; nothing changed for the user.
    #[error("kick of user {user_id} in chat {chat_id} failed at ban: {reason}")]
    BanFailed {
        chat_id: i64,
        user_id: u64,
        reason: String,
    },

    /// The ban succeeded but the unban did not: the user stays excluded.
    #[error("user {user_id} stuck banned in chat {chat_id}, unban failed: {reason}")]
    StuckBan {
        chat_id: i64,
        user_id: u64,
        reason: String,
    },
}

impl TransportError {
    pub fn is_stuck_ban(&self) -> bool {
        matches!(self, Self::StuckBan { .. })
    }
}
