//! Moderation log document.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::moderation::{LogAction, LogEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub chat_id: i64,
    pub user_id: i64,

    /// 0 for actions the bot took on its own.
    pub admin_id: i64,

    pub action: LogAction,
    pub reason: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<i64>,

    pub created_at: DateTime<Utc>,
}

impl From<&LogEntry> for ActionLogDoc {
    fn from(entry: &LogEntry) -> Self {
        Self {
            id: None,
            chat_id: entry.chat_id,
            user_id: entry.user_id as i64,
            admin_id: entry.admin_id as i64,
            action: entry.action,
            reason: entry.reason.clone(),
            duration_secs: entry.duration_secs.map(|s| s as i64),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_log_entry() {
        let entry = LogEntry::automatic(-1, 7, LogAction::AutoMute, "flood").with_duration(300);
        let doc = ActionLogDoc::from(&entry);

        assert_eq!(doc.admin_id, 0);
        assert_eq!(doc.duration_secs, Some(300));
        assert_eq!(doc.action, LogAction::AutoMute);
    }
}
