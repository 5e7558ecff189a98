//! Warning counter document.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Warning count for one user in one chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub chat_id: i64,
    pub user_id: i64,

    #[serde(default)]
    pub count: i64,

    #[serde(default)]
    pub last_reason: Option<String>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WarningDoc {
    /// Stored count with negative values clamped to zero.
    pub fn clamped_count(&self) -> u32 {
        u32::try_from(self.count.max(0)).unwrap_or(u32::MAX)
    }
}
