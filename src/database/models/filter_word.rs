//! Word filter entry.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterWordDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub chat_id: i64,

    /// Normalized (trimmed, lowercase) word.
    pub word: String,

    /// Admin who added the word.
    #[serde(default)]
    pub added_by: i64,

    pub created_at: DateTime<Utc>,
}
