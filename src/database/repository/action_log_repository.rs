//! Append-only moderation log.

use mongodb::Collection;

use crate::database::models::ActionLogDoc;
use crate::database::mongo::{Database, ACTION_LOGS};
use crate::moderation::{LogEntry, StoreError};

pub struct ActionLogRepository {
    collection: Collection<ActionLogDoc>,
}

impl ActionLogRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ACTION_LOGS),
        }
    }

    pub async fn append(&self, entry: &LogEntry) -> Result<(), StoreError> {
        self.collection.insert_one(ActionLogDoc::from(entry)).await?;
        Ok(())
    }
}
