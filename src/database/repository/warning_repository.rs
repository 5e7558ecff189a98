//! Warning counter repository.
//!
//! Not cached: every mutation is a single atomic `findOneAndUpdate`, so
//! concurrent increments across processes are never lost.

use chrono::Utc;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::Collection;

use crate::database::models::WarningDoc;
use crate::database::mongo::{Database, WARNINGS};
use crate::moderation::StoreError;

pub struct WarningRepository {
    collection: Collection<WarningDoc>,
}

impl WarningRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(WARNINGS),
        }
    }

    pub async fn count(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError> {
        let filter = doc! { "chat_id": chat_id, "user_id": user_id as i64 };
        let record = self.collection.find_one(filter).await?;
        Ok(record.map(|r| r.clamped_count()).unwrap_or(0))
    }

    /// `$inc` with upsert; returns the new count.
    pub async fn increment(&self, chat_id: i64, user_id: u64, reason: &str) -> Result<u32, StoreError> {
        let filter = doc! { "chat_id": chat_id, "user_id": user_id as i64 };
        let update = doc! {
            "$inc": { "count": 1_i64 },
            "$set": { "last_reason": reason, "updated_at": Utc::now().to_rfc3339() },
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let record = self
            .collection
            .find_one_and_update(filter.clone(), update)
            .with_options(options)
            .await?
            .ok_or_else(|| StoreError::InvalidData("upsert returned no document".to_string()))?;

        if record.count >= 1 {
            return Ok(record.clamped_count());
        }

        // A negative stored count: repair it so this warning counts as the first.
        self.collection
            .update_one(filter, doc! { "$set": { "count": 1_i64 } })
            .await?;
        Ok(1)
    }

    /// Remove one warning, never going below zero. Returns the new count.
    pub async fn decrement(&self, chat_id: i64, user_id: u64) -> Result<u32, StoreError> {
        let filter = doc! { "chat_id": chat_id, "user_id": user_id as i64, "count": { "$gt": 0_i64 } };
        let update = doc! {
            "$inc": { "count": -1_i64 },
            "$set": { "updated_at": Utc::now().to_rfc3339() },
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let record = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?;

        Ok(record.map(|r| r.clamped_count()).unwrap_or(0))
    }

    pub async fn reset(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError> {
        let filter = doc! { "chat_id": chat_id, "user_id": user_id as i64 };
        let update = doc! { "$set": { "count": 0_i64, "updated_at": Utc::now().to_rfc3339() } };

        self.collection.update_one(filter, update).await?;
        Ok(())
    }
}
