//! MongoDB database wrapper.

use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::info;

/// Collection names.
pub const TENANTS: &str = "tenants";
pub const WARNINGS: &str = "warnings";
pub const FILTER_WORDS: &str = "filter_words";
pub const ACTION_LOGS: &str = "action_logs";

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Errors
    /// Returns error if the connection or the initial ping fails.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client.database("admin").run_command(doc! { "ping": 1 }).await?;

        info!("Successfully connected to MongoDB");

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Create the indexes the repositories rely on. Idempotent.
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        let indexes: [(&str, Document, Option<IndexOptions>); 4] = [
            (TENANTS, doc! { "chat_id": 1 }, Some(unique())),
            (WARNINGS, doc! { "chat_id": 1, "user_id": 1 }, Some(unique())),
            (FILTER_WORDS, doc! { "chat_id": 1, "word": 1 }, Some(unique())),
            (ACTION_LOGS, doc! { "chat_id": 1, "created_at": -1 }, None),
        ];

        for (name, keys, options) in indexes {
            let model = IndexModel::builder().keys(keys).options(options).build();
            self.collection::<Document>(name).create_index(model).await?;
        }

        info!("Database indexes ensured");
        Ok(())
    }
}
