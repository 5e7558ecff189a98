//! Stored document shapes.
//!
//! Tenant configs are stored as [`crate::moderation::TenantConfig`] directly.
//! User ids are stored as `i64` since BSON has no unsigned integers.

mod action_log;
mod filter_word;
mod warning;

pub use action_log::ActionLogDoc;
pub use filter_word::FilterWordDoc;
pub use warning::WarningDoc;
