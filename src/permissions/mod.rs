//! Admin checks for moderation and admin commands.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let admins = AdminStatusCache::new(lookup, &registry, config.global_admin_ids.clone(), ttl);
//!
//! if admins.is_exempt(chat_id, &sender).await {
//!     // skip moderation
//! }
//! ```

mod checker;

pub use checker::{AdminStatusCache, DEFAULT_ADMIN_TTL};
