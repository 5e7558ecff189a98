//! Caching on top of Moka.
//!
//! `CacheRegistry` hands out named `TypedCache`s so repositories and the
//! admin status cache can share instances without passing them around.
//!
//! ```rust,ignore
//! let tenants = registry.get_or_create::<i64, TenantConfig>("tenants", CacheConfig::tenant_settings());
//! tenants.insert(chat_id, config);
//! ```

mod config;
mod registry;
mod typed;

pub use config::CacheConfig;
pub use registry::CacheRegistry;
pub use typed::TypedCache;
