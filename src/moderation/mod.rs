//! Moderation core.
//!
//! Transport-neutral decision logic: admin exemption, flood detection, the
//! content filter chain and the warning state machine, composed by
//! [`ModerationPipeline`]. Side effects come back as [`ModerationAction`]s.

mod action;
mod error;
pub mod filters;
mod flood;
mod message;
mod model;
mod pipeline;
mod ports;
mod verdict;
mod warnings;

#[cfg(test)]
pub mod memory;

pub use action::ModerationAction;
pub use error::{StoreError, TransportError};
pub use message::{ChatKind, EntityKind, ForwardOrigin, InboundMessage, MediaKind, Sender, ANONYMOUS_ADMIN_ID};
pub use model::{LogAction, LogEntry, MemberStatus, TenantConfig, TenantDefaults, MAX_MUTE_SECS};
pub use pipeline::{ModerationPipeline, Outcome};
pub use ports::{ActionExecutor, AdminLookup, ModerationStore};
