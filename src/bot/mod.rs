//! Bot module - Telegram wiring around the moderation core.

pub mod dispatcher;
mod runtime;
pub mod transport;
mod webhook;

pub use dispatcher::{build_dispatcher, AppState, ThrottledBot};
pub use runtime::run;
pub use transport::TelegramTransport;
