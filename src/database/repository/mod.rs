//! Repository module - one repository per collection.

mod action_log_repository;
mod filter_word_repository;
mod tenant_repository;
mod warning_repository;

pub use action_log_repository::ActionLogRepository;
pub use filter_word_repository::FilterWordRepository;
pub use tenant_repository::TenantRepository;
pub use warning_repository::WarningRepository;
