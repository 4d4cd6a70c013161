//! Pure classification core for content repositories
//!
//! Directory roles, file kinds, and the flattened-name rule, kept free of
//! filesystem access so the dispatch logic is unit-testable on its own.

pub mod kind;
pub mod role;

pub use kind::{FileKind, PLAYBOOK_PREFIX, SCRIPT_PREFIX, classify, destination_name};
pub use role::Role;
