/// Ownership metadata and permission checks.
///
/// Everything OS-dependent is isolated here so the walker and model stay
/// portable. Non-Unix targets get zeroed ownership fields.
pub mod metadata;
pub mod permissions;

pub use metadata::{ownership, Ownership};
pub use permissions::{is_permission_denied, is_readable};
