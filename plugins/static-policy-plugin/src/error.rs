//! Error types for the static policy plugin.

use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum StaticPolicyError {
    /// Two permission entries share one identifier.
    #[error("duplicate permission id '{id}'")]
    DuplicatePermission { id: String },

    /// A rule names a permission that is not in the permission table.
    #[error("rule references unknown permission '{permission}'")]
    UnknownPermission { permission: String },
}
