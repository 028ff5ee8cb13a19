//! Registration errors.

use thiserror::Error;

pub type RouterResult<T> = Result<T, RouterError>;

/// Raised while registering resources. All of these fail fast at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The URL prefix is already bound to another viewset.
    #[error("resource prefix `{0}` is already registered")]
    DuplicateName(String),

    /// The basename (route name stem) is already used by another binding.
    #[error("basename `{0}` is already registered")]
    DuplicateBasename(String),

    /// The prefix cannot be turned into a URL pattern.
    #[error("invalid resource prefix `{0}`")]
    InvalidPrefix(String),

    /// The viewset's lookup field is not a usable placeholder name.
    #[error("invalid lookup field `{lookup}` for resource `{prefix}`")]
    InvalidLookup { prefix: String, lookup: String },
}
