use thiserror::Error;

/// Failures that end a compilation. Tokens that no parser understands are not
/// errors; they fall through to the definition's default parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The fallback was reached on a definition that never configured one.
    #[error("default_parse must be implemented by {definition}")]
    DefaultParseNotImplemented { definition: String },

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Raised while a definition is being configured, never while compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("parser must be registered with a callable or a block")]
    Missing,

    #[error("parser must be registered with a callable or a block, not both")]
    Ambiguous,
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
