//! Userdata compiler error types.

use bootform_types::ResolveError;
use thiserror::Error;

/// Errors that can occur while compiling a bootstrap configuration into
/// userdata. Any of these aborts the whole pipeline — no partial output.
#[derive(Debug, Error)]
pub enum UserDataError {
    /// A cross-stack lookup could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A deferred expression could not be encoded as JSON.
    #[error("failed to encode deferred expression: {0}")]
    Encode(#[source] serde_json::Error),

    /// The transformed tree could not be rendered as block text.
    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_yaml::Error),

    /// A placeholder-shaped quoted literal in rendered output failed to
    /// decode back into a deferred expression.
    ///
    /// Unreachable with a correct transformer/renderer pairing; reported as
    /// a defect, not a user input error.
    #[error("internal error: malformed placeholder in rendered output: {snippet}")]
    InvalidPlaceholder {
        snippet: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

/// Userdata compiler result type alias.
pub type UserDataResult<T> = Result<T, UserDataError>;
