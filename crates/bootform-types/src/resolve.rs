//! The cross-stack resolver capability.
//!
//! Resolution is an external collaborator: the tree transformer only invokes
//! it and consumes its result or propagates its failure. Retries, timeouts,
//! and credentials all belong to the implementation behind this trait.

use crate::Scalar;
use thiserror::Error;

/// Failure to resolve a referenced stack output.
///
/// Either kind is fatal to the whole compile — the pipeline never substitutes
/// a silent default.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The stack or its named output does not exist.
    #[error("stack output not found: {stack}.{output}")]
    NotFound { stack: String, output: String },

    /// The resolver could not be reached.
    #[error("resolver transport failure: {0}")]
    Transport(String),
}

/// Resolves a `(stack, output, region)` triple to a scalar value.
pub trait Resolver {
    fn resolve(&self, stack: &str, output: &str, region: &str) -> Result<Scalar, ResolveError>;
}
