//! Component error types.

use bootform_userdata::UserDataError;
use bootform_validate::ValidationError;
use thiserror::Error;

/// Errors raised while applying the bootstrap component to a definition.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("the bootstrap config only supports the \"Docker\" runtime, got {0:?}")]
    UnsupportedRuntime(String),

    #[error("the \"source\" property of the bootstrap config must be specified")]
    MissingSource,

    #[error("the {0:?} property must be a string")]
    ExpectedString(String),

    #[error("cannot descend into {0:?}: not a mapping")]
    ExpectedMapping(String),

    #[error("image {0} does not exist")]
    ImageNotFound(String),

    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    #[error(transparent)]
    UserData(#[from] UserDataError),
}
