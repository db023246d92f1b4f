//! The container registry capability.
//!
//! Existence checks are an external collaborator: credential acquisition,
//! transport, and retry policy all live behind this trait.

use bootform_validate::ImageRef;
use thiserror::Error;

/// Failure to query the container registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry has no record of image {image}")]
    NotFound { image: String },

    #[error("registry unreachable: {0}")]
    Transport(String),
}

/// Answers whether an image reference exists in its registry.
pub trait ImageRegistry {
    fn image_exists(&self, image: &ImageRef) -> Result<bool, RegistryError>;
}
