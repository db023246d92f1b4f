//! Validation of bootstrap configuration identity fields and container
//! image references.
//!
//! The patterns here come from the platform's registration API contract;
//! they are fixed, compiled once, and process-wide.

mod error;
mod image;
mod names;

pub use error::ValidationError;
pub use image::ImageRef;
pub use names::{
    check_application_id, check_application_version, APPLICATION_ID_PATTERN,
    APPLICATION_VERSION_PATTERN,
};
