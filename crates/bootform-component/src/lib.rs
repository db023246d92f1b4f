//! Instance-group bootstrap component.
//!
//! Takes a deployment definition (with its resource skeleton already built
//! by the caller), applies the bootstrap-config defaults and checks, compiles
//! the config into userdata, and wires the result into the definition tree.

mod component;
mod error;
mod registry;

pub use component::{apply_bootstrap_config, StackInfo};
pub use error::ComponentError;
pub use registry::{ImageRegistry, RegistryError};
