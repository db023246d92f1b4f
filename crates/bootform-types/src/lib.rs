//! Shared types for the bootform compiler.
//!
//! This crate defines the configuration tree ([`ConfigNode`]), its scalar
//! leaves, and the [`Resolver`] capability the tree transformer uses to
//! resolve cross-stack output lookups at compile time.

mod node;
mod resolve;

pub use node::{ConfigNode, Scalar};
pub use resolve::{ResolveError, Resolver};
