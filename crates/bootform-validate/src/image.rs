//! Container image references.

use std::fmt;

use crate::error::ValidationError;

/// A parsed container image reference:
/// `[registry/][namespace/]name[:tag]`.
///
/// The tag defaults to `latest`. Only a colon in the final path segment is
/// a tag separator, so registries with ports (`registry.example.com:5000`)
/// parse correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub registry: Option<String>,
    pub namespace: Option<String>,
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    /// Parse an image reference from its string form.
    pub fn parse(source: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidImageRef {
            value: source.to_owned(),
            reason: reason.to_owned(),
        };

        let segments: Vec<&str> = source.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid("empty path segment"));
        }
        let (registry, namespace, last) = match segments.as_slice() {
            [name] => (None, None, *name),
            [namespace, name] => (None, Some(*namespace), *name),
            [registry, namespace, name] => (Some(*registry), Some(*namespace), *name),
            _ => return Err(invalid("too many path segments")),
        };

        let (name, tag) = match last.rsplit_once(':') {
            Some((name, tag)) => (name, tag),
            None => (last, "latest"),
        };
        if name.is_empty() {
            return Err(invalid("missing image name"));
        }
        if tag.is_empty() {
            return Err(invalid("empty tag"));
        }

        Ok(Self {
            registry: registry.map(str::to_owned),
            namespace: namespace.map(str::to_owned),
            name: name.to_owned(),
            tag: tag.to_owned(),
        })
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{registry}/")?;
        }
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}/")?;
        }
        write!(f, "{}:{}", self.name, self.tag)
    }
}
