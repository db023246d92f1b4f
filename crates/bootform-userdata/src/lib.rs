//! bootform userdata compiler: turns a bootstrap configuration tree into the
//! deployment platform's UserData payload.
//!
//! ```text
//! ConfigNode → transform (resolve lookups, inline deferred expressions)
//!            → render    (header + block YAML)
//!            → split     (recover deferred expressions from placeholders)
//! ```
//!
//! Each stage consumes an immutable input and produces a new value; any
//! stage failure aborts the whole pipeline with no partial output.

mod error;
mod render;
mod split;
mod transform;

pub use error::{UserDataError, UserDataResult};
pub use render::{render, USER_DATA_HEADER};
pub use split::split;
pub use transform::transform;

use bootform_types::{ConfigNode, Resolver};

/// Delimiters wrapping the canonical JSON of a deferred expression inside a
/// placeholder. The single space on each side is significant: the splitter
/// matches it exactly.
pub(crate) const PLACEHOLDER_OPEN: &str = "{{ ";
pub(crate) const PLACEHOLDER_CLOSE: &str = " }}";

/// One element of a join expression: literal text or a deferred expression.
#[derive(Debug, Clone, PartialEq)]
pub enum UserDataPart {
    Literal(String),
    Expression(ConfigNode),
}

/// The compiled userdata payload.
#[derive(Debug, Clone, PartialEq)]
pub enum UserData {
    /// No deferred expressions anywhere: a plain string payload.
    Literal(String),
    /// Alternating literal text and deferred expressions, with literal
    /// segments (possibly empty) on both ends.
    Join(Vec<UserDataPart>),
}

impl UserData {
    /// Convert into the node form the platform's template expects: a string
    /// scalar, or `{"Fn::Join": ["", [parts...]]}`.
    pub fn into_node(self) -> ConfigNode {
        match self {
            UserData::Literal(text) => ConfigNode::from(text),
            UserData::Join(parts) => {
                let items = parts
                    .into_iter()
                    .map(|part| match part {
                        UserDataPart::Literal(text) => ConfigNode::from(text),
                        UserDataPart::Expression(node) => node,
                    })
                    .collect();
                ConfigNode::Mapping(vec![(
                    "Fn::Join".to_owned(),
                    ConfigNode::Sequence(vec![ConfigNode::from(""), ConfigNode::Sequence(items)]),
                )])
            }
        }
    }
}

/// Compile a bootstrap configuration into its userdata payload.
///
/// The input tree must already be validated by the caller; the region is
/// forwarded to the resolver for each cross-stack lookup.
pub fn generate_user_data(
    config: &ConfigNode,
    region: &str,
    resolver: &dyn Resolver,
) -> UserDataResult<UserData> {
    let transformed = transform(config, region, resolver)?;
    let body = render(&transformed)?;
    split(&format!("{USER_DATA_HEADER}\n{body}"))
}
