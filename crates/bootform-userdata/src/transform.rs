//! Tree transformer: resolves cross-stack lookups and rewrites deferred
//! expressions into placeholder scalars.
//!
//! Shape priority at each mapping: lookup first, then deferred expression,
//! then plain data. The walker never enters the value of a matched deferred
//! expression — anything nested inside it (including further lookups) is the
//! platform evaluator's responsibility at deploy time and passes through
//! embedded in the placeholder JSON, unresolved.

use bootform_types::{ConfigNode, Resolver, Scalar};

use crate::error::{UserDataError, UserDataResult};
use crate::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

/// Rewrite `node` for rendering: every lookup shape is replaced by its
/// resolved scalar, every deferred-expression shape by a `{{ <json> }}`
/// placeholder string. Everything else is rebuilt structurally intact.
///
/// The only side effects are the resolver calls implied by lookup shapes,
/// made one at a time in tree-walk order. Resolver failure aborts the walk.
pub fn transform(
    node: &ConfigNode,
    region: &str,
    resolver: &dyn Resolver,
) -> UserDataResult<ConfigNode> {
    match node {
        ConfigNode::Mapping(entries) => {
            if let Some((stack, output)) = node.as_resource_lookup() {
                tracing::debug!(stack, output, region, "resolving referenced stack output");
                let value = resolver.resolve(stack, output, region)?;
                return Ok(ConfigNode::Scalar(value));
            }
            if node.as_deferred_expression().is_some() {
                let json = serde_json::to_string(node).map_err(UserDataError::Encode)?;
                return Ok(ConfigNode::Scalar(Scalar::String(format!(
                    "{PLACEHOLDER_OPEN}{json}{PLACEHOLDER_CLOSE}"
                ))));
            }
            let mut rebuilt = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                rebuilt.push((key.clone(), transform(value, region, resolver)?));
            }
            Ok(ConfigNode::Mapping(rebuilt))
        }
        ConfigNode::Sequence(items) => {
            let mut rebuilt = Vec::with_capacity(items.len());
            for item in items {
                rebuilt.push(transform(item, region, resolver)?);
            }
            Ok(ConfigNode::Sequence(rebuilt))
        }
        ConfigNode::Scalar(_) => Ok(node.clone()),
    }
}
