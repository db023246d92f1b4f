//! The configuration tree consumed and produced by every compiler stage.
//!
//! Mappings are backed by a `Vec` of pairs — [`std::collections::BTreeMap`]
//! is NOT used here because insertion order is semantically visible in the
//! rendered output and must survive every stage unchanged.
//!
//! Deferred expressions and cross-stack lookups are recognized *shapes* of a
//! mapping, not separate variants: recognition is structural (key-set based),
//! so trees deserialize from plain YAML/JSON without any tagging.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Scalars
// ══════════════════════════════════════════════════════════════════════════════

/// A scalar leaf of the configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Borrow the string content, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Nodes
// ══════════════════════════════════════════════════════════════════════════════

/// A node of the configuration tree: mapping, sequence, or scalar.
///
/// Mapping keys are unique and kept in insertion order; sequences keep
/// element order. No stage mutates a tree in place — each stage produces a
/// new tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    /// Ordered key/value pairs.
    Mapping(Vec<(String, ConfigNode)>),
    /// Ordered elements.
    Sequence(Vec<ConfigNode>),
    /// A leaf value.
    Scalar(Scalar),
}

/// Returns `true` for keys that name a platform-evaluated expression.
pub(crate) fn is_deferred_key(key: &str) -> bool {
    key == "Ref" || key.starts_with("Fn::")
}

impl ConfigNode {
    /// An empty mapping.
    pub fn mapping() -> Self {
        ConfigNode::Mapping(Vec::new())
    }

    /// Borrow the string content, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(scalar) => scalar.as_str(),
            _ => None,
        }
    }

    /// Look up a mapping entry by key. Returns `None` for non-mapping nodes.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Mutable mapping lookup. Returns `None` for non-mapping nodes.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        match self {
            ConfigNode::Mapping(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Returns `true` if this is a mapping containing `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert into a mapping: replaces the value in place when the key
    /// already exists (keeping its position), appends otherwise.
    ///
    /// Has no effect on sequence or scalar nodes.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigNode) {
        if let ConfigNode::Mapping(entries) = self {
            let key = key.into();
            if let Some(index) = entries.iter().position(|(k, _)| *k == key) {
                entries[index].1 = value;
            } else {
                entries.push((key, value));
            }
        }
    }

    /// Recognize the deferred-expression shape: a mapping with exactly one
    /// entry whose key is `Ref` or starts with `Fn::`.
    ///
    /// The value is arbitrary and opaque — it may itself contain further
    /// deferred expressions or lookups, which belong to the platform's
    /// evaluator once the outer node is deferred.
    pub fn as_deferred_expression(&self) -> Option<(&str, &ConfigNode)> {
        match self {
            ConfigNode::Mapping(entries) if entries.len() == 1 => {
                let (key, value) = &entries[0];
                if is_deferred_key(key) {
                    Some((key, value))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Recognize the cross-stack lookup shape: a mapping with exactly the
    /// two entries `Stack` and `Output`, both string scalars.
    ///
    /// Returns `(stack, output)` on a match.
    pub fn as_resource_lookup(&self) -> Option<(&str, &str)> {
        match self {
            ConfigNode::Mapping(entries) if entries.len() == 2 => {
                let stack = self.get("Stack")?.as_str()?;
                let output = self.get("Output")?.as_str()?;
                Some((stack, output))
            }
            _ => None,
        }
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        ConfigNode::Scalar(Scalar::from(value))
    }
}

impl From<String> for ConfigNode {
    fn from(value: String) -> Self {
        ConfigNode::Scalar(Scalar::from(value))
    }
}

impl From<i64> for ConfigNode {
    fn from(value: i64) -> Self {
        ConfigNode::Scalar(Scalar::from(value))
    }
}

impl From<bool> for ConfigNode {
    fn from(value: bool) -> Self {
        ConfigNode::Scalar(Scalar::from(value))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Serde
// ══════════════════════════════════════════════════════════════════════════════

// Manual impls: derive would tag the enum, and mapping order must pass
// through both the YAML renderer and the canonical JSON wire form intact.

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for ConfigNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConfigNode::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            ConfigNode::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigNode::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = ConfigNode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a configuration node")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(ConfigNode::Scalar(Scalar::Bool(value)))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(ConfigNode::Scalar(Scalar::Int(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(|i| ConfigNode::Scalar(Scalar::Int(i)))
                    .map_err(|_| E::custom("integer out of range for a configuration scalar"))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(ConfigNode::Scalar(Scalar::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(ConfigNode::from(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(ConfigNode::from(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(ConfigNode::Scalar(Scalar::Null))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(ConfigNode::Scalar(Scalar::Null))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                ConfigNode::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(ConfigNode::Sequence(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                // Duplicate keys: last value wins, first position kept, so
                // the mapping invariant (unique keys) holds for any input.
                let mut entries: Vec<(String, ConfigNode)> = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, ConfigNode>()? {
                    match entries.iter().position(|(k, _)| *k == key) {
                        Some(index) => entries[index].1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(ConfigNode::Mapping(entries))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> ConfigNode {
        serde_yaml::from_str(text).expect("fixture parses")
    }

    #[test]
    fn mapping_order_survives_yaml_round_trip() {
        let node = yaml("zeta: 1\nalpha: 2\nmiddle: 3\n");
        let rendered = serde_yaml::to_string(&node).unwrap();
        assert_eq!(rendered, "zeta: 1\nalpha: 2\nmiddle: 3\n");
    }

    #[test]
    fn mapping_order_survives_json_round_trip() {
        let node = ConfigNode::Mapping(vec![
            ("b".to_owned(), ConfigNode::from(1)),
            ("a".to_owned(), ConfigNode::from(2)),
        ]);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"b":1,"a":2}"#);
        let back: ConfigNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn scalars_deserialize_to_expected_variants() {
        assert_eq!(yaml("42"), ConfigNode::Scalar(Scalar::Int(42)));
        assert_eq!(yaml("-7"), ConfigNode::Scalar(Scalar::Int(-7)));
        assert_eq!(yaml("1.5"), ConfigNode::Scalar(Scalar::Float(1.5)));
        assert_eq!(yaml("true"), ConfigNode::Scalar(Scalar::Bool(true)));
        assert_eq!(yaml("null"), ConfigNode::Scalar(Scalar::Null));
        assert_eq!(yaml("hello"), ConfigNode::from("hello"));
    }

    #[test]
    fn duplicate_keys_deduplicate_with_last_value_winning() {
        let node: ConfigNode = serde_json::from_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(
            node,
            ConfigNode::Mapping(vec![
                ("a".to_owned(), ConfigNode::from(3)),
                ("b".to_owned(), ConfigNode::from(2)),
            ])
        );
    }

    #[test]
    fn duplicate_yaml_keys_collapse_to_one_entry() {
        let node = yaml("a: 1\nb: 2\na: 3\n");
        assert_eq!(serde_yaml::to_string(&node).unwrap(), "a: 3\nb: 2\n");
    }

    #[test]
    fn recognizes_ref_as_deferred_expression() {
        let node = yaml("Ref: ExhibitorBucket\n");
        let (key, value) = node.as_deferred_expression().expect("shape match");
        assert_eq!(key, "Ref");
        assert_eq!(value, &ConfigNode::from("ExhibitorBucket"));
    }

    #[test]
    fn recognizes_fn_prefixed_key_as_deferred_expression() {
        let node = yaml("Fn::GetAtt:\n- Thing\n- Arn\n");
        assert!(node.as_deferred_expression().is_some());
    }

    #[test]
    fn two_entry_mapping_is_not_a_deferred_expression() {
        let node = yaml("Ref: Bucket\nother: 1\n");
        assert!(node.as_deferred_expression().is_none());
    }

    #[test]
    fn plain_key_is_not_a_deferred_expression() {
        let node = yaml("Reference: Bucket\n");
        assert!(node.as_deferred_expression().is_none());
    }

    #[test]
    fn recognizes_stack_output_pair_as_lookup() {
        let node = yaml("Stack: core\nOutput: VpcId\n");
        assert_eq!(node.as_resource_lookup(), Some(("core", "VpcId")));
    }

    #[test]
    fn lookup_shape_requires_exactly_two_entries() {
        let node = yaml("Stack: core\nOutput: VpcId\nRegion: eu-west-1\n");
        assert!(node.as_resource_lookup().is_none());
    }

    #[test]
    fn lookup_shape_requires_string_values() {
        let node = yaml("Stack: core\nOutput: 7\n");
        assert!(node.as_resource_lookup().is_none());
    }

    #[test]
    fn insert_replaces_in_place_keeping_position() {
        let mut node = yaml("a: 1\nb: 2\nc: 3\n");
        node.insert("b", ConfigNode::from("changed"));
        assert_eq!(
            serde_yaml::to_string(&node).unwrap(),
            "a: 1\nb: changed\nc: 3\n"
        );
    }

    #[test]
    fn insert_appends_new_keys() {
        let mut node = ConfigNode::mapping();
        node.insert("first", ConfigNode::from(1));
        node.insert("second", ConfigNode::from(2));
        assert_eq!(node.get("first"), Some(&ConfigNode::from(1)));
        assert_eq!(
            serde_yaml::to_string(&node).unwrap(),
            "first: 1\nsecond: 2\n"
        );
    }

    #[test]
    fn get_on_non_mapping_is_none() {
        assert!(ConfigNode::from("text").get("key").is_none());
        assert!(ConfigNode::Sequence(vec![]).get("key").is_none());
    }
}
