//! Applies the bootstrap config to an instance-group resource.

use bootform_types::{ConfigNode, Resolver};
use bootform_userdata::generate_user_data;
use bootform_validate::{check_application_id, check_application_version, ImageRef};

use crate::error::ComponentError;
use crate::registry::ImageRegistry;

/// Identity of the stack being deployed, used to default the bootstrap
/// config's notification and application fields.
#[derive(Debug, Clone)]
pub struct StackInfo {
    pub stack_name: String,
    pub stack_version: String,
}

/// Apply the bootstrap config for `resource_name` to `definition`.
///
/// Fills in the config's defaults (`notify_cfn`, `application_id`,
/// `application_version`), validates its identity fields, checks the image
/// reference (against the registry collaborator unless `force` is set or the
/// reference names no registry), compiles the config into userdata, and
/// wires the result into
/// `Resources.<resource_name>Config.Properties.UserData."Fn::Base64"`.
///
/// Returns a new definition; the input is not mutated on failure.
#[allow(clippy::too_many_arguments)]
pub fn apply_bootstrap_config(
    definition: ConfigNode,
    resource_name: &str,
    bootstrap: &ConfigNode,
    info: &StackInfo,
    region: &str,
    resolver: &dyn Resolver,
    registry: &dyn ImageRegistry,
    force: bool,
) -> Result<ConfigNode, ComponentError> {
    if !matches!(bootstrap, ConfigNode::Mapping(_)) {
        return Err(ComponentError::ExpectedMapping("bootstrap config".to_owned()));
    }
    let mut bootstrap = bootstrap.clone();

    if !bootstrap.contains_key("notify_cfn") {
        let notify = ConfigNode::Mapping(vec![
            (
                "stack".to_owned(),
                ConfigNode::from(format!("{}-{}", info.stack_name, info.stack_version)),
            ),
            ("resource".to_owned(), ConfigNode::from(resource_name)),
        ]);
        bootstrap.insert("notify_cfn", notify);
    }
    if !bootstrap.contains_key("application_id") {
        bootstrap.insert("application_id", ConfigNode::from(info.stack_name.as_str()));
    }
    if !bootstrap.contains_key("application_version") {
        bootstrap.insert(
            "application_version",
            ConfigNode::from(info.stack_version.as_str()),
        );
    }

    check_application_id(string_field(&bootstrap, "application_id")?)?;
    check_application_version(string_field(&bootstrap, "application_version")?)?;

    let runtime = bootstrap.get("runtime").and_then(ConfigNode::as_str);
    if runtime != Some("Docker") {
        return Err(ComponentError::UnsupportedRuntime(
            runtime.unwrap_or_default().to_owned(),
        ));
    }

    let source = bootstrap
        .get("source")
        .and_then(ConfigNode::as_str)
        .filter(|source| !source.is_empty())
        .ok_or(ComponentError::MissingSource)?;
    let image = ImageRef::parse(source)?;

    if force {
        tracing::warn!(image = %image, "existence check skipped by force");
    } else if image.registry.is_some() {
        tracing::debug!(image = %image, "checking image existence in registry");
        if !registry.image_exists(&image)? {
            return Err(ComponentError::ImageNotFound(image.to_string()));
        }
    }

    let user_data = generate_user_data(&bootstrap, region, resolver)?;

    let mut definition = definition;
    let config_name = format!("{resource_name}Config");
    let target = ensure_mapping_path(
        &mut definition,
        &["Resources", &config_name, "Properties", "UserData"],
    )?;
    target.insert("Fn::Base64", user_data.into_node());
    Ok(definition)
}

/// Require a string-valued mapping entry.
fn string_field<'a>(bootstrap: &'a ConfigNode, key: &str) -> Result<&'a str, ComponentError> {
    bootstrap
        .get(key)
        .and_then(ConfigNode::as_str)
        .ok_or_else(|| ComponentError::ExpectedString(key.to_owned()))
}

/// Walk `path` through nested mappings, creating empty mappings for missing
/// keys, and return the node at the end of the path.
fn ensure_mapping_path<'a>(
    node: &'a mut ConfigNode,
    path: &[&str],
) -> Result<&'a mut ConfigNode, ComponentError> {
    let mut current = node;
    for key in path {
        let ConfigNode::Mapping(entries) = current else {
            return Err(ComponentError::ExpectedMapping((*key).to_owned()));
        };
        let index = match entries.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                entries.push(((*key).to_owned(), ConfigNode::mapping()));
                entries.len() - 1
            }
        };
        current = &mut entries[index].1;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_mapping_path_creates_missing_mappings() {
        let mut node = ConfigNode::mapping();
        ensure_mapping_path(&mut node, &["a", "b"])
            .unwrap()
            .insert("leaf", ConfigNode::from(1));
        assert_eq!(node.get("a").unwrap().get("b").unwrap().get("leaf"), Some(&ConfigNode::from(1)));
    }

    #[test]
    fn ensure_mapping_path_reuses_existing_mappings() {
        let mut node: ConfigNode = serde_yaml::from_str("a:\n  keep: 1\n").unwrap();
        ensure_mapping_path(&mut node, &["a", "b"]).unwrap();
        assert_eq!(node.get("a").unwrap().get("keep"), Some(&ConfigNode::from(1)));
        assert!(node.get("a").unwrap().get("b").is_some());
    }

    #[test]
    fn ensure_mapping_path_rejects_scalar_in_the_way() {
        let mut node: ConfigNode = serde_yaml::from_str("a: leaf\n").unwrap();
        let err = ensure_mapping_path(&mut node, &["a", "b"]).unwrap_err();
        assert!(matches!(err, ComponentError::ExpectedMapping(_)));
    }
}
