//! Folder discovery over the raw configuration tree.
//!
//! The configuration is kept as a [`ConfigNode`] next to the typed schema so
//! that folder groups can live anywhere in the file, at any depth, under a
//! key named `folders`.

use serde_yaml::Value;

/// Key under which folder names are listed.
pub const FOLDERS_KEY: &str = "folders";

/// A configuration tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    /// Mapping entries in document order.
    Mapping(Vec<(String, ConfigNode)>),
    /// Sequence items in document order.
    Sequence(Vec<ConfigNode>),
    /// Scalar value rendered as text; `None` for YAML null.
    Leaf(Option<String>),
}

impl ConfigNode {
    /// Look up a direct child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Scalar text of a leaf node.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            ConfigNode::Leaf(value) => value.as_deref(),
            _ => None,
        }
    }
}

impl From<&Value> for ConfigNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Mapping(mapping) => ConfigNode::Mapping(
                mapping
                    .iter()
                    .filter_map(|(k, v)| scalar_text(k).map(|key| (key, ConfigNode::from(v))))
                    .collect(),
            ),
            Value::Sequence(items) => {
                ConfigNode::Sequence(items.iter().map(ConfigNode::from).collect())
            }
            Value::Tagged(tagged) => ConfigNode::from(&tagged.value),
            other => ConfigNode::Leaf(scalar_text(other)),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collect every folder name listed under `key`, at any nesting depth.
///
/// Names are returned in document order. Duplicates are kept: a folder
/// granted to two users appears twice.
///
/// # Example
/// ```
/// use orgdocs_core::folders::{collect_folder_names, ConfigNode, FOLDERS_KEY};
///
/// let value: serde_yaml::Value = serde_yaml::from_str(
///     "a: {folders: [x, y]}\nb: {c: {folders: [z]}}",
/// ).unwrap();
/// let names = collect_folder_names(&ConfigNode::from(&value), FOLDERS_KEY);
/// assert_eq!(names, vec!["x", "y", "z"]);
/// ```
pub fn collect_folder_names(node: &ConfigNode, key: &str) -> Vec<String> {
    let mut names = Vec::new();
    walk(node, key, &mut names);
    names
}

fn walk(node: &ConfigNode, key: &str, names: &mut Vec<String>) {
    match node {
        ConfigNode::Mapping(entries) => {
            for (k, child) in entries {
                if k == key {
                    push_names(child, names);
                } else {
                    walk(child, key, names);
                }
            }
        }
        ConfigNode::Sequence(items) => {
            for item in items {
                walk(item, key, names);
            }
        }
        ConfigNode::Leaf(_) => {}
    }
}

fn push_names(node: &ConfigNode, names: &mut Vec<String>) {
    match node {
        ConfigNode::Sequence(items) => {
            names.extend(items.iter().filter_map(|i| i.as_leaf().map(str::to_string)));
        }
        ConfigNode::Leaf(Some(name)) => names.push(name.clone()),
        _ => {}
    }
}
