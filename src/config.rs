//! Backup configuration loaded from a YAML file.
//!
//! Three fields: `save_destination` (the archive path, whose suffix picks
//! the format), `save` (the declarative path tree, see [`crate::tree`]) and
//! an optional `ignore` list of bare filenames to skip inside copied
//! directories. The `save` tree arrives as untyped YAML and is converted to
//! [`PathNode`] here so a malformed node is rejected before any filesystem
//! mutation happens.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SaverError;
use crate::tree::PathNode;

#[derive(Debug, Deserialize)]
struct RawConfig {
    save_destination: PathBuf,
    save: serde_yaml::Value,
    #[serde(default)]
    ignore: Vec<String>,
}

/// A validated configuration for one backup run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the archive to (re)create; the suffix selects the format.
    pub save_destination: PathBuf,
    /// The declarative tree of paths to save.
    pub save: Vec<PathNode>,
    /// Bare filenames excluded from directory copies.
    pub ignore: Vec<String>,
}

impl Config {
    /// Loads and validates a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, SaverError> {
        let file = File::open(path).map_err(|e| SaverError::Io { source: e, path: path.to_path_buf() })?;
        let raw: RawConfig = serde_yaml::from_reader(file)?;
        Self::from_raw(raw)
    }

    /// Parses a configuration from a YAML string.
    pub fn from_yaml_str(contents: &str) -> Result<Self, SaverError> {
        let raw: RawConfig = serde_yaml::from_str(contents)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, SaverError> {
        Ok(Self {
            save: nodes_from_yaml(&raw.save)?,
            save_destination: raw.save_destination,
            ignore: raw.ignore,
        })
    }
}

fn nodes_from_yaml(value: &serde_yaml::Value) -> Result<Vec<PathNode>, SaverError> {
    match value {
        serde_yaml::Value::Sequence(seq) => seq.iter().map(node_from_yaml).collect(),
        other => Err(SaverError::Config(format!(
            "`save` must be a list, got {}",
            yaml_kind(other)
        ))),
    }
}

fn node_from_yaml(value: &serde_yaml::Value) -> Result<PathNode, SaverError> {
    match value {
        serde_yaml::Value::String(s) => Ok(PathNode::Leaf(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let children = seq.iter().map(node_from_yaml).collect::<Result<_, _>>()?;
            Ok(PathNode::Sequence(children))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, subtree) in map {
                let key = key.as_str().ok_or_else(|| {
                    SaverError::Config(format!(
                        "mapping keys in the `save` tree must be strings, got {}",
                        yaml_kind(key)
                    ))
                })?;
                entries.push((key.to_string(), node_from_yaml(subtree)?));
            }
            Ok(PathNode::Branch(entries))
        }
        other => Err(SaverError::Config(format!(
            "nodes in the `save` tree must be strings, lists or mappings, got {}",
            yaml_kind(other)
        ))),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::flatten;

    #[test]
    fn parses_a_full_config() {
        let config = Config::from_yaml_str(concat!(
            "save_destination: backup.zip\n",
            "save:\n",
            "  - file1.txt\n",
            "  - dir:\n",
            "      - file2.txt\n",
            "ignore:\n",
            "  - .git\n",
        ))
        .unwrap();
        assert_eq!(config.save_destination, PathBuf::from("backup.zip"));
        assert_eq!(config.ignore, vec![".git".to_string()]);
        assert_eq!(
            flatten(&config.save, Path::new(".")),
            vec![PathBuf::from("./file1.txt"), PathBuf::from("./dir/file2.txt")]
        );
    }

    #[test]
    fn ignore_defaults_to_empty() {
        let config = Config::from_yaml_str("save_destination: backup.zip\nsave: [a.txt]\n").unwrap();
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn mapping_order_is_preserved() {
        let config = Config::from_yaml_str(concat!(
            "save_destination: backup.zip\n",
            "save:\n",
            "  - zz: [one.txt]\n",
            "    aa: [two.txt]\n",
        ))
        .unwrap();
        assert_eq!(
            flatten(&config.save, Path::new(".")),
            vec![PathBuf::from("./zz/one.txt"), PathBuf::from("./aa/two.txt")]
        );
    }

    #[test]
    fn rejects_a_non_list_save_tree() {
        let err = Config::from_yaml_str("save_destination: backup.zip\nsave: 42\n").unwrap_err();
        assert!(matches!(err, SaverError::Config(_)), "got {err:?}");
    }

    #[test]
    fn rejects_a_malformed_tree_node() {
        let err = Config::from_yaml_str("save_destination: backup.zip\nsave: [a.txt, 7]\n").unwrap_err();
        assert!(matches!(err, SaverError::Config(_)), "got {err:?}");
    }

    #[test]
    fn rejects_a_missing_destination() {
        let err = Config::from_yaml_str("save: [a.txt]\n").unwrap_err();
        assert!(matches!(err, SaverError::Yaml(_)), "got {err:?}");
    }
}
