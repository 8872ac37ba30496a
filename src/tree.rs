//! The declarative path tree and its flattening into a list of paths.
//!
//! A backup configuration names what to save as a nested tree: a bare string
//! is a path under the current prefix, a list groups siblings, and a mapping
//! key extends the prefix by one segment for everything beneath it. This
//! module turns that tree into the flat, ordered list of paths the saver
//! stages. Pure data transformation, no I/O.

use std::path::{Path, PathBuf};

/// One node of the declarative tree describing what to back up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// A single path segment naming a file or directory under the current prefix.
    Leaf(String),
    /// An ordered list of nodes sharing the current prefix.
    Sequence(Vec<PathNode>),
    /// Key/subtree pairs in document order; each key extends the prefix by
    /// one segment for its subtree.
    Branch(Vec<(String, PathNode)>),
}

/// Flattens a declarative tree into the ordered list of paths it names.
///
/// Traversal is depth-first, left to right. The resulting order is the order
/// elements are staged and reported in, so it is preserved exactly.
pub fn flatten(nodes: &[PathNode], base: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for node in nodes {
        flatten_into(node, base, &mut paths);
    }
    paths
}

fn flatten_into(node: &PathNode, base: &Path, paths: &mut Vec<PathBuf>) {
    match node {
        PathNode::Leaf(segment) => paths.push(base.join(segment)),
        PathNode::Sequence(children) => {
            for child in children {
                flatten_into(child, base, paths);
            }
        }
        PathNode::Branch(entries) => {
            for (key, subtree) in entries {
                flatten_into(subtree, &base.join(key), paths);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> PathNode {
        PathNode::Leaf(s.to_string())
    }

    #[test]
    fn flattens_leaves_in_order() {
        let nodes = vec![leaf("a.txt"), leaf("b.txt"), leaf("c.txt")];
        let paths = flatten(&nodes, Path::new("."));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("./a.txt"),
                PathBuf::from("./b.txt"),
                PathBuf::from("./c.txt"),
            ]
        );
    }

    #[test]
    fn branch_extends_the_prefix() {
        let nodes = vec![PathNode::Branch(vec![(
            "sub".to_string(),
            PathNode::Sequence(vec![leaf("b.txt")]),
        )])];
        assert_eq!(flatten(&nodes, Path::new(".")), vec![PathBuf::from("./sub/b.txt")]);
        // Flattening {x: T} at base equals flattening T at base/x.
        let subtree = [PathNode::Sequence(vec![leaf("b.txt")])];
        assert_eq!(flatten(&nodes, Path::new(".")), flatten(&subtree, Path::new("./sub")));
    }

    #[test]
    fn concatenation_is_order_preserving() {
        let a = vec![leaf("a1"), leaf("a2")];
        let b = vec![PathNode::Branch(vec![("d".to_string(), leaf("b1"))])];
        let combined: Vec<PathNode> = a.iter().chain(b.iter()).cloned().collect();

        let mut expected = flatten(&a, Path::new("."));
        expected.extend(flatten(&b, Path::new(".")));
        assert_eq!(flatten(&combined, Path::new(".")), expected);
    }

    #[test]
    fn mixed_tree_round_trip() {
        let nodes = vec![
            leaf("a.txt"),
            PathNode::Branch(vec![(
                "sub".to_string(),
                PathNode::Sequence(vec![leaf("b.txt")]),
            )]),
        ];
        assert_eq!(
            flatten(&nodes, Path::new(".")),
            vec![PathBuf::from("./a.txt"), PathBuf::from("./sub/b.txt")]
        );
    }

    #[test]
    fn nested_branches_accumulate_segments() {
        let nodes = vec![PathNode::Branch(vec![(
            "home".to_string(),
            PathNode::Branch(vec![(
                "user".to_string(),
                PathNode::Sequence(vec![leaf(".bashrc"), leaf("notes")]),
            )]),
        )])];
        assert_eq!(
            flatten(&nodes, Path::new(".")),
            vec![
                PathBuf::from("./home/user/.bashrc"),
                PathBuf::from("./home/user/notes"),
            ]
        );
    }

    #[test]
    fn duplicates_are_tolerated() {
        let nodes = vec![leaf("a.txt"), leaf("a.txt")];
        assert_eq!(flatten(&nodes, Path::new(".")).len(), 2);
    }
}
