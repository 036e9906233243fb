//! Pure helpers over [`YamlTree`] nodes and document identifiers.

use crate::yaml::{NodeId, NodeKind, YamlTree};

/// Result of locating a key inside a mapping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHit {
  /// Position of the pair within the mapping, in document order.
  pub index: usize,
  pub key: NodeId,
  pub value: NodeId,
}

/// Locates `key` at the top level of a mapping node only.
#[must_use]
pub fn find_key_top(tree: &YamlTree, map: NodeId, key: &str) -> Option<KeyHit> {
  tree
    .pairs(map)
    .enumerate()
    .find(|(_, (key_node, _))| tree.scalar(*key_node) == Some(key))
    .map(|(index, (key_node, value))| KeyHit {
      index,
      key: key_node,
      value,
    })
}

/// Locates the first occurrence of `key` in document order, searching
/// nested mappings and sequences.
#[must_use]
pub fn find_key(tree: &YamlTree, node: NodeId, key: &str) -> Option<KeyHit> {
  if let Some(hit) = find_key_top(tree, node, key) {
    return Some(hit);
  }
  match tree.node(node).kind {
    NodeKind::Mapping => tree.pairs(node).find_map(|(_, value)| find_key(tree, value, key)),
    NodeKind::Sequence => tree.items(node).find_map(|item| find_key(tree, item, key)),
    NodeKind::Scalar => None,
  }
}

#[must_use]
pub fn is_map(tree: &YamlTree, id: NodeId) -> bool {
  tree.node(id).kind == NodeKind::Mapping
}

#[must_use]
pub fn is_array(tree: &YamlTree, id: NodeId) -> bool {
  tree.node(id).kind == NodeKind::Sequence
}

#[must_use]
pub fn is_scalar(tree: &YamlTree, id: NodeId) -> bool {
  tree.node(id).kind == NodeKind::Scalar
}

/// Key/value node pairs whose key carries the `x-` extension prefix.
pub fn extension_pairs<'a>(tree: &'a YamlTree, map: NodeId) -> impl Iterator<Item = (NodeId, NodeId)> + 'a {
  tree
    .pairs(map)
    .filter(|(key, _)| tree.scalar(*key).is_some_and(|name| name.starts_with("x-")))
}

/// Normalizes a path to forward slashes, stripping a Windows drive letter
/// down to a leading slash (`C:\a\b` becomes `/a/b`).
#[must_use]
pub fn normalize_path(path: &str) -> String {
  let bytes = path.as_bytes();
  if bytes.len() > 1 && bytes[1] == b':' {
    return path[2..].replace('\\', "/");
  }
  path.replace('\\', "/")
}

/// Joins two separator-delimited paths, collapsing one shared boundary
/// segment (`a/b` + `b/c` becomes `a/b/c`).
#[must_use]
pub fn join_path_overlap(path_a: &str, path_b: &str, separator: &str) -> String {
  let a: Vec<&str> = path_a.split(separator).collect();
  let mut b: Vec<&str> = path_b.split(separator).collect();
  if a.last() == b.first() {
    b.remove(0);
  }
  let mut joined = a;
  joined.extend(b);
  joined.join(separator)
}

/// Escapes a JSON-pointer segment per RFC 6901 (`~` then `/`).
#[must_use]
pub fn escape_pointer_segment(segment: &str) -> String {
  segment.replace('~', "~0").replace('/', "~1")
}

/// Reverses [`escape_pointer_segment`].
#[must_use]
pub fn unescape_pointer_segment(segment: &str) -> String {
  segment.replace("~1", "/").replace("~0", "~")
}
