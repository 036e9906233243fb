//! Owned YAML node tree with source positions.
//!
//! Parses a document into a flat arena of [`YamlNode`]s addressed by
//! [`NodeId`] handles. Every node records its kind, resolved tag, scalar
//! value and 1-indexed line/column, so downstream consumers can attach
//! source locations to extracted fields without borrowing into the parser.

mod parser;

use yaml_rust2::{ScanError, YamlEmitter, yaml::Yaml};

/// Handle to a node inside a [`YamlTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  pub(crate) fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
  Scalar,
  Sequence,
  Mapping,
}

/// A single parsed node. Mapping children alternate key, value, key, value
/// in document order; sequence children are the items in order.
#[derive(Debug, Clone)]
pub struct YamlNode {
  pub kind: NodeKind,
  pub tag: String,
  pub value: String,
  pub line: u32,
  pub column: u32,
  pub children: Vec<NodeId>,
}

/// Arena of nodes for one parsed document. The first document in a stream
/// becomes the root; subsequent documents are ignored.
#[derive(Debug, Default)]
pub struct YamlTree {
  nodes: Vec<YamlNode>,
  root: Option<NodeId>,
}

impl YamlTree {
  pub fn parse(text: &str) -> Result<Self, ScanError> {
    parser::parse_tree(text)
  }

  #[must_use]
  pub fn root(&self) -> Option<NodeId> {
    self.root
  }

  #[must_use]
  pub fn node(&self, id: NodeId) -> &YamlNode {
    &self.nodes[id.index()]
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Key/value pairs of a mapping node, in document order. Empty for
  /// non-mapping nodes; a trailing unpaired key is dropped.
  pub fn pairs(&self, id: NodeId) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
    let children: &[NodeId] = match self.node(id).kind {
      NodeKind::Mapping => &self.node(id).children,
      _ => &[],
    };
    children.chunks_exact(2).map(|pair| (pair[0], pair[1]))
  }

  /// Items of a sequence node, in document order. Empty for non-sequences.
  pub fn items(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let children: &[NodeId] = match self.node(id).kind {
      NodeKind::Sequence => &self.node(id).children,
      _ => &[],
    };
    children.iter().copied()
  }

  /// The scalar text of a node, or `None` for collections.
  #[must_use]
  pub fn scalar(&self, id: NodeId) -> Option<&str> {
    let node = self.node(id);
    match node.kind {
      NodeKind::Scalar => Some(node.value.as_str()),
      _ => None,
    }
  }

  /// Converts a subtree into a plain [`Yaml`] value, losing positions but
  /// keeping mapping order.
  #[must_use]
  pub fn to_value(&self, id: NodeId) -> Yaml {
    let node = self.node(id);
    match node.kind {
      NodeKind::Scalar => scalar_to_value(&node.tag, &node.value),
      NodeKind::Sequence => Yaml::Array(self.items(id).map(|item| self.to_value(item)).collect()),
      NodeKind::Mapping => {
        let mut hash = yaml_rust2::yaml::Hash::new();
        for (key, value) in self.pairs(id) {
          hash.insert(self.to_value(key), self.to_value(value));
        }
        Yaml::Hash(hash)
      }
    }
  }
}

fn scalar_to_value(tag: &str, value: &str) -> Yaml {
  match tag {
    "!!int" => value.parse::<i64>().map_or_else(|_| Yaml::String(value.to_string()), Yaml::Integer),
    "!!float" => Yaml::Real(value.to_string()),
    "!!bool" => Yaml::Boolean(value == "true"),
    "!!null" => Yaml::Null,
    _ => Yaml::String(value.to_string()),
  }
}

/// Serializes a [`Yaml`] value to block-style UTF-8 YAML without the
/// document-start marker.
#[must_use]
pub fn emit(value: &Yaml) -> String {
  let mut out = String::new();
  let mut emitter = YamlEmitter::new(&mut out);
  if emitter.dump(value).is_err() {
    return String::new();
  }
  let body = out.strip_prefix("---\n").or_else(|| out.strip_prefix("--- ")).unwrap_or(&out);
  let mut text = body.to_string();
  if !text.ends_with('\n') {
    text.push('\n');
  }
  text
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_mapping_with_positions() {
    let tree = YamlTree::parse("openapi: 3.0.0\ninfo:\n  title: test\n").expect("parse");
    let root = tree.root().expect("root");
    assert_eq!(tree.node(root).kind, NodeKind::Mapping);

    let pairs: Vec<_> = tree.pairs(root).collect();
    assert_eq!(pairs.len(), 2);

    let (openapi_key, openapi_value) = pairs[0];
    assert_eq!(tree.scalar(openapi_key), Some("openapi"));
    assert_eq!(tree.scalar(openapi_value), Some("3.0.0"));
    assert_eq!(tree.node(openapi_key).line, 1);
    assert_eq!(tree.node(openapi_key).column, 1);

    let (info_key, info_value) = pairs[1];
    assert_eq!(tree.scalar(info_key), Some("info"));
    assert_eq!(tree.node(info_key).line, 2);
    assert_eq!(tree.node(info_value).kind, NodeKind::Mapping);

    let (title_key, title_value) = tree.pairs(info_value).next().expect("title pair");
    assert_eq!(tree.scalar(title_key), Some("title"));
    assert_eq!(tree.scalar(title_value), Some("test"));
    assert_eq!(tree.node(title_key).line, 3);
    assert_eq!(tree.node(title_key).column, 3);
  }

  #[test]
  fn resolves_scalar_tags() {
    let tree = YamlTree::parse("a: 1\nb: true\nc: 1.5\nd: null\ne: plain\nf: \"3\"\n").expect("parse");
    let root = tree.root().expect("root");
    let tags: Vec<_> = tree.pairs(root).map(|(_, value)| tree.node(value).tag.clone()).collect();
    assert_eq!(tags, vec!["!!int", "!!bool", "!!float", "!!null", "!!str", "!!str"]);
  }

  #[test]
  fn parses_sequences() {
    let tree = YamlTree::parse("items:\n  - one\n  - two\n").expect("parse");
    let root = tree.root().expect("root");
    let (_, value) = tree.pairs(root).next().expect("pair");
    assert_eq!(tree.node(value).kind, NodeKind::Sequence);
    let items: Vec<_> = tree.items(value).filter_map(|item| tree.scalar(item)).collect();
    assert_eq!(items, vec!["one", "two"]);
  }

  #[test]
  fn rejects_malformed_input() {
    assert!(YamlTree::parse("a: [unclosed").is_err());
  }

  #[test]
  fn round_trips_values() {
    let tree = YamlTree::parse("a: 1\nb:\n  - x\n  - y\n").expect("parse");
    let root = tree.root().expect("root");
    let value = tree.to_value(root);
    let rendered = emit(&value);
    let reparsed = YamlTree::parse(&rendered).expect("reparse");
    let reroot = reparsed.root().expect("root");
    let keys: Vec<_> = reparsed.pairs(reroot).filter_map(|(key, _)| reparsed.scalar(key).map(str::to_string)).collect();
    assert_eq!(keys, vec!["a", "b"]);
  }
}
