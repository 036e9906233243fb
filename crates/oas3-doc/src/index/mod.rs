//! Per-document catalogue of addressable components and `$ref` sites.
//!
//! Built in a single pre-order traversal of the document tree and
//! immutable afterwards. All pointers are RFC 6901 JSON-pointers local to
//! the document; cross-document linkage belongs to the resolver.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
  utils,
  yaml::{NodeId, NodeKind, YamlTree},
};

const METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];
const POLY_KEYS: [&str; 4] = ["oneOf", "anyOf", "allOf", "not"];

/// A catalogued node with its source position.
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry {
  pub node: NodeId,
  pub key: Option<NodeId>,
  pub line: u32,
  pub column: u32,
}

/// Kind of component a reference site occupies, derived from the key path
/// at the source site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
  Schema,
  Parameter,
  Response,
  Header,
  RequestBody,
  SecurityScheme,
  Link,
  Callback,
  Example,
  PathItem,
  Other,
}

/// One `$ref` occurrence.
#[derive(Debug, Clone)]
pub struct RefSite {
  /// Pointer of the mapping that carries the `$ref` key.
  pub pointer: String,
  /// Pointer of the nearest enclosing catalogued component; equal to
  /// `pointer` when the site is not inside one.
  pub owner: String,
  pub ref_str: String,
  pub key_node: NodeId,
  pub value_node: NodeId,
  pub line: u32,
  pub column: u32,
  pub kind: RefKind,
  /// The site sits on an array-item position (`items`).
  pub via_items: bool,
  /// Nearest enclosing polymorphic composition key, if any.
  pub poly_key: Option<String>,
}

/// Immutable catalogue for one rolodex document.
#[derive(Debug)]
pub struct SpecIndex {
  cid: String,
  tree: Arc<YamlTree>,
  schemas: IndexMap<String, IndexEntry>,
  parameters: IndexMap<String, IndexEntry>,
  responses: IndexMap<String, IndexEntry>,
  headers: IndexMap<String, IndexEntry>,
  request_bodies: IndexMap<String, IndexEntry>,
  security_schemes: IndexMap<String, IndexEntry>,
  links: IndexMap<String, IndexEntry>,
  callbacks: IndexMap<String, IndexEntry>,
  examples: IndexMap<String, IndexEntry>,
  path_items: IndexMap<String, IndexEntry>,
  operations: IndexMap<String, IndexEntry>,
  refs: Vec<RefSite>,
}

impl SpecIndex {
  #[must_use]
  pub fn build(cid: impl Into<String>, tree: Arc<YamlTree>) -> Self {
    let mut index = Self {
      cid: cid.into(),
      tree: tree.clone(),
      schemas: IndexMap::new(),
      parameters: IndexMap::new(),
      responses: IndexMap::new(),
      headers: IndexMap::new(),
      request_bodies: IndexMap::new(),
      security_schemes: IndexMap::new(),
      links: IndexMap::new(),
      callbacks: IndexMap::new(),
      examples: IndexMap::new(),
      path_items: IndexMap::new(),
      operations: IndexMap::new(),
      refs: Vec::new(),
    };
    if let Some(root) = tree.root() {
      let mut walker = Walker {
        tree: &tree,
        index: &mut index,
        segments: Vec::new(),
        owners: Vec::new(),
      };
      walker.walk(root, None);
    }
    index
  }

  #[must_use]
  pub fn cid(&self) -> &str {
    &self.cid
  }

  #[must_use]
  pub fn tree(&self) -> &Arc<YamlTree> {
    &self.tree
  }

  #[must_use]
  pub fn refs(&self) -> &[RefSite] {
    &self.refs
  }

  #[must_use]
  pub fn schemas(&self) -> &IndexMap<String, IndexEntry> {
    &self.schemas
  }

  #[must_use]
  pub fn parameters(&self) -> &IndexMap<String, IndexEntry> {
    &self.parameters
  }

  #[must_use]
  pub fn responses(&self) -> &IndexMap<String, IndexEntry> {
    &self.responses
  }

  #[must_use]
  pub fn headers(&self) -> &IndexMap<String, IndexEntry> {
    &self.headers
  }

  #[must_use]
  pub fn request_bodies(&self) -> &IndexMap<String, IndexEntry> {
    &self.request_bodies
  }

  #[must_use]
  pub fn security_schemes(&self) -> &IndexMap<String, IndexEntry> {
    &self.security_schemes
  }

  #[must_use]
  pub fn links(&self) -> &IndexMap<String, IndexEntry> {
    &self.links
  }

  #[must_use]
  pub fn callbacks(&self) -> &IndexMap<String, IndexEntry> {
    &self.callbacks
  }

  #[must_use]
  pub fn examples(&self) -> &IndexMap<String, IndexEntry> {
    &self.examples
  }

  #[must_use]
  pub fn path_items(&self) -> &IndexMap<String, IndexEntry> {
    &self.path_items
  }

  #[must_use]
  pub fn operations(&self) -> &IndexMap<String, IndexEntry> {
    &self.operations
  }

  /// Walks the document tree along a JSON-pointer. An empty pointer
  /// addresses the root.
  #[must_use]
  pub fn locate(&self, pointer: &str) -> Option<IndexEntry> {
    let root = self.tree.root()?;
    let trimmed = pointer.trim_start_matches('#');
    if trimmed.is_empty() || trimmed == "/" {
      let node = self.tree.node(root);
      return Some(IndexEntry {
        node: root,
        key: None,
        line: node.line,
        column: node.column,
      });
    }

    let mut current = root;
    let mut key = None;
    for raw in trimmed.trim_start_matches('/').split('/') {
      let segment = utils::unescape_pointer_segment(raw);
      match self.tree.node(current).kind {
        NodeKind::Mapping => {
          let hit = utils::find_key_top(&self.tree, current, &segment)?;
          key = Some(hit.key);
          current = hit.value;
        }
        NodeKind::Sequence => {
          let index: usize = segment.parse().ok()?;
          current = self.tree.items(current).nth(index)?;
          key = None;
        }
        NodeKind::Scalar => return None,
      }
    }
    let node = self.tree.node(current);
    Some(IndexEntry {
      node: current,
      key,
      line: node.line,
      column: node.column,
    })
  }
}

struct Walker<'a> {
  tree: &'a YamlTree,
  index: &'a mut SpecIndex,
  segments: Vec<String>,
  owners: Vec<String>,
}

impl Walker<'_> {
  fn walk(&mut self, node: NodeId, key: Option<NodeId>) {
    let catalogued = self.catalogue(node, key);
    if catalogued {
      self.owners.push(self.pointer());
    }

    match self.tree.node(node).kind {
      NodeKind::Mapping => {
        self.record_ref(node);
        let pairs: Vec<_> = self.tree.pairs(node).collect();
        for (key_node, value) in pairs {
          let segment = self.tree.scalar(key_node).unwrap_or_default().to_string();
          self.segments.push(segment);
          self.walk(value, Some(key_node));
          self.segments.pop();
        }
      }
      NodeKind::Sequence => {
        let items: Vec<_> = self.tree.items(node).collect();
        for (position, item) in items.into_iter().enumerate() {
          self.segments.push(position.to_string());
          self.walk(item, None);
          self.segments.pop();
        }
      }
      NodeKind::Scalar => {}
    }

    if catalogued {
      self.owners.pop();
    }
  }

  fn pointer(&self) -> String {
    if self.segments.is_empty() {
      return String::new();
    }
    let mut pointer = String::new();
    for segment in &self.segments {
      pointer.push('/');
      pointer.push_str(&utils::escape_pointer_segment(segment));
    }
    pointer
  }

  fn catalogue(&mut self, node: NodeId, key: Option<NodeId>) -> bool {
    if self.tree.node(node).kind != NodeKind::Mapping {
      return false;
    }
    let Some(collection) = self.collection_for_segments() else {
      return false;
    };
    let yaml_node = self.tree.node(node);
    let entry = IndexEntry {
      node,
      key,
      line: yaml_node.line,
      column: yaml_node.column,
    };
    let pointer = self.pointer();
    let target = match collection {
      RefKind::Schema => &mut self.index.schemas,
      RefKind::Parameter => &mut self.index.parameters,
      RefKind::Response => &mut self.index.responses,
      RefKind::Header => &mut self.index.headers,
      RefKind::RequestBody => &mut self.index.request_bodies,
      RefKind::SecurityScheme => &mut self.index.security_schemes,
      RefKind::Link => &mut self.index.links,
      RefKind::Callback => &mut self.index.callbacks,
      RefKind::Example => &mut self.index.examples,
      RefKind::PathItem => &mut self.index.path_items,
      RefKind::Other => &mut self.index.operations,
    };
    target.entry(pointer).or_insert(entry);
    true
  }

  /// Which collection the current path addresses, if any. `Other` stands
  /// in for operations, which have no reference classification of their
  /// own.
  fn collection_for_segments(&self) -> Option<RefKind> {
    let segments = &self.segments;
    let last = segments.last()?;
    let parent = segments.len().checked_sub(2).map(|i| segments[i].as_str());

    if segments.len() == 3 && segments[0] == "components" {
      return match segments[1].as_str() {
        "schemas" => Some(RefKind::Schema),
        "parameters" => Some(RefKind::Parameter),
        "responses" => Some(RefKind::Response),
        "headers" => Some(RefKind::Header),
        "requestBodies" => Some(RefKind::RequestBody),
        "securitySchemes" => Some(RefKind::SecurityScheme),
        "links" => Some(RefKind::Link),
        "callbacks" => Some(RefKind::Callback),
        "examples" => Some(RefKind::Example),
        _ => None,
      };
    }
    if segments.len() == 2 && (segments[0] == "paths" || segments[0] == "webhooks") {
      return Some(RefKind::PathItem);
    }
    if segments.len() == 3 && segments[0] == "paths" && METHODS.contains(&last.as_str()) {
      return Some(RefKind::Other);
    }
    // inline occurrences
    match parent {
      Some("parameters") if last.parse::<usize>().is_ok() => Some(RefKind::Parameter),
      Some("headers") => Some(RefKind::Header),
      Some("examples") => Some(RefKind::Example),
      Some("responses") => Some(RefKind::Response),
      _ => None,
    }
  }

  fn record_ref(&mut self, node: NodeId) {
    let Some(hit) = utils::find_key_top(self.tree, node, "$ref") else {
      return;
    };
    let Some(ref_str) = self.tree.scalar(hit.value) else {
      return;
    };
    let key_node = self.tree.node(hit.key);
    let pointer = self.pointer();
    let site = RefSite {
      owner: self.owners.last().cloned().unwrap_or_else(|| pointer.clone()),
      pointer,
      ref_str: ref_str.to_string(),
      key_node: hit.key,
      value_node: hit.value,
      line: key_node.line,
      column: key_node.column,
      kind: self.classify_site(),
      via_items: self.via_items(),
      poly_key: self.poly_key(),
    };
    self.index.refs.push(site);
  }

  fn classify_site(&self) -> RefKind {
    let segments = &self.segments;
    let last = segments.last().map(String::as_str).unwrap_or_default();
    let parent = segments.len().checked_sub(2).map(|i| segments[i].as_str()).unwrap_or_default();

    if segments.len() == 2 && (segments[0] == "paths" || segments[0] == "webhooks") {
      return RefKind::PathItem;
    }
    match (parent, last) {
      ("schemas", _)
      | (_, "schema")
      | (_, "items")
      | (_, "not")
      | (_, "additionalProperties")
      | ("properties", _)
      | ("items", _) => return RefKind::Schema,
      _ => {}
    }
    if (parent == "oneOf" || parent == "anyOf" || parent == "allOf") && last.parse::<usize>().is_ok() {
      return RefKind::Schema;
    }
    match (parent, last) {
      ("parameters", index) if index.parse::<usize>().is_ok() => RefKind::Parameter,
      ("responses", _) => RefKind::Response,
      ("headers", _) => RefKind::Header,
      ("requestBodies", _) | (_, "requestBody") => RefKind::RequestBody,
      ("securitySchemes", _) => RefKind::SecurityScheme,
      ("links", _) => RefKind::Link,
      ("callbacks", _) => RefKind::Callback,
      ("examples", _) => RefKind::Example,
      _ => RefKind::Other,
    }
  }

  fn via_items(&self) -> bool {
    let segments = &self.segments;
    match segments.last().map(String::as_str) {
      Some("items") => true,
      Some(last) if last.parse::<usize>().is_ok() => {
        segments.len() >= 2 && segments[segments.len() - 2] == "items"
      }
      _ => false,
    }
  }

  fn poly_key(&self) -> Option<String> {
    self
      .segments
      .iter()
      .rev()
      .find(|segment| POLY_KEYS.contains(&segment.as_str()))
      .cloned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn build(text: &str) -> SpecIndex {
    let tree = Arc::new(YamlTree::parse(text).expect("parse"));
    SpecIndex::build("/spec/root.yaml", tree)
  }

  const SPEC: &str = "openapi: 3.0.0\n\
paths:\n  /pets:\n    get:\n      parameters:\n        - $ref: '#/components/parameters/Limit'\n\
components:\n  schemas:\n    Pet:\n      type: object\n      properties:\n        owner:\n          $ref: '#/components/schemas/Owner'\n    Owner:\n      type: object\n  parameters:\n    Limit:\n      name: limit\n      in: query\n";

  #[test]
  fn catalogues_components_and_paths() {
    let index = build(SPEC);
    assert!(index.schemas().contains_key("/components/schemas/Pet"));
    assert!(index.schemas().contains_key("/components/schemas/Owner"));
    assert!(index.parameters().contains_key("/components/parameters/Limit"));
    assert!(index.path_items().contains_key("/paths/~1pets"));
    assert!(index.operations().contains_key("/paths/~1pets/get"));
  }

  #[test]
  fn records_refs_with_classification_and_owner() {
    let index = build(SPEC);
    assert_eq!(index.refs().len(), 2);

    let parameter_ref = index.refs().iter().find(|site| site.kind == RefKind::Parameter).expect("param ref");
    assert_eq!(parameter_ref.ref_str, "#/components/parameters/Limit");

    let schema_ref = index.refs().iter().find(|site| site.kind == RefKind::Schema).expect("schema ref");
    assert_eq!(schema_ref.ref_str, "#/components/schemas/Owner");
    assert_eq!(schema_ref.owner, "/components/schemas/Pet");
    assert!(!schema_ref.via_items);
    assert!(schema_ref.poly_key.is_none());
  }

  #[test]
  fn flags_items_and_polymorphic_positions() {
    let index = build(
      "components:\n  schemas:\n    List:\n      type: array\n      items:\n        $ref: '#/components/schemas/Item'\n    Choice:\n      oneOf:\n        - $ref: '#/components/schemas/Item'\n    Item:\n      type: string\n",
    );
    let items_ref = index.refs().iter().find(|site| site.via_items).expect("items ref");
    assert_eq!(items_ref.owner, "/components/schemas/List");

    let poly_ref = index.refs().iter().find(|site| site.poly_key.is_some()).expect("poly ref");
    assert_eq!(poly_ref.poly_key.as_deref(), Some("oneOf"));
    assert_eq!(poly_ref.kind, RefKind::Schema);
  }

  #[test]
  fn locate_walks_pointers() {
    let index = build(SPEC);
    let entry = index.locate("/components/schemas/Pet").expect("entry");
    assert!(entry.line > 0);
    assert!(index.locate("#/components/schemas/Pet").is_some());
    assert!(index.locate("/components/schemas/Missing").is_none());
    assert!(index.locate("/paths/~1pets/get").is_some());
    assert!(index.locate("").is_some());
  }
}
