//! Generic extraction helpers driving low-model construction from YAML
//! nodes. All helpers are pure given the context: they never fetch and
//! never suspend.

use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{KeyRef, LowMap, NodeRef, ValueRef};
use crate::{
  error::DocError,
  index::SpecIndex,
  rolodex::{Rolodex, split_ref},
  utils::{self, KeyHit},
  yaml::{NodeId, NodeKind, YamlTree},
};

/// Everything an extractor needs to turn nodes of one document into low
/// objects: the document tree, its index, and the rolodex for following
/// cross-document references.
#[derive(Clone)]
pub struct ExtractContext {
  pub cid: String,
  pub tree: Arc<YamlTree>,
  pub index: Arc<SpecIndex>,
  pub rolodex: Option<Arc<Rolodex>>,
}

impl std::fmt::Debug for ExtractContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ExtractContext").field("cid", &self.cid).finish_non_exhaustive()
  }
}

impl ExtractContext {
  /// Context for a lone document with no rolodex behind it. Only
  /// same-document references resolve.
  #[must_use]
  pub fn standalone(cid: impl Into<String>, tree: Arc<YamlTree>) -> Self {
    let cid = cid.into();
    let index = Arc::new(SpecIndex::build(cid.clone(), tree.clone()));
    Self {
      cid,
      tree,
      index,
      rolodex: None,
    }
  }

  /// Context for the rolodex's root document.
  #[must_use]
  pub fn for_root(rolodex: &Arc<Rolodex>) -> Option<Self> {
    let entry = rolodex.root()?;
    Some(Self {
      cid: entry.cid.clone(),
      tree: entry.tree.clone(),
      index: entry.index.clone(),
      rolodex: Some(rolodex.clone()),
    })
  }

  /// Resolves a raw reference to the node it targets, together with a
  /// context for the document that owns that node.
  pub fn locate_ref(&self, raw: &str) -> Result<(Self, NodeId), DocError> {
    if let Some(rolodex) = self.rolodex.as_ref() {
      if let Some(target) = rolodex.resolved_target(&self.cid, raw) {
        if let Some(entry) = rolodex.entry(&target.cid) {
          let ctx = Self {
            cid: entry.cid.clone(),
            tree: entry.tree.clone(),
            index: entry.index.clone(),
            rolodex: Some(rolodex.clone()),
          };
          return Ok((ctx, target.node));
        }
      }
    }
    let (location, pointer) = split_ref(raw);
    if location.is_empty() {
      if let Some(entry) = self.index.locate(&pointer) {
        return Ok((self.clone(), entry.node));
      }
    }
    Err(DocError::not_found(format!("cannot locate reference '{raw}'")).with_cid(&self.cid))
  }
}

/// A low object that can populate itself from a mapping node.
pub trait Buildable: Sized {
  fn build(node: NodeId, key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError>;
}

fn field_line(tree: &YamlTree, hit: &KeyHit) -> u32 {
  tree.node(hit.key).line
}

fn wrap<T>(tree: &YamlTree, hit: &KeyHit, value: T) -> NodeRef<T> {
  NodeRef::new(value, Some(hit.key), Some(hit.value), field_line(tree, hit))
}

/// A string field at the top level of `parent`, if present and scalar.
#[must_use]
pub fn extract_string(tree: &YamlTree, parent: NodeId, label: &str) -> Option<NodeRef<String>> {
  let hit = utils::find_key_top(tree, parent, label)?;
  let value = tree.scalar(hit.value)?.to_string();
  Some(wrap(tree, &hit, value))
}

#[must_use]
pub fn extract_bool(tree: &YamlTree, parent: NodeId, label: &str) -> Option<NodeRef<bool>> {
  let hit = utils::find_key_top(tree, parent, label)?;
  let value = tree.scalar(hit.value)? == "true";
  Some(wrap(tree, &hit, value))
}

#[must_use]
pub fn extract_int(tree: &YamlTree, parent: NodeId, label: &str) -> Option<NodeRef<i64>> {
  let hit = utils::find_key_top(tree, parent, label)?;
  let value = tree.scalar(hit.value)?.parse::<i64>().ok()?;
  Some(wrap(tree, &hit, value))
}

#[must_use]
pub fn extract_float(tree: &YamlTree, parent: NodeId, label: &str) -> Option<NodeRef<f64>> {
  let hit = utils::find_key_top(tree, parent, label)?;
  let value = tree.scalar(hit.value)?.parse::<f64>().ok()?;
  Some(wrap(tree, &hit, value))
}

/// Any field as a plain value, keeping mapping order but losing node
/// identity below the top.
#[must_use]
pub fn extract_value(tree: &YamlTree, parent: NodeId, label: &str) -> Option<NodeRef<Yaml>> {
  let hit = utils::find_key_top(tree, parent, label)?;
  Some(wrap(tree, &hit, tree.to_value(hit.value)))
}

/// A sequence of scalar strings. Non-sequence values yield `None`.
#[must_use]
pub fn extract_string_vec(tree: &YamlTree, parent: NodeId, label: &str) -> Option<NodeRef<Vec<ValueRef<String>>>> {
  let hit = utils::find_key_top(tree, parent, label)?;
  if !utils::is_array(tree, hit.value) {
    return None;
  }
  let items = tree
    .items(hit.value)
    .filter_map(|item| {
      tree
        .scalar(item)
        .map(|text| ValueRef::new(text.to_string(), item, tree.node(item).line))
    })
    .collect();
  Some(wrap(tree, &hit, items))
}

/// A sequence of arbitrary values (enum members, schema examples).
#[must_use]
pub fn extract_value_vec(tree: &YamlTree, parent: NodeId, label: &str) -> Option<NodeRef<Vec<ValueRef<Yaml>>>> {
  let hit = utils::find_key_top(tree, parent, label)?;
  if !utils::is_array(tree, hit.value) {
    return None;
  }
  let items = tree
    .items(hit.value)
    .map(|item| ValueRef::new(tree.to_value(item), item, tree.node(item).line))
    .collect();
  Some(wrap(tree, &hit, items))
}

/// All `x-` keys of a mapping with their values and positions.
#[must_use]
pub fn extract_extensions(tree: &YamlTree, map: NodeId) -> super::Extensions {
  let mut extensions = IndexMap::new();
  for (key_node, value_node) in utils::extension_pairs(tree, map) {
    let Some(name) = tree.scalar(key_node) else {
      continue;
    };
    extensions.insert(
      KeyRef {
        value: name.to_string(),
        key_node,
        line: tree.node(key_node).line,
      },
      ValueRef::new(tree.to_value(value_node), value_node, tree.node(value_node).line),
    );
  }
  extensions
}

/// Builds `T` from a node, following a top-level `$ref` when present.
/// The returned wrapper keeps the site's node identity and records the
/// raw reference string.
pub fn build_from_node<T: Buildable>(
  node: NodeId,
  key: Option<NodeId>,
  ctx: &ExtractContext,
) -> Result<NodeRef<T>, DocError> {
  let line = key.map_or_else(|| ctx.tree.node(node).line, |key| ctx.tree.node(key).line);
  if let Some(raw) = reference_string(&ctx.tree, node) {
    let (target_ctx, target) = ctx.locate_ref(&raw)?;
    let value = T::build(target, None, &target_ctx)?;
    let mut wrapped = NodeRef::new(value, key, Some(node), line);
    wrapped.reference = Some(raw);
    return Ok(wrapped);
  }
  let value = T::build(node, key, ctx)?;
  Ok(NodeRef::new(value, key, Some(node), line))
}

fn reference_string(tree: &YamlTree, node: NodeId) -> Option<String> {
  if tree.node(node).kind != NodeKind::Mapping {
    return None;
  }
  let hit = utils::find_key_top(tree, node, "$ref")?;
  tree.scalar(hit.value).map(str::to_string)
}

/// Finds `label` under `parent` and builds `T` from its mapping value.
pub fn extract_object<T: Buildable>(
  label: &str,
  parent: NodeId,
  ctx: &ExtractContext,
) -> Result<Option<NodeRef<T>>, DocError> {
  let Some(hit) = utils::find_key_top(&ctx.tree, parent, label) else {
    return Ok(None);
  };
  if !utils::is_map(&ctx.tree, hit.value) {
    return Err(
      DocError::build(format!("'{label}' must be a mapping"))
        .with_cid(&ctx.cid)
        .with_location(field_line(&ctx.tree, &hit), ctx.tree.node(hit.key).column),
    );
  }
  build_from_node(hit.value, Some(hit.key), ctx).map(Some)
}

/// Finds `label` under `parent` and builds an ordered sequence of `T`.
/// Non-mapping items are rejected.
pub fn extract_array<T: Buildable>(
  label: &str,
  parent: NodeId,
  ctx: &ExtractContext,
) -> Result<Option<NodeRef<Vec<ValueRef<T>>>>, DocError> {
  let Some(hit) = utils::find_key_top(&ctx.tree, parent, label) else {
    return Ok(None);
  };
  if !utils::is_array(&ctx.tree, hit.value) {
    return Err(
      DocError::build(format!("'{label}' must be an array"))
        .with_cid(&ctx.cid)
        .with_location(field_line(&ctx.tree, &hit), ctx.tree.node(hit.key).column),
    );
  }
  let mut items = Vec::new();
  for item in ctx.tree.items(hit.value) {
    if !utils::is_map(&ctx.tree, item) {
      return Err(
        DocError::build(format!("items of '{label}' must be mappings"))
          .with_cid(&ctx.cid)
          .with_location(ctx.tree.node(item).line, ctx.tree.node(item).column),
      );
    }
    let built = build_from_node::<T>(item, None, ctx)?;
    let mut value = ValueRef::new(built.value, item, ctx.tree.node(item).line);
    value.reference = built.reference;
    items.push(value);
  }
  Ok(Some(wrap(&ctx.tree, &hit, items)))
}

/// Finds `label` under `parent` and builds an open string-keyed mapping
/// of `T`, preserving insertion order.
pub fn extract_map<T: Buildable>(
  label: &str,
  parent: NodeId,
  ctx: &ExtractContext,
) -> Result<Option<NodeRef<LowMap<T>>>, DocError> {
  let Some(hit) = utils::find_key_top(&ctx.tree, parent, label) else {
    return Ok(None);
  };
  if !utils::is_map(&ctx.tree, hit.value) {
    return Err(
      DocError::build(format!("'{label}' must be a mapping"))
        .with_cid(&ctx.cid)
        .with_location(field_line(&ctx.tree, &hit), ctx.tree.node(hit.key).column),
    );
  }
  let map = build_map(hit.value, ctx)?;
  Ok(Some(wrap(&ctx.tree, &hit, map)))
}

/// Builds an open string-keyed mapping of `T` directly from a mapping
/// node, skipping extension keys.
pub fn build_map<T: Buildable>(node: NodeId, ctx: &ExtractContext) -> Result<LowMap<T>, DocError> {
  let mut map = IndexMap::new();
  let pairs: Vec<_> = ctx.tree.pairs(node).collect();
  for (key_node, value_node) in pairs {
    let Some(name) = ctx.tree.scalar(key_node) else {
      continue;
    };
    if name.starts_with("x-") {
      continue;
    }
    let built = build_from_node::<T>(value_node, Some(key_node), ctx)?;
    let mut value = ValueRef::new(built.value, value_node, ctx.tree.node(key_node).line);
    value.reference = built.reference;
    map.insert(
      KeyRef {
        value: name.to_string(),
        key_node,
        line: ctx.tree.node(key_node).line,
      },
      value,
    );
  }
  Ok(map)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  #[derive(Debug)]
  struct Named {
    name: Option<NodeRef<String>>,
  }

  impl Buildable for Named {
    fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
      Ok(Self {
        name: extract_string(&ctx.tree, node, "name"),
      })
    }
  }

  fn ctx(text: &str) -> ExtractContext {
    let tree = Arc::new(YamlTree::parse(text).expect("parse"));
    ExtractContext::standalone("/spec/root.yaml", tree)
  }

  #[test]
  fn scalar_extraction_carries_lines() {
    let ctx = ctx("title: hello\ncount: 3\nflag: true\nratio: 1.5\n");
    let root = ctx.tree.root().expect("root");

    let title = extract_string(&ctx.tree, root, "title").expect("title");
    assert_eq!(title.value, "hello");
    assert_eq!(title.line, 1);
    assert!(title.key_node.is_some());

    assert_eq!(extract_int(&ctx.tree, root, "count").expect("count").value, 3);
    assert!(extract_bool(&ctx.tree, root, "flag").expect("flag").value);
    assert_eq!(extract_float(&ctx.tree, root, "ratio").expect("ratio").value, 1.5);
    assert!(extract_string(&ctx.tree, root, "missing").is_none());
  }

  #[test]
  fn object_extraction_follows_refs() {
    let ctx = ctx("thing:\n  $ref: '#/target'\ntarget:\n  name: resolved\n");
    let root = ctx.tree.root().expect("root");
    let thing = extract_object::<Named>("thing", root, &ctx).expect("ok").expect("some");
    assert_eq!(thing.reference.as_deref(), Some("#/target"));
    assert_eq!(thing.value.name.as_ref().map(|n| n.value.as_str()), Some("resolved"));
  }

  #[test]
  fn unresolvable_ref_is_not_found() {
    let ctx = ctx("thing:\n  $ref: '#/absent'\n");
    let root = ctx.tree.root().expect("root");
    let err = extract_object::<Named>("thing", root, &ctx).expect_err("missing target");
    assert_eq!(err.kind, ErrorKind::NotFound);
  }

  #[test]
  fn array_extraction_rejects_non_map_items() {
    let ctx = ctx("list:\n  - name: a\n  - plain\n");
    let root = ctx.tree.root().expect("root");
    let err = extract_array::<Named>("list", root, &ctx).expect_err("non-map item");
    assert_eq!(err.kind, ErrorKind::BuildError);
  }

  #[test]
  fn map_extraction_preserves_order_and_skips_extensions() {
    let ctx = ctx("things:\n  zeta:\n    name: z\n  x-skip: 1\n  alpha:\n    name: a\n");
    let root = ctx.tree.root().expect("root");
    let map = extract_map::<Named>("things", root, &ctx).expect("ok").expect("some");
    let keys: Vec<_> = map.value.keys().map(|key| key.value.clone()).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
  }

  #[test]
  fn missing_keys_extract_to_none_without_error() {
    let ctx = ctx("a: 1\n");
    let root = ctx.tree.root().expect("root");
    assert!(extract_object::<Named>("absent", root, &ctx).expect("ok").is_none());
    assert!(extract_array::<Named>("absent", root, &ctx).expect("ok").is_none());
    assert!(extract_map::<Named>("absent", root, &ctx).expect("ok").is_none());
  }

  #[test]
  fn extensions_capture_values_and_lines() {
    let ctx = ctx("x-vendor: custom\nplain: 1\nx-count: 2\n");
    let root = ctx.tree.root().expect("root");
    let extensions = extract_extensions(&ctx.tree, root);
    assert_eq!(extensions.len(), 2);
    let vendor = extensions.get("x-vendor").expect("x-vendor");
    assert_eq!(vendor.value, Yaml::String("custom".to_string()));
    assert_eq!(vendor.line, 1);
  }
}
