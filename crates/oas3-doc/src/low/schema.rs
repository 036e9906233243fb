//! Schemas are extracted lazily through proxies: building a schema
//! materializes exactly one level, and every nested schema position holds
//! another proxy. Recursive shapes therefore never recurse at build time;
//! cycles are the cycle detector's concern, not the extractor's.

use yaml_rust2::yaml::Yaml;

use super::{
  Discriminator, Extensions, ExternalDocs, KeyRef, LowMap, NodeRef, ValueRef,
  extract::{
    Buildable, ExtractContext, extract_bool, extract_extensions, extract_float, extract_int, extract_object,
    extract_string, extract_string_vec, extract_value, extract_value_vec,
  },
};
use crate::{
  error::DocError,
  utils,
  yaml::{NodeId, NodeKind},
};

/// `type` in 3.1 may be a single name or a set of names.
#[derive(Debug, Clone)]
pub enum SchemaTypeSet {
  Single(String),
  Multiple(Vec<String>),
}

impl SchemaTypeSet {
  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    match self {
      Self::Single(single) => single == name,
      Self::Multiple(names) => names.iter().any(|candidate| candidate == name),
    }
  }
}

/// `additionalProperties` accepts either a boolean or a schema.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
  Boolean(bool),
  Schema(Box<SchemaProxy>),
}

/// A deferred schema: the node it lives at plus the context needed to
/// build it on demand. Reference proxies keep the raw `$ref` string and
/// resolve only when built.
#[derive(Debug, Clone)]
pub struct SchemaProxy {
  pub node: NodeId,
  pub key_node: Option<NodeId>,
  pub line: u32,
  pub reference: Option<String>,
  ctx: ExtractContext,
}

impl SchemaProxy {
  #[must_use]
  pub fn from_node(node: NodeId, key: Option<NodeId>, ctx: &ExtractContext) -> Self {
    let reference = if ctx.tree.node(node).kind == NodeKind::Mapping {
      utils::find_key_top(&ctx.tree, node, "$ref").and_then(|hit| ctx.tree.scalar(hit.value)).map(str::to_string)
    } else {
      None
    };
    let line = key.map_or_else(|| ctx.tree.node(node).line, |key| ctx.tree.node(key).line);
    Self {
      node,
      key_node: key,
      line,
      reference,
      ctx: ctx.clone(),
    }
  }

  #[must_use]
  pub fn is_reference(&self) -> bool {
    self.reference.is_some()
  }

  /// Materializes one level of the schema. Reference proxies resolve
  /// their target first; nested schema positions come back as proxies.
  pub fn build_schema(&self) -> Result<Schema, DocError> {
    match &self.reference {
      Some(raw) => {
        let (ctx, target) = self.ctx.locate_ref(raw)?;
        Schema::build(target, None, &ctx)
      }
      None => Schema::build(self.node, self.key_node, &self.ctx),
    }
  }
}

impl Buildable for SchemaProxy {
  fn build(node: NodeId, key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    Ok(Self::from_node(node, key, ctx))
  }
}

#[derive(Debug, Clone)]
pub struct Schema {
  pub schema_type: Option<NodeRef<SchemaTypeSet>>,
  pub title: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub format: Option<NodeRef<String>>,
  pub pattern: Option<NodeRef<String>>,
  pub multiple_of: Option<NodeRef<f64>>,
  pub maximum: Option<NodeRef<f64>>,
  pub minimum: Option<NodeRef<f64>>,
  /// Boolean in 3.0, number in 3.1; kept as the raw value.
  pub exclusive_maximum: Option<NodeRef<Yaml>>,
  pub exclusive_minimum: Option<NodeRef<Yaml>>,
  pub max_length: Option<NodeRef<i64>>,
  pub min_length: Option<NodeRef<i64>>,
  pub max_items: Option<NodeRef<i64>>,
  pub min_items: Option<NodeRef<i64>>,
  pub max_properties: Option<NodeRef<i64>>,
  pub min_properties: Option<NodeRef<i64>>,
  pub unique_items: Option<NodeRef<bool>>,
  pub nullable: Option<NodeRef<bool>>,
  pub read_only: Option<NodeRef<bool>>,
  pub write_only: Option<NodeRef<bool>>,
  pub deprecated: Option<NodeRef<bool>>,
  pub required: Option<NodeRef<Vec<ValueRef<String>>>>,
  pub enum_values: Option<NodeRef<Vec<ValueRef<Yaml>>>>,
  pub const_value: Option<NodeRef<Yaml>>,
  pub default: Option<NodeRef<Yaml>>,
  pub example: Option<NodeRef<Yaml>>,
  pub examples: Option<NodeRef<Vec<ValueRef<Yaml>>>>,
  pub properties: Option<NodeRef<LowMap<SchemaProxy>>>,
  pub items: Option<NodeRef<SchemaProxy>>,
  pub additional_properties: Option<NodeRef<AdditionalProperties>>,
  pub one_of: Option<NodeRef<Vec<ValueRef<SchemaProxy>>>>,
  pub any_of: Option<NodeRef<Vec<ValueRef<SchemaProxy>>>>,
  pub all_of: Option<NodeRef<Vec<ValueRef<SchemaProxy>>>>,
  pub not: Option<NodeRef<SchemaProxy>>,
  pub discriminator: Option<NodeRef<Discriminator>>,
  pub external_docs: Option<NodeRef<ExternalDocs>>,
  pub extensions: Extensions,
}

impl Buildable for Schema {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    if tree.node(node).kind != NodeKind::Mapping {
      return Err(
        DocError::build("schema must be a mapping")
          .with_cid(&ctx.cid)
          .with_location(tree.node(node).line, tree.node(node).column),
      );
    }
    Ok(Self {
      schema_type: extract_type(ctx, node),
      title: extract_string(tree, node, "title"),
      description: extract_string(tree, node, "description"),
      format: extract_string(tree, node, "format"),
      pattern: extract_string(tree, node, "pattern"),
      multiple_of: extract_float(tree, node, "multipleOf"),
      maximum: extract_float(tree, node, "maximum"),
      minimum: extract_float(tree, node, "minimum"),
      exclusive_maximum: extract_value(tree, node, "exclusiveMaximum"),
      exclusive_minimum: extract_value(tree, node, "exclusiveMinimum"),
      max_length: extract_int(tree, node, "maxLength"),
      min_length: extract_int(tree, node, "minLength"),
      max_items: extract_int(tree, node, "maxItems"),
      min_items: extract_int(tree, node, "minItems"),
      max_properties: extract_int(tree, node, "maxProperties"),
      min_properties: extract_int(tree, node, "minProperties"),
      unique_items: extract_bool(tree, node, "uniqueItems"),
      nullable: extract_bool(tree, node, "nullable"),
      read_only: extract_bool(tree, node, "readOnly"),
      write_only: extract_bool(tree, node, "writeOnly"),
      deprecated: extract_bool(tree, node, "deprecated"),
      required: extract_string_vec(tree, node, "required"),
      enum_values: extract_value_vec(tree, node, "enum"),
      const_value: extract_value(tree, node, "const"),
      default: extract_value(tree, node, "default"),
      example: extract_value(tree, node, "example"),
      examples: extract_value_vec(tree, node, "examples"),
      properties: extract_proxy_map(ctx, node, "properties"),
      items: extract_proxy(ctx, node, "items"),
      additional_properties: extract_additional_properties(ctx, node),
      one_of: extract_proxy_vec(ctx, node, "oneOf"),
      any_of: extract_proxy_vec(ctx, node, "anyOf"),
      all_of: extract_proxy_vec(ctx, node, "allOf"),
      not: extract_proxy(ctx, node, "not"),
      discriminator: extract_object("discriminator", node, ctx)?,
      external_docs: extract_object("externalDocs", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

fn extract_type(ctx: &ExtractContext, node: NodeId) -> Option<NodeRef<SchemaTypeSet>> {
  let tree = &ctx.tree;
  let hit = utils::find_key_top(tree, node, "type")?;
  let line = tree.node(hit.key).line;
  let value = match tree.node(hit.value).kind {
    NodeKind::Scalar => SchemaTypeSet::Single(tree.scalar(hit.value)?.to_string()),
    NodeKind::Sequence => SchemaTypeSet::Multiple(
      tree.items(hit.value).filter_map(|item| tree.scalar(item).map(str::to_string)).collect(),
    ),
    NodeKind::Mapping => return None,
  };
  Some(NodeRef::new(value, Some(hit.key), Some(hit.value), line))
}

fn extract_proxy(ctx: &ExtractContext, node: NodeId, label: &str) -> Option<NodeRef<SchemaProxy>> {
  let hit = utils::find_key_top(&ctx.tree, node, label)?;
  let proxy = SchemaProxy::from_node(hit.value, Some(hit.key), ctx);
  let mut wrapped = NodeRef::new(proxy, Some(hit.key), Some(hit.value), ctx.tree.node(hit.key).line);
  wrapped.reference = wrapped.value.reference.clone();
  Some(wrapped)
}

fn extract_proxy_vec(ctx: &ExtractContext, node: NodeId, label: &str) -> Option<NodeRef<Vec<ValueRef<SchemaProxy>>>> {
  let tree = &ctx.tree;
  let hit = utils::find_key_top(tree, node, label)?;
  if !utils::is_array(tree, hit.value) {
    return None;
  }
  let items = tree
    .items(hit.value)
    .map(|item| {
      let proxy = SchemaProxy::from_node(item, None, ctx);
      let mut value = ValueRef::new(proxy, item, tree.node(item).line);
      value.reference = value.value.reference.clone();
      value
    })
    .collect();
  Some(NodeRef::new(items, Some(hit.key), Some(hit.value), tree.node(hit.key).line))
}

fn extract_proxy_map(ctx: &ExtractContext, node: NodeId, label: &str) -> Option<NodeRef<LowMap<SchemaProxy>>> {
  let tree = &ctx.tree;
  let hit = utils::find_key_top(tree, node, label)?;
  if !utils::is_map(tree, hit.value) {
    return None;
  }
  let mut map = LowMap::new();
  for (key_node, value_node) in tree.pairs(hit.value) {
    let Some(name) = tree.scalar(key_node) else {
      continue;
    };
    let proxy = SchemaProxy::from_node(value_node, Some(key_node), ctx);
    let mut value = ValueRef::new(proxy, value_node, tree.node(key_node).line);
    value.reference = value.value.reference.clone();
    map.insert(
      KeyRef {
        value: name.to_string(),
        key_node,
        line: tree.node(key_node).line,
      },
      value,
    );
  }
  Some(NodeRef::new(map, Some(hit.key), Some(hit.value), tree.node(hit.key).line))
}

fn extract_additional_properties(ctx: &ExtractContext, node: NodeId) -> Option<NodeRef<AdditionalProperties>> {
  let tree = &ctx.tree;
  let hit = utils::find_key_top(tree, node, "additionalProperties")?;
  let line = tree.node(hit.key).line;
  let value = match tree.node(hit.value).kind {
    NodeKind::Scalar => AdditionalProperties::Boolean(tree.scalar(hit.value) == Some("true")),
    NodeKind::Mapping => AdditionalProperties::Schema(Box::new(SchemaProxy::from_node(hit.value, Some(hit.key), ctx))),
    NodeKind::Sequence => return None,
  };
  Some(NodeRef::new(value, Some(hit.key), Some(hit.value), line))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  fn schema_ctx(text: &str) -> (ExtractContext, NodeId) {
    let tree = Arc::new(YamlTree::parse(text).expect("parse"));
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    (ctx, root)
  }

  #[test]
  fn builds_one_level_with_nested_proxies() {
    let (ctx, root) = schema_ctx(
      "type: object\nrequired:\n  - name\nproperties:\n  name:\n    type: string\n  friend:\n    $ref: '#/properties/name'\n",
    );
    let schema = Schema::build(root, None, &ctx).expect("schema");
    assert!(schema.schema_type.as_ref().is_some_and(|t| t.value.contains("object")));
    assert_eq!(schema.required.as_ref().map(|r| r.value.len()), Some(1));

    let properties = schema.properties.expect("properties");
    let name = properties.value.get("name").expect("name");
    assert!(!name.value.is_reference());
    let built = name.value.build_schema().expect("build");
    assert!(built.schema_type.as_ref().is_some_and(|t| t.value.contains("string")));

    let friend = properties.value.get("friend").expect("friend");
    assert!(friend.value.is_reference());
  }

  #[test]
  fn recursive_schema_builds_without_overflow() {
    let (ctx, root) = schema_ctx("type: object\nproperties:\n  next:\n    $ref: '#/'\n");
    let schema = Schema::build(root, None, &ctx).expect("schema");
    let next = schema.properties.expect("properties").value.get("next").expect("next").value.clone();
    assert!(next.is_reference());
  }

  #[test]
  fn composition_keywords_become_proxy_vectors() {
    let (ctx, root) = schema_ctx("oneOf:\n  - type: string\n  - type: integer\n");
    let schema = Schema::build(root, None, &ctx).expect("schema");
    let one_of = schema.one_of.expect("oneOf");
    assert_eq!(one_of.value.len(), 2);
    assert!(one_of.value[0].value.build_schema().is_ok());
  }

  #[test]
  fn additional_properties_accepts_bool_or_schema() {
    let (ctx, root) = schema_ctx("additionalProperties: false\n");
    let schema = Schema::build(root, None, &ctx).expect("schema");
    assert!(matches!(
      schema.additional_properties.expect("ap").value,
      AdditionalProperties::Boolean(false)
    ));

    let (ctx, root) = schema_ctx("additionalProperties:\n  type: string\n");
    let schema = Schema::build(root, None, &ctx).expect("schema");
    assert!(matches!(
      schema.additional_properties.expect("ap").value,
      AdditionalProperties::Schema(_)
    ));
  }

  #[test]
  fn numeric_constraints_extract() {
    let (ctx, root) = schema_ctx("type: integer\nminimum: 0\nmaximum: 10\nmaxLength: 5\n");
    let schema = Schema::build(root, None, &ctx).expect("schema");
    assert_eq!(schema.minimum.map(|m| m.value), Some(0.0));
    assert_eq!(schema.maximum.map(|m| m.value), Some(10.0));
    assert_eq!(schema.max_length.map(|m| m.value), Some(5));
  }
}
