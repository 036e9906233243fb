use yaml_rust2::yaml::Yaml;

use super::{
  Example, Extensions, LowMap, MediaType, NodeRef, SchemaProxy,
  extract::{
    Buildable, ExtractContext, extract_bool, extract_extensions, extract_map, extract_string, extract_value,
  },
  schema,
};
use crate::{error::DocError, utils, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct Parameter {
  pub name: Option<NodeRef<String>>,
  pub location: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub required: Option<NodeRef<bool>>,
  pub deprecated: Option<NodeRef<bool>>,
  pub allow_empty_value: Option<NodeRef<bool>>,
  pub style: Option<NodeRef<String>>,
  pub explode: Option<NodeRef<bool>>,
  pub allow_reserved: Option<NodeRef<bool>>,
  pub schema: Option<NodeRef<SchemaProxy>>,
  pub example: Option<NodeRef<Yaml>>,
  pub examples: Option<NodeRef<LowMap<Example>>>,
  pub content: Option<NodeRef<LowMap<MediaType>>>,
  pub extensions: Extensions,
}

impl Buildable for Parameter {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      name: extract_string(tree, node, "name"),
      location: extract_string(tree, node, "in"),
      description: extract_string(tree, node, "description"),
      required: extract_bool(tree, node, "required"),
      deprecated: extract_bool(tree, node, "deprecated"),
      allow_empty_value: extract_bool(tree, node, "allowEmptyValue"),
      style: extract_string(tree, node, "style"),
      explode: extract_bool(tree, node, "explode"),
      allow_reserved: extract_bool(tree, node, "allowReserved"),
      schema: extract_schema_proxy(ctx, node),
      example: extract_value(tree, node, "example"),
      examples: extract_map("examples", node, ctx)?,
      content: extract_map("content", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

/// A response or encoding header: a parameter without `name` and `in`.
#[derive(Debug, Clone, Default)]
pub struct Header {
  pub description: Option<NodeRef<String>>,
  pub required: Option<NodeRef<bool>>,
  pub deprecated: Option<NodeRef<bool>>,
  pub allow_empty_value: Option<NodeRef<bool>>,
  pub style: Option<NodeRef<String>>,
  pub explode: Option<NodeRef<bool>>,
  pub allow_reserved: Option<NodeRef<bool>>,
  pub schema: Option<NodeRef<SchemaProxy>>,
  pub example: Option<NodeRef<Yaml>>,
  pub examples: Option<NodeRef<LowMap<Example>>>,
  pub content: Option<NodeRef<LowMap<MediaType>>>,
  pub extensions: Extensions,
}

impl Buildable for Header {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      description: extract_string(tree, node, "description"),
      required: extract_bool(tree, node, "required"),
      deprecated: extract_bool(tree, node, "deprecated"),
      allow_empty_value: extract_bool(tree, node, "allowEmptyValue"),
      style: extract_string(tree, node, "style"),
      explode: extract_bool(tree, node, "explode"),
      allow_reserved: extract_bool(tree, node, "allowReserved"),
      schema: extract_schema_proxy(ctx, node),
      example: extract_value(tree, node, "example"),
      examples: extract_map("examples", node, ctx)?,
      content: extract_map("content", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

pub(super) fn extract_schema_proxy(ctx: &ExtractContext, node: NodeId) -> Option<NodeRef<SchemaProxy>> {
  let hit = utils::find_key_top(&ctx.tree, node, "schema")?;
  let proxy = schema::SchemaProxy::from_node(hit.value, Some(hit.key), ctx);
  let mut wrapped = NodeRef::new(proxy, Some(hit.key), Some(hit.value), ctx.tree.node(hit.key).line);
  wrapped.reference = wrapped.value.reference.clone();
  Some(wrapped)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  #[test]
  fn parameter_extracts_schema_and_flags() {
    let tree = Arc::new(
      YamlTree::parse("name: limit\nin: query\nrequired: true\nschema:\n  type: integer\n").expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let parameter = Parameter::build(root, None, &ctx).expect("parameter");

    assert_eq!(parameter.name.as_ref().map(|n| n.value.as_str()), Some("limit"));
    assert_eq!(parameter.location.as_ref().map(|l| l.value.as_str()), Some("query"));
    assert_eq!(parameter.required.as_ref().map(|r| r.value), Some(true));
    let schema = parameter.schema.expect("schema").value.build_schema().expect("build");
    assert!(schema.schema_type.as_ref().is_some_and(|t| t.value.contains("integer")));
  }
}
