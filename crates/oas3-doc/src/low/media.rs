use yaml_rust2::yaml::Yaml;

use super::{
  Example, Extensions, Header, LowMap, NodeRef, SchemaProxy,
  extract::{Buildable, ExtractContext, extract_bool, extract_extensions, extract_map, extract_string, extract_value},
  parameter::extract_schema_proxy,
};
use crate::{error::DocError, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct Encoding {
  pub content_type: Option<NodeRef<String>>,
  pub headers: Option<NodeRef<LowMap<Header>>>,
  pub style: Option<NodeRef<String>>,
  pub explode: Option<NodeRef<bool>>,
  pub allow_reserved: Option<NodeRef<bool>>,
  pub extensions: Extensions,
}

impl Buildable for Encoding {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      content_type: extract_string(tree, node, "contentType"),
      headers: extract_map("headers", node, ctx)?,
      style: extract_string(tree, node, "style"),
      explode: extract_bool(tree, node, "explode"),
      allow_reserved: extract_bool(tree, node, "allowReserved"),
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct MediaType {
  pub schema: Option<NodeRef<SchemaProxy>>,
  pub example: Option<NodeRef<Yaml>>,
  pub examples: Option<NodeRef<LowMap<Example>>>,
  pub encoding: Option<NodeRef<LowMap<Encoding>>>,
  pub extensions: Extensions,
}

impl Buildable for MediaType {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      schema: extract_schema_proxy(ctx, node),
      example: extract_value(tree, node, "example"),
      examples: extract_map("examples", node, ctx)?,
      encoding: extract_map("encoding", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  #[test]
  fn media_type_extracts_schema_and_encoding() {
    let tree = Arc::new(
      YamlTree::parse(
        "schema:\n  type: object\nencoding:\n  avatar:\n    contentType: image/png\n    explode: true\n",
      )
      .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let media = MediaType::build(root, None, &ctx).expect("media type");

    assert!(media.schema.is_some());
    let encoding = media.encoding.expect("encoding");
    let avatar = encoding.value.get("avatar").expect("avatar");
    assert_eq!(avatar.value.content_type.as_ref().map(|c| c.value.as_str()), Some("image/png"));
    assert_eq!(avatar.value.explode.as_ref().map(|e| e.value), Some(true));
  }
}
