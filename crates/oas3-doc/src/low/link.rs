use yaml_rust2::yaml::Yaml;

use super::{
  Extensions, LowMap, NodeRef, PathItem, Server,
  extract::{
    Buildable, ExtractContext, build_map, extract_extensions, extract_object, extract_string, extract_value,
  },
};
use crate::{error::DocError, utils, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct Link {
  pub operation_ref: Option<NodeRef<String>>,
  pub operation_id: Option<NodeRef<String>>,
  pub parameters: Option<NodeRef<Yaml>>,
  pub request_body: Option<NodeRef<Yaml>>,
  pub description: Option<NodeRef<String>>,
  pub server: Option<NodeRef<Server>>,
  pub extensions: Extensions,
}

impl Buildable for Link {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      operation_ref: extract_string(tree, node, "operationRef"),
      operation_id: extract_string(tree, node, "operationId"),
      parameters: extract_value(tree, node, "parameters"),
      request_body: extract_value(tree, node, "requestBody"),
      description: extract_string(tree, node, "description"),
      server: extract_object("server", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

/// A callback: runtime-expression keys mapping to path items.
#[derive(Debug, Clone, Default)]
pub struct Callback {
  pub expressions: LowMap<PathItem>,
  pub extensions: Extensions,
}

impl Buildable for Callback {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    if !utils::is_map(&ctx.tree, node) {
      return Err(
        DocError::build("callback must be a mapping")
          .with_cid(&ctx.cid)
          .with_location(ctx.tree.node(node).line, ctx.tree.node(node).column),
      );
    }
    Ok(Self {
      expressions: build_map(node, ctx)?,
      extensions: extract_extensions(&ctx.tree, node),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  #[test]
  fn link_extracts_operation_target() {
    let tree = Arc::new(
      YamlTree::parse("operationId: getUser\nparameters:\n  userId: $response.body#/id\n").expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let link = Link::build(root, None, &ctx).expect("link");
    assert_eq!(link.operation_id.as_ref().map(|o| o.value.as_str()), Some("getUser"));
    assert!(link.parameters.is_some());
  }

  #[test]
  fn callback_keys_are_runtime_expressions() {
    let tree = Arc::new(
      YamlTree::parse("'{$request.body#/url}':\n  post:\n    responses:\n      '200':\n        description: ok\n")
        .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let callback = Callback::build(root, None, &ctx).expect("callback");
    assert_eq!(callback.expressions.len(), 1);
    let item = callback.expressions.get("{$request.body#/url}").expect("expression");
    assert!(item.value.post.is_some());
  }
}
