use super::{
  Extensions, LowMap, NodeRef, ValueRef,
  extract::{Buildable, ExtractContext, extract_extensions, extract_map, extract_string, extract_string_vec},
};
use crate::{error::DocError, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct ServerVariable {
  pub enum_values: Option<NodeRef<Vec<ValueRef<String>>>>,
  pub default: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Buildable for ServerVariable {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      enum_values: extract_string_vec(tree, node, "enum"),
      default: extract_string(tree, node, "default"),
      description: extract_string(tree, node, "description"),
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct Server {
  pub url: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub variables: Option<NodeRef<LowMap<ServerVariable>>>,
  pub extensions: Extensions,
}

impl Buildable for Server {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      url: extract_string(tree, node, "url"),
      description: extract_string(tree, node, "description"),
      variables: extract_map("variables", node, ctx)?,
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
  fn server_extracts_variables() {
    let tree = Arc::new(
      YamlTree::parse("url: https://{env}.example.com\nvariables:\n  env:\n    default: prod\n    enum:\n      - prod\n      - dev\n").expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let server = Server::build(root, None, &ctx).expect("server");

    assert_eq!(server.url.as_ref().map(|u| u.value.as_str()), Some("https://{env}.example.com"));
    let variables = server.variables.expect("variables");
    let env = variables.value.get("env").expect("env");
    assert_eq!(env.value.default.as_ref().map(|d| d.value.as_str()), Some("prod"));
    assert_eq!(env.value.enum_values.as_ref().map(|e| e.value.len()), Some(2));
  }
}
