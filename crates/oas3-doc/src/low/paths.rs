use super::{
  Extensions, LowMap, NodeRef, Operation, Parameter, Server, ValueRef,
  extract::{
    Buildable, ExtractContext, build_map, extract_array, extract_extensions, extract_object, extract_string,
  },
};
use crate::{error::DocError, utils, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct PathItem {
  pub summary: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub get: Option<NodeRef<Operation>>,
  pub put: Option<NodeRef<Operation>>,
  pub post: Option<NodeRef<Operation>>,
  pub delete: Option<NodeRef<Operation>>,
  pub options: Option<NodeRef<Operation>>,
  pub head: Option<NodeRef<Operation>>,
  pub patch: Option<NodeRef<Operation>>,
  pub trace: Option<NodeRef<Operation>>,
  pub servers: Option<NodeRef<Vec<ValueRef<Server>>>>,
  pub parameters: Option<NodeRef<Vec<ValueRef<Parameter>>>>,
  pub extensions: Extensions,
}

impl Buildable for PathItem {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      summary: extract_string(tree, node, "summary"),
      description: extract_string(tree, node, "description"),
      get: extract_object("get", node, ctx)?,
      put: extract_object("put", node, ctx)?,
      post: extract_object("post", node, ctx)?,
      delete: extract_object("delete", node, ctx)?,
      options: extract_object("options", node, ctx)?,
      head: extract_object("head", node, ctx)?,
      patch: extract_object("patch", node, ctx)?,
      trace: extract_object("trace", node, ctx)?,
      servers: extract_array("servers", node, ctx)?,
      parameters: extract_array("parameters", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

/// The top-level `paths` container: path-template keys in document order.
#[derive(Debug, Clone, Default)]
pub struct Paths {
  pub path_items: LowMap<PathItem>,
  pub extensions: Extensions,
}

impl Buildable for Paths {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    if !utils::is_map(&ctx.tree, node) {
      return Err(
        DocError::build("'paths' must be a mapping")
          .with_cid(&ctx.cid)
          .with_location(ctx.tree.node(node).line, ctx.tree.node(node).column),
      );
    }
    Ok(Self {
      path_items: build_map(node, ctx)?,
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
  fn paths_preserve_document_order() {
    let tree = Arc::new(
      YamlTree::parse(
        "/pets:\n  get:\n    responses:\n      '200':\n        description: ok\n/owners:\n  post:\n    responses:\n      '201':\n        description: created\n",
      )
      .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let paths = Paths::build(root, None, &ctx).expect("paths");

    let keys: Vec<_> = paths.path_items.keys().map(|key| key.value.clone()).collect();
    assert_eq!(keys, vec!["/pets", "/owners"]);
    let pets = paths.path_items.get("/pets").expect("/pets");
    assert!(pets.value.get.is_some());
    assert!(pets.value.post.is_none());
  }

  #[test]
  fn path_item_collects_operations_and_parameters() {
    let tree = Arc::new(
      YamlTree::parse(
        "summary: pets\nparameters:\n  - name: tenant\n    in: header\nget:\n  operationId: list\n  responses:\n    '200':\n      description: ok\ndelete:\n  operationId: purge\n  responses:\n    '204':\n      description: emptied\n",
      )
      .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let item = PathItem::build(root, None, &ctx).expect("path item");

    assert!(item.get.is_some());
    assert!(item.delete.is_some());
    assert_eq!(item.parameters.as_ref().map(|p| p.value.len()), Some(1));
  }
}
