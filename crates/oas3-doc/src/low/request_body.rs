use super::{
  Extensions, LowMap, MediaType, NodeRef,
  extract::{Buildable, ExtractContext, extract_bool, extract_extensions, extract_map, extract_string},
};
use crate::{error::DocError, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct RequestBody {
  pub description: Option<NodeRef<String>>,
  pub content: Option<NodeRef<LowMap<MediaType>>>,
  pub required: Option<NodeRef<bool>>,
  pub extensions: Extensions,
}

impl Buildable for RequestBody {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      description: extract_string(tree, node, "description"),
      content: extract_map("content", node, ctx)?,
      required: extract_bool(tree, node, "required"),
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
  fn request_body_extracts_content_by_media_type() {
    let tree = Arc::new(
      YamlTree::parse("description: payload\nrequired: true\ncontent:\n  application/json:\n    schema:\n      type: object\n")
        .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let body = RequestBody::build(root, None, &ctx).expect("request body");

    assert_eq!(body.required.as_ref().map(|r| r.value), Some(true));
    let content = body.content.expect("content");
    assert!(content.value.get("application/json").is_some());
  }
}
