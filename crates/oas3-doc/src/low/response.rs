use super::{
  Extensions, Header, Link, LowMap, MediaType, NodeRef,
  extract::{Buildable, ExtractContext, build_map, extract_extensions, extract_map, extract_object, extract_string},
};
use crate::{error::DocError, utils, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct Response {
  pub description: Option<NodeRef<String>>,
  pub headers: Option<NodeRef<LowMap<Header>>>,
  pub content: Option<NodeRef<LowMap<MediaType>>>,
  pub links: Option<NodeRef<LowMap<Link>>>,
  pub extensions: Extensions,
}

impl Buildable for Response {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      description: extract_string(tree, node, "description"),
      headers: extract_map("headers", node, ctx)?,
      content: extract_map("content", node, ctx)?,
      links: extract_map("links", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

/// The `responses` container of an operation: status-code keys in
/// document order plus the optional `default`.
#[derive(Debug, Clone, Default)]
pub struct Responses {
  pub codes: LowMap<Response>,
  pub default: Option<NodeRef<Response>>,
  pub extensions: Extensions,
}

impl Buildable for Responses {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    if !utils::is_map(&ctx.tree, node) {
      return Err(
        DocError::build("'responses' must be a mapping")
          .with_cid(&ctx.cid)
          .with_location(ctx.tree.node(node).line, ctx.tree.node(node).column),
      );
    }
    let mut codes: LowMap<Response> = build_map(node, ctx)?;
    let default = extract_object("default", node, ctx)?;
    codes.shift_remove("default");
    Ok(Self {
      codes,
      default,
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
  fn responses_split_codes_and_default() {
    let tree = Arc::new(
      YamlTree::parse(
        "'200':\n  description: ok\n'404':\n  description: gone\ndefault:\n  description: fallback\n",
      )
      .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let responses = Responses::build(root, None, &ctx).expect("responses");

    let codes: Vec<_> = responses.codes.keys().map(|key| key.value.clone()).collect();
    assert_eq!(codes, vec!["200", "404"]);
    assert_eq!(
      responses.default.as_ref().and_then(|d| d.value.description.as_ref()).map(|d| d.value.as_str()),
      Some("fallback")
    );
  }

  #[test]
  fn response_extracts_headers_and_content() {
    let tree = Arc::new(
      YamlTree::parse(
        "description: ok\nheaders:\n  X-Rate-Limit:\n    schema:\n      type: integer\ncontent:\n  application/json:\n    schema:\n      type: object\n",
      )
      .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let response = Response::build(root, None, &ctx).expect("response");

    assert!(response.headers.expect("headers").value.get("X-Rate-Limit").is_some());
    assert!(response.content.expect("content").value.get("application/json").is_some());
  }
}
