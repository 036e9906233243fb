use super::{
  Callback, Example, Extensions, Header, Link, LowMap, NodeRef, Parameter, RequestBody, Response, SchemaProxy,
  SecurityScheme,
  extract::{Buildable, ExtractContext, extract_extensions, extract_map},
};
use crate::{error::DocError, yaml::NodeId};

/// The `components` container: every reusable collection, keyed by
/// component name in document order.
#[derive(Debug, Clone, Default)]
pub struct Components {
  pub schemas: Option<NodeRef<LowMap<SchemaProxy>>>,
  pub responses: Option<NodeRef<LowMap<Response>>>,
  pub parameters: Option<NodeRef<LowMap<Parameter>>>,
  pub examples: Option<NodeRef<LowMap<Example>>>,
  pub request_bodies: Option<NodeRef<LowMap<RequestBody>>>,
  pub headers: Option<NodeRef<LowMap<Header>>>,
  pub security_schemes: Option<NodeRef<LowMap<SecurityScheme>>>,
  pub links: Option<NodeRef<LowMap<Link>>>,
  pub callbacks: Option<NodeRef<LowMap<Callback>>>,
  pub extensions: Extensions,
}

impl Buildable for Components {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    Ok(Self {
      schemas: extract_map("schemas", node, ctx)?,
      responses: extract_map("responses", node, ctx)?,
      parameters: extract_map("parameters", node, ctx)?,
      examples: extract_map("examples", node, ctx)?,
      request_bodies: extract_map("requestBodies", node, ctx)?,
      headers: extract_map("headers", node, ctx)?,
      security_schemes: extract_map("securitySchemes", node, ctx)?,
      links: extract_map("links", node, ctx)?,
      callbacks: extract_map("callbacks", node, ctx)?,
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
  fn components_extract_each_collection() {
    let tree = Arc::new(
      YamlTree::parse(
        "schemas:\n  Pet:\n    type: object\nparameters:\n  Limit:\n    name: limit\n    in: query\nsecuritySchemes:\n  key:\n    type: apiKey\n    name: X-Key\n    in: header\n",
      )
      .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let components = Components::build(root, None, &ctx).expect("components");

    assert!(components.schemas.as_ref().is_some_and(|s| s.value.get("Pet").is_some()));
    assert!(components.parameters.as_ref().is_some_and(|p| p.value.get("Limit").is_some()));
    assert!(components.security_schemes.as_ref().is_some_and(|s| s.value.get("key").is_some()));
    assert!(components.responses.is_none());
  }
}
