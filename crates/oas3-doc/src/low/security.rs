use super::{
  Extensions, KeyRef, LowMap, NodeRef, ValueRef,
  extract::{Buildable, ExtractContext, extract_extensions, extract_object, extract_string},
};
use crate::{error::DocError, utils, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct OAuthFlow {
  pub authorization_url: Option<NodeRef<String>>,
  pub token_url: Option<NodeRef<String>>,
  pub refresh_url: Option<NodeRef<String>>,
  pub scopes: Option<NodeRef<LowMap<String>>>,
  pub extensions: Extensions,
}

impl Buildable for OAuthFlow {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      authorization_url: extract_string(tree, node, "authorizationUrl"),
      token_url: extract_string(tree, node, "tokenUrl"),
      refresh_url: extract_string(tree, node, "refreshUrl"),
      scopes: extract_scalar_map(ctx, node, "scopes"),
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct OAuthFlows {
  pub implicit: Option<NodeRef<OAuthFlow>>,
  pub password: Option<NodeRef<OAuthFlow>>,
  pub client_credentials: Option<NodeRef<OAuthFlow>>,
  pub authorization_code: Option<NodeRef<OAuthFlow>>,
  pub extensions: Extensions,
}

impl Buildable for OAuthFlows {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    Ok(Self {
      implicit: extract_object("implicit", node, ctx)?,
      password: extract_object("password", node, ctx)?,
      client_credentials: extract_object("clientCredentials", node, ctx)?,
      authorization_code: extract_object("authorizationCode", node, ctx)?,
      extensions: extract_extensions(&ctx.tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct SecurityScheme {
  pub scheme_type: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub name: Option<NodeRef<String>>,
  pub location: Option<NodeRef<String>>,
  pub scheme: Option<NodeRef<String>>,
  pub bearer_format: Option<NodeRef<String>>,
  pub flows: Option<NodeRef<OAuthFlows>>,
  pub open_id_connect_url: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Buildable for SecurityScheme {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      scheme_type: extract_string(tree, node, "type"),
      description: extract_string(tree, node, "description"),
      name: extract_string(tree, node, "name"),
      location: extract_string(tree, node, "in"),
      scheme: extract_string(tree, node, "scheme"),
      bearer_format: extract_string(tree, node, "bearerFormat"),
      flows: extract_object("flows", node, ctx)?,
      open_id_connect_url: extract_string(tree, node, "openIdConnectUrl"),
      extensions: extract_extensions(tree, node),
    })
  }
}

/// One security requirement: scheme names mapping to scope lists.
#[derive(Debug, Clone, Default)]
pub struct SecurityRequirement {
  pub requirements: LowMap<Vec<ValueRef<String>>>,
}

impl Buildable for SecurityRequirement {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    let mut requirements = LowMap::new();
    for (key_node, value_node) in tree.pairs(node) {
      let Some(name) = tree.scalar(key_node) else {
        continue;
      };
      let scopes = tree
        .items(value_node)
        .filter_map(|item| {
          tree
            .scalar(item)
            .map(|text| ValueRef::new(text.to_string(), item, tree.node(item).line))
        })
        .collect();
      requirements.insert(
        KeyRef {
          value: name.to_string(),
          key_node,
          line: tree.node(key_node).line,
        },
        ValueRef::new(scopes, value_node, tree.node(key_node).line),
      );
    }
    Ok(Self { requirements })
  }
}

fn extract_scalar_map(ctx: &ExtractContext, node: NodeId, label: &str) -> Option<NodeRef<LowMap<String>>> {
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
    let value = tree.scalar(value_node).unwrap_or_default().to_string();
    map.insert(
      KeyRef {
        value: name.to_string(),
        key_node,
        line: tree.node(key_node).line,
      },
      ValueRef::new(value, value_node, tree.node(key_node).line),
    );
  }
  Some(NodeRef::new(map, Some(hit.key), Some(hit.value), tree.node(hit.key).line))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  fn ctx(text: &str) -> (ExtractContext, NodeId) {
    let tree = Arc::new(YamlTree::parse(text).expect("parse"));
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    (ctx, root)
  }

  #[test]
  fn security_scheme_extracts_oauth_flows() {
    let (ctx, root) = ctx(
      "type: oauth2\nflows:\n  authorizationCode:\n    authorizationUrl: https://example.com/auth\n    tokenUrl: https://example.com/token\n    scopes:\n      read: read access\n",
    );
    let scheme = SecurityScheme::build(root, None, &ctx).expect("scheme");
    assert_eq!(scheme.scheme_type.as_ref().map(|t| t.value.as_str()), Some("oauth2"));
    let flows = scheme.flows.expect("flows");
    let code = flows.value.authorization_code.expect("authorizationCode");
    let scopes = code.value.scopes.expect("scopes");
    assert_eq!(scopes.value.get("read").map(|s| s.value.as_str()), Some("read access"));
  }

  #[test]
  fn security_requirement_maps_scheme_to_scopes() {
    let (ctx, root) = ctx("oauth:\n  - read\n  - write\n");
    let requirement = SecurityRequirement::build(root, None, &ctx).expect("requirement");
    let scopes = requirement.requirements.get("oauth").expect("oauth");
    let values: Vec<_> = scopes.value.iter().map(|scope| scope.value.clone()).collect();
    assert_eq!(values, vec!["read", "write"]);
  }
}
