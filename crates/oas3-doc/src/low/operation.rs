use super::{
  Callback, Extensions, ExternalDocs, LowMap, NodeRef, Parameter, RequestBody, Responses, SecurityRequirement,
  Server, ValueRef,
  extract::{
    Buildable, ExtractContext, extract_array, extract_bool, extract_extensions, extract_map, extract_object,
    extract_string, extract_string_vec,
  },
};
use crate::{error::DocError, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct Operation {
  pub tags: Option<NodeRef<Vec<ValueRef<String>>>>,
  pub summary: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub external_docs: Option<NodeRef<ExternalDocs>>,
  pub operation_id: Option<NodeRef<String>>,
  pub parameters: Option<NodeRef<Vec<ValueRef<Parameter>>>>,
  pub request_body: Option<NodeRef<RequestBody>>,
  pub responses: Option<NodeRef<Responses>>,
  pub callbacks: Option<NodeRef<LowMap<Callback>>>,
  pub deprecated: Option<NodeRef<bool>>,
  pub security: Option<NodeRef<Vec<ValueRef<SecurityRequirement>>>>,
  pub servers: Option<NodeRef<Vec<ValueRef<Server>>>>,
  pub extensions: Extensions,
}

impl Buildable for Operation {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      tags: extract_string_vec(tree, node, "tags"),
      summary: extract_string(tree, node, "summary"),
      description: extract_string(tree, node, "description"),
      external_docs: extract_object("externalDocs", node, ctx)?,
      operation_id: extract_string(tree, node, "operationId"),
      parameters: extract_array("parameters", node, ctx)?,
      request_body: extract_object("requestBody", node, ctx)?,
      responses: extract_object("responses", node, ctx)?,
      callbacks: extract_map("callbacks", node, ctx)?,
      deprecated: extract_bool(tree, node, "deprecated"),
      security: extract_array("security", node, ctx)?,
      servers: extract_array("servers", node, ctx)?,
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
  fn operation_extracts_all_sections() {
    let tree = Arc::new(
      YamlTree::parse(
        "operationId: listPets\ntags:\n  - pets\nparameters:\n  - name: limit\n    in: query\nresponses:\n  '200':\n    description: ok\nsecurity:\n  - api_key: []\n",
      )
      .expect("parse"),
    );
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    let operation = Operation::build(root, None, &ctx).expect("operation");

    assert_eq!(operation.operation_id.as_ref().map(|o| o.value.as_str()), Some("listPets"));
    assert_eq!(operation.tags.as_ref().map(|t| t.value.len()), Some(1));
    assert_eq!(operation.parameters.as_ref().map(|p| p.value.len()), Some(1));
    let responses = operation.responses.expect("responses");
    assert!(responses.value.codes.get("200").is_some());
    assert_eq!(operation.security.as_ref().map(|s| s.value.len()), Some(1));
  }
}
