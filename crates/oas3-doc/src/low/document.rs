use super::{
  Components, Extensions, ExternalDocs, Info, LowMap, NodeRef, PathItem, Paths, SecurityRequirement, Server, Tag,
  ValueRef,
};

/// The low-level document: the root of the parsed model, every field
/// carrying its source nodes.
#[derive(Debug, Clone)]
pub struct Document {
  pub version: NodeRef<String>,
  pub info: Option<NodeRef<Info>>,
  pub servers: Option<NodeRef<Vec<ValueRef<Server>>>>,
  pub tags: Option<NodeRef<Vec<ValueRef<Tag>>>>,
  pub components: Option<NodeRef<Components>>,
  pub security: Option<NodeRef<Vec<ValueRef<SecurityRequirement>>>>,
  pub external_docs: Option<NodeRef<ExternalDocs>>,
  pub paths: Option<NodeRef<Paths>>,
  pub webhooks: Option<NodeRef<LowMap<PathItem>>>,
  pub json_schema_dialect: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Document {
  #[must_use]
  pub fn new(version: NodeRef<String>) -> Self {
    Self {
      version,
      info: None,
      servers: None,
      tags: None,
      components: None,
      security: None,
      external_docs: None,
      paths: None,
      webhooks: None,
      json_schema_dialect: None,
      extensions: Extensions::new(),
    }
  }
}
