use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  Callback, ExternalDocs, NodeBuilder, Parameter, Renderable, RequestBody, Responses, SecurityRequirement, Server,
  lift_bool, lift_extensions, lift_map, lift_object, lift_str_vec, lift_string, lift_vec, line_of,
  node_builder::ref_value,
};
use crate::low;

#[derive(Debug, Clone, Default)]
pub struct Operation {
  pub tags: Vec<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub external_docs: Option<ExternalDocs>,
  pub operation_id: Option<String>,
  pub parameters: Vec<Parameter>,
  pub request_body: Option<RequestBody>,
  pub responses: Option<Responses>,
  pub callbacks: IndexMap<String, Callback>,
  pub deprecated: Option<bool>,
  pub security: Vec<SecurityRequirement>,
  pub servers: Vec<Server>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Operation>>,
}

impl Operation {
  #[must_use]
  pub fn from_value(low: &low::Operation, reference: Option<String>) -> Self {
    Self {
      tags: lift_str_vec(&low.tags),
      summary: lift_string(&low.summary),
      description: lift_string(&low.description),
      external_docs: lift_object(&low.external_docs, ExternalDocs::from_value),
      operation_id: lift_string(&low.operation_id),
      parameters: lift_vec(&low.parameters, Parameter::from_value),
      request_body: lift_object(&low.request_body, RequestBody::from_value),
      responses: lift_object(&low.responses, Responses::from_value),
      callbacks: lift_map(&low.callbacks, Callback::from_value),
      deprecated: lift_bool(&low.deprecated),
      security: lift_vec(&low.security, SecurityRequirement::from_value),
      servers: lift_vec(&low.servers, Server::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Operation {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_array("tags", line_of(low, |l| l.tags.as_ref()), &self.tags);
    nb.str_field("summary", line_of(low, |l| l.summary.as_ref()), self.summary.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.object(
      "externalDocs",
      line_of(low, |l| l.external_docs.as_ref()),
      self.external_docs.as_ref().map(|docs| docs as &dyn Renderable),
    );
    nb.str_field("operationId", line_of(low, |l| l.operation_id.as_ref()), self.operation_id.as_ref());
    nb.array("parameters", line_of(low, |l| l.parameters.as_ref()), &self.parameters);
    nb.object(
      "requestBody",
      line_of(low, |l| l.request_body.as_ref()),
      self.request_body.as_ref().map(|body| body as &dyn Renderable),
    );
    nb.object(
      "responses",
      line_of(low, |l| l.responses.as_ref()),
      self.responses.as_ref().map(|responses| responses as &dyn Renderable),
    );
    nb.map(
      "callbacks",
      line_of(low, |l| l.callbacks.as_ref()),
      &self.callbacks,
      low.and_then(|l| l.callbacks.as_ref()).map(|m| &m.value),
    );
    nb.bool_field("deprecated", line_of(low, |l| l.deprecated.as_ref()), self.deprecated);
    nb.array("security", line_of(low, |l| l.security.as_ref()), &self.security);
    nb.array("servers", line_of(low, |l| l.servers.as_ref()), &self.servers);
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
