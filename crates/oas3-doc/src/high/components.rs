use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  Callback, Example, Header, Link, NodeBuilder, Parameter, Renderable, RequestBody, Response, SchemaProxy,
  SecurityScheme, lift_extensions, lift_map, line_of, node_builder::ref_value,
};
use crate::low;

#[derive(Debug, Clone, Default)]
pub struct Components {
  pub schemas: IndexMap<String, SchemaProxy>,
  pub responses: IndexMap<String, Response>,
  pub parameters: IndexMap<String, Parameter>,
  pub examples: IndexMap<String, Example>,
  pub request_bodies: IndexMap<String, RequestBody>,
  pub headers: IndexMap<String, Header>,
  pub security_schemes: IndexMap<String, SecurityScheme>,
  pub links: IndexMap<String, Link>,
  pub callbacks: IndexMap<String, Callback>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Components>>,
}

impl Components {
  #[must_use]
  pub fn from_value(low: &low::Components, reference: Option<String>) -> Self {
    Self {
      schemas: lift_map(&low.schemas, SchemaProxy::from_value),
      responses: lift_map(&low.responses, Response::from_value),
      parameters: lift_map(&low.parameters, Parameter::from_value),
      examples: lift_map(&low.examples, Example::from_value),
      request_bodies: lift_map(&low.request_bodies, RequestBody::from_value),
      headers: lift_map(&low.headers, Header::from_value),
      security_schemes: lift_map(&low.security_schemes, SecurityScheme::from_value),
      links: lift_map(&low.links, Link::from_value),
      callbacks: lift_map(&low.callbacks, Callback::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Components {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.map(
      "schemas",
      line_of(low, |l| l.schemas.as_ref()),
      &self.schemas,
      low.and_then(|l| l.schemas.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "responses",
      line_of(low, |l| l.responses.as_ref()),
      &self.responses,
      low.and_then(|l| l.responses.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "parameters",
      line_of(low, |l| l.parameters.as_ref()),
      &self.parameters,
      low.and_then(|l| l.parameters.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "examples",
      line_of(low, |l| l.examples.as_ref()),
      &self.examples,
      low.and_then(|l| l.examples.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "requestBodies",
      line_of(low, |l| l.request_bodies.as_ref()),
      &self.request_bodies,
      low.and_then(|l| l.request_bodies.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "headers",
      line_of(low, |l| l.headers.as_ref()),
      &self.headers,
      low.and_then(|l| l.headers.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "securitySchemes",
      line_of(low, |l| l.security_schemes.as_ref()),
      &self.security_schemes,
      low.and_then(|l| l.security_schemes.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "links",
      line_of(low, |l| l.links.as_ref()),
      &self.links,
      low.and_then(|l| l.links.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "callbacks",
      line_of(low, |l| l.callbacks.as_ref()),
      &self.callbacks,
      low.and_then(|l| l.callbacks.as_ref()).map(|m| &m.value),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
