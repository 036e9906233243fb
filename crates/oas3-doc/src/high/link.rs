use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  NodeBuilder, PathItem, Renderable, Server, lift_extensions, lift_low_map, lift_object, lift_string, lift_value,
  line_of, node_builder::ref_value,
};
use crate::low::{self, NEW_FIELD_LINE};

#[derive(Debug, Clone, Default)]
pub struct Link {
  pub operation_ref: Option<String>,
  pub operation_id: Option<String>,
  pub parameters: Option<Yaml>,
  pub request_body: Option<Yaml>,
  pub description: Option<String>,
  pub server: Option<Server>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Link>>,
}

impl Link {
  #[must_use]
  pub fn from_value(low: &low::Link, reference: Option<String>) -> Self {
    Self {
      operation_ref: lift_string(&low.operation_ref),
      operation_id: lift_string(&low.operation_id),
      parameters: lift_value(&low.parameters),
      request_body: lift_value(&low.request_body),
      description: lift_string(&low.description),
      server: lift_object(&low.server, Server::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Link {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("operationRef", line_of(low, |l| l.operation_ref.as_ref()), self.operation_ref.as_ref());
    nb.str_field("operationId", line_of(low, |l| l.operation_id.as_ref()), self.operation_id.as_ref());
    nb.value_field("parameters", line_of(low, |l| l.parameters.as_ref()), self.parameters.as_ref());
    nb.value_field("requestBody", line_of(low, |l| l.request_body.as_ref()), self.request_body.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.object(
      "server",
      line_of(low, |l| l.server.as_ref()),
      self.server.as_ref().map(|server| server as &dyn Renderable),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Callback {
  pub expressions: IndexMap<String, PathItem>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Callback>>,
}

impl Callback {
  #[must_use]
  pub fn from_value(low: &low::Callback, reference: Option<String>) -> Self {
    Self {
      expressions: lift_low_map(&low.expressions, PathItem::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Callback {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    for (expression, item) in &self.expressions {
      let line = low
        .and_then(|l| l.expressions.get_key_value(expression.as_str()))
        .map_or(NEW_FIELD_LINE, |(key, _)| key.line);
      nb.field(expression, line, item.render());
    }
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
