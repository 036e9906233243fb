use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  Example, Header, NodeBuilder, Renderable, SchemaProxy, lift_bool, lift_extensions, lift_map, lift_object,
  lift_string, lift_value, line_of, node_builder::ref_value,
};
use crate::low;

#[derive(Debug, Clone, Default)]
pub struct Encoding {
  pub content_type: Option<String>,
  pub headers: IndexMap<String, Header>,
  pub style: Option<String>,
  pub explode: Option<bool>,
  pub allow_reserved: Option<bool>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Encoding>>,
}

impl Encoding {
  #[must_use]
  pub fn from_value(low: &low::Encoding, reference: Option<String>) -> Self {
    Self {
      content_type: lift_string(&low.content_type),
      headers: lift_map(&low.headers, Header::from_value),
      style: lift_string(&low.style),
      explode: lift_bool(&low.explode),
      allow_reserved: lift_bool(&low.allow_reserved),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Encoding {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("contentType", line_of(low, |l| l.content_type.as_ref()), self.content_type.as_ref());
    nb.map(
      "headers",
      line_of(low, |l| l.headers.as_ref()),
      &self.headers,
      low.and_then(|l| l.headers.as_ref()).map(|m| &m.value),
    );
    nb.str_field("style", line_of(low, |l| l.style.as_ref()), self.style.as_ref());
    nb.bool_field("explode", line_of(low, |l| l.explode.as_ref()), self.explode);
    nb.bool_field("allowReserved", line_of(low, |l| l.allow_reserved.as_ref()), self.allow_reserved);
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct MediaType {
  pub schema: Option<SchemaProxy>,
  pub example: Option<Yaml>,
  pub examples: IndexMap<String, Example>,
  pub encoding: IndexMap<String, Encoding>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::MediaType>>,
}

impl MediaType {
  #[must_use]
  pub fn from_value(low: &low::MediaType, reference: Option<String>) -> Self {
    Self {
      schema: lift_object(&low.schema, SchemaProxy::from_value),
      example: lift_value(&low.example),
      examples: lift_map(&low.examples, Example::from_value),
      encoding: lift_map(&low.encoding, Encoding::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for MediaType {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.object(
      "schema",
      line_of(low, |l| l.schema.as_ref()),
      self.schema.as_ref().map(|schema| schema as &dyn Renderable),
    );
    nb.value_field("example", line_of(low, |l| l.example.as_ref()), self.example.as_ref());
    nb.map(
      "examples",
      line_of(low, |l| l.examples.as_ref()),
      &self.examples,
      low.and_then(|l| l.examples.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "encoding",
      line_of(low, |l| l.encoding.as_ref()),
      &self.encoding,
      low.and_then(|l| l.encoding.as_ref()).map(|m| &m.value),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
