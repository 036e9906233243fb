use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  Example, MediaType, NodeBuilder, Renderable, SchemaProxy, lift_bool, lift_extensions, lift_map, lift_object,
  lift_string, lift_value, line_of, node_builder::ref_value,
};
use crate::low;

#[derive(Debug, Clone, Default)]
pub struct Parameter {
  pub name: Option<String>,
  pub location: Option<String>,
  pub description: Option<String>,
  pub required: Option<bool>,
  pub deprecated: Option<bool>,
  pub allow_empty_value: Option<bool>,
  pub style: Option<String>,
  pub explode: Option<bool>,
  pub allow_reserved: Option<bool>,
  pub schema: Option<SchemaProxy>,
  pub example: Option<Yaml>,
  pub examples: IndexMap<String, Example>,
  pub content: IndexMap<String, MediaType>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Parameter>>,
}

impl Parameter {
  #[must_use]
  pub fn from_value(low: &low::Parameter, reference: Option<String>) -> Self {
    Self {
      name: lift_string(&low.name),
      location: lift_string(&low.location),
      description: lift_string(&low.description),
      required: lift_bool(&low.required),
      deprecated: lift_bool(&low.deprecated),
      allow_empty_value: lift_bool(&low.allow_empty_value),
      style: lift_string(&low.style),
      explode: lift_bool(&low.explode),
      allow_reserved: lift_bool(&low.allow_reserved),
      schema: lift_object(&low.schema, SchemaProxy::from_value),
      example: lift_value(&low.example),
      examples: lift_map(&low.examples, Example::from_value),
      content: lift_map(&low.content, MediaType::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Parameter {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("name", line_of(low, |l| l.name.as_ref()), self.name.as_ref());
    nb.str_field("in", line_of(low, |l| l.location.as_ref()), self.location.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.bool_field("required", line_of(low, |l| l.required.as_ref()), self.required);
    nb.bool_field("deprecated", line_of(low, |l| l.deprecated.as_ref()), self.deprecated);
    nb.bool_field(
      "allowEmptyValue",
      line_of(low, |l| l.allow_empty_value.as_ref()),
      self.allow_empty_value,
    );
    nb.str_field("style", line_of(low, |l| l.style.as_ref()), self.style.as_ref());
    nb.bool_field("explode", line_of(low, |l| l.explode.as_ref()), self.explode);
    nb.bool_field("allowReserved", line_of(low, |l| l.allow_reserved.as_ref()), self.allow_reserved);
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
      "content",
      line_of(low, |l| l.content.as_ref()),
      &self.content,
      low.and_then(|l| l.content.as_ref()).map(|m| &m.value),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Header {
  pub description: Option<String>,
  pub required: Option<bool>,
  pub deprecated: Option<bool>,
  pub allow_empty_value: Option<bool>,
  pub style: Option<String>,
  pub explode: Option<bool>,
  pub allow_reserved: Option<bool>,
  pub schema: Option<SchemaProxy>,
  pub example: Option<Yaml>,
  pub examples: IndexMap<String, Example>,
  pub content: IndexMap<String, MediaType>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Header>>,
}

impl Header {
  #[must_use]
  pub fn from_value(low: &low::Header, reference: Option<String>) -> Self {
    Self {
      description: lift_string(&low.description),
      required: lift_bool(&low.required),
      deprecated: lift_bool(&low.deprecated),
      allow_empty_value: lift_bool(&low.allow_empty_value),
      style: lift_string(&low.style),
      explode: lift_bool(&low.explode),
      allow_reserved: lift_bool(&low.allow_reserved),
      schema: lift_object(&low.schema, SchemaProxy::from_value),
      example: lift_value(&low.example),
      examples: lift_map(&low.examples, Example::from_value),
      content: lift_map(&low.content, MediaType::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Header {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.bool_field("required", line_of(low, |l| l.required.as_ref()), self.required);
    nb.bool_field("deprecated", line_of(low, |l| l.deprecated.as_ref()), self.deprecated);
    nb.bool_field(
      "allowEmptyValue",
      line_of(low, |l| l.allow_empty_value.as_ref()),
      self.allow_empty_value,
    );
    nb.str_field("style", line_of(low, |l| l.style.as_ref()), self.style.as_ref());
    nb.bool_field("explode", line_of(low, |l| l.explode.as_ref()), self.explode);
    nb.bool_field("allowReserved", line_of(low, |l| l.allow_reserved.as_ref()), self.allow_reserved);
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
      "content",
      line_of(low, |l| l.content.as_ref()),
      &self.content,
      low.and_then(|l| l.content.as_ref()).map(|m| &m.value),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
