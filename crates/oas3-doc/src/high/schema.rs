use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  Discriminator, ExternalDocs, NodeBuilder, Renderable, lift_bool, lift_extensions, lift_float, lift_int,
  lift_object, lift_str_vec, lift_string, lift_value, lift_value_vec, line_of, node_builder::ref_value,
};
use crate::{error::DocError, low};

/// Mutable mirror of a schema position. A proxy either wraps a low proxy
/// (resolving on demand), or holds a schema built in memory, or is a bare
/// reference created by an edit.
#[derive(Debug, Clone, Default)]
pub struct SchemaProxy {
  pub reference: Option<String>,
  schema: Option<Box<Schema>>,
  low: Option<low::SchemaProxy>,
}

impl SchemaProxy {
  #[must_use]
  pub fn from_value(low: &low::SchemaProxy, reference: Option<String>) -> Self {
    Self {
      reference: reference.or_else(|| low.reference.clone()),
      schema: None,
      low: Some(low.clone()),
    }
  }

  /// A proxy around an in-memory schema, for edits and new content.
  #[must_use]
  pub fn new_schema(schema: Schema) -> Self {
    Self {
      reference: None,
      schema: Some(Box::new(schema)),
      low: None,
    }
  }

  /// A proxy that renders as a `$ref` to the given target.
  #[must_use]
  pub fn new_reference(raw: impl Into<String>) -> Self {
    Self {
      reference: Some(raw.into()),
      schema: None,
      low: None,
    }
  }

  #[must_use]
  pub fn is_reference(&self) -> bool {
    self.reference.is_some()
  }

  #[must_use]
  pub fn low(&self) -> Option<&low::SchemaProxy> {
    self.low.as_ref()
  }

  /// Materializes the schema behind this proxy, following a reference
  /// when one is recorded. One level deep; nested positions are proxies.
  pub fn build_schema(&self) -> Result<Option<Schema>, DocError> {
    if let Some(schema) = &self.schema {
      return Ok(Some((**schema).clone()));
    }
    match &self.low {
      Some(low_proxy) => {
        let built = low_proxy.build_schema()?;
        Ok(Some(Schema::from_value(&built, None)))
      }
      None => Ok(None),
    }
  }

  /// Replaces the proxied schema with an edited value.
  pub fn set_schema(&mut self, schema: Schema) {
    self.schema = Some(Box::new(schema));
    self.reference = None;
  }
}

impl Renderable for SchemaProxy {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    if let Some(schema) = &self.schema {
      return schema.render();
    }
    if let Some(low_proxy) = &self.low {
      if let Ok(built) = low_proxy.build_schema() {
        return Schema::from_value(&built, None).render();
      }
    }
    Yaml::Hash(yaml_rust2::yaml::Hash::new())
  }
}

#[derive(Debug, Clone)]
pub enum AdditionalProperties {
  Boolean(bool),
  Schema(Box<SchemaProxy>),
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
  pub schema_type: Option<low::SchemaTypeSet>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub format: Option<String>,
  pub pattern: Option<String>,
  pub multiple_of: Option<f64>,
  pub maximum: Option<f64>,
  pub minimum: Option<f64>,
  pub exclusive_maximum: Option<Yaml>,
  pub exclusive_minimum: Option<Yaml>,
  pub max_length: Option<i64>,
  pub min_length: Option<i64>,
  pub max_items: Option<i64>,
  pub min_items: Option<i64>,
  pub max_properties: Option<i64>,
  pub min_properties: Option<i64>,
  pub unique_items: Option<bool>,
  pub nullable: Option<bool>,
  pub read_only: Option<bool>,
  pub write_only: Option<bool>,
  pub deprecated: Option<bool>,
  pub required: Vec<String>,
  pub enum_values: Vec<Yaml>,
  pub const_value: Option<Yaml>,
  pub default: Option<Yaml>,
  pub example: Option<Yaml>,
  pub examples: Vec<Yaml>,
  pub properties: IndexMap<String, SchemaProxy>,
  pub items: Option<SchemaProxy>,
  pub additional_properties: Option<AdditionalProperties>,
  pub one_of: Vec<SchemaProxy>,
  pub any_of: Vec<SchemaProxy>,
  pub all_of: Vec<SchemaProxy>,
  pub not: Option<SchemaProxy>,
  pub discriminator: Option<Discriminator>,
  pub external_docs: Option<ExternalDocs>,
  pub extensions: IndexMap<String, Yaml>,
  pub low: Option<Arc<low::Schema>>,
}

impl Schema {
  #[must_use]
  pub fn from_value(low: &low::Schema, _reference: Option<String>) -> Self {
    Self {
      schema_type: low.schema_type.as_ref().map(|entry| entry.value.clone()),
      title: lift_string(&low.title),
      description: lift_string(&low.description),
      format: lift_string(&low.format),
      pattern: lift_string(&low.pattern),
      multiple_of: lift_float(&low.multiple_of),
      maximum: lift_float(&low.maximum),
      minimum: lift_float(&low.minimum),
      exclusive_maximum: lift_value(&low.exclusive_maximum),
      exclusive_minimum: lift_value(&low.exclusive_minimum),
      max_length: lift_int(&low.max_length),
      min_length: lift_int(&low.min_length),
      max_items: lift_int(&low.max_items),
      min_items: lift_int(&low.min_items),
      max_properties: lift_int(&low.max_properties),
      min_properties: lift_int(&low.min_properties),
      unique_items: lift_bool(&low.unique_items),
      nullable: lift_bool(&low.nullable),
      read_only: lift_bool(&low.read_only),
      write_only: lift_bool(&low.write_only),
      deprecated: lift_bool(&low.deprecated),
      required: lift_str_vec(&low.required),
      enum_values: lift_value_vec(&low.enum_values),
      const_value: lift_value(&low.const_value),
      default: lift_value(&low.default),
      example: lift_value(&low.example),
      examples: lift_value_vec(&low.examples),
      properties: super::lift_map(&low.properties, SchemaProxy::from_value),
      items: lift_object(&low.items, SchemaProxy::from_value),
      additional_properties: low.additional_properties.as_ref().map(|entry| match &entry.value {
        low::AdditionalProperties::Boolean(allowed) => AdditionalProperties::Boolean(*allowed),
        low::AdditionalProperties::Schema(proxy) => {
          AdditionalProperties::Schema(Box::new(SchemaProxy::from_value(proxy, None)))
        }
      }),
      one_of: super::lift_vec(&low.one_of, SchemaProxy::from_value),
      any_of: super::lift_vec(&low.any_of, SchemaProxy::from_value),
      all_of: super::lift_vec(&low.all_of, SchemaProxy::from_value),
      not: lift_object(&low.not, SchemaProxy::from_value),
      discriminator: lift_object(&low.discriminator, Discriminator::from_value),
      external_docs: lift_object(&low.external_docs, ExternalDocs::from_value),
      extensions: lift_extensions(&low.extensions),
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Schema {
  fn render(&self) -> Yaml {
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    if let Some(schema_type) = &self.schema_type {
      let value = match schema_type {
        low::SchemaTypeSet::Single(name) => Yaml::String(name.clone()),
        low::SchemaTypeSet::Multiple(names) => {
          Yaml::Array(names.iter().map(|name| Yaml::String(name.clone())).collect())
        }
      };
      nb.field("type", line_of(low, |l| l.schema_type.as_ref()), value);
    }
    nb.str_field("title", line_of(low, |l| l.title.as_ref()), self.title.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.str_field("format", line_of(low, |l| l.format.as_ref()), self.format.as_ref());
    nb.str_field("pattern", line_of(low, |l| l.pattern.as_ref()), self.pattern.as_ref());
    nb.float_field("multipleOf", line_of(low, |l| l.multiple_of.as_ref()), self.multiple_of);
    nb.float_field("maximum", line_of(low, |l| l.maximum.as_ref()), self.maximum);
    nb.float_field("minimum", line_of(low, |l| l.minimum.as_ref()), self.minimum);
    nb.value_field(
      "exclusiveMaximum",
      line_of(low, |l| l.exclusive_maximum.as_ref()),
      self.exclusive_maximum.as_ref(),
    );
    nb.value_field(
      "exclusiveMinimum",
      line_of(low, |l| l.exclusive_minimum.as_ref()),
      self.exclusive_minimum.as_ref(),
    );
    nb.int_field("maxLength", line_of(low, |l| l.max_length.as_ref()), self.max_length);
    nb.int_field("minLength", line_of(low, |l| l.min_length.as_ref()), self.min_length);
    nb.int_field("maxItems", line_of(low, |l| l.max_items.as_ref()), self.max_items);
    nb.int_field("minItems", line_of(low, |l| l.min_items.as_ref()), self.min_items);
    nb.int_field("maxProperties", line_of(low, |l| l.max_properties.as_ref()), self.max_properties);
    nb.int_field("minProperties", line_of(low, |l| l.min_properties.as_ref()), self.min_properties);
    nb.bool_field("uniqueItems", line_of(low, |l| l.unique_items.as_ref()), self.unique_items);
    nb.bool_field("nullable", line_of(low, |l| l.nullable.as_ref()), self.nullable);
    nb.bool_field("readOnly", line_of(low, |l| l.read_only.as_ref()), self.read_only);
    nb.bool_field("writeOnly", line_of(low, |l| l.write_only.as_ref()), self.write_only);
    nb.bool_field("deprecated", line_of(low, |l| l.deprecated.as_ref()), self.deprecated);
    nb.str_array("required", line_of(low, |l| l.required.as_ref()), &self.required);
    nb.value_array("enum", line_of(low, |l| l.enum_values.as_ref()), &self.enum_values);
    nb.value_field("const", line_of(low, |l| l.const_value.as_ref()), self.const_value.as_ref());
    nb.value_field("default", line_of(low, |l| l.default.as_ref()), self.default.as_ref());
    nb.value_field("example", line_of(low, |l| l.example.as_ref()), self.example.as_ref());
    nb.value_array("examples", line_of(low, |l| l.examples.as_ref()), &self.examples);
    nb.map(
      "properties",
      line_of(low, |l| l.properties.as_ref()),
      &self.properties,
      low.and_then(|l| l.properties.as_ref()).map(|m| &m.value),
    );
    nb.object(
      "items",
      line_of(low, |l| l.items.as_ref()),
      self.items.as_ref().map(|items| items as &dyn Renderable),
    );
    if let Some(additional) = &self.additional_properties {
      let line = line_of(low, |l| l.additional_properties.as_ref());
      match additional {
        AdditionalProperties::Boolean(allowed) => nb.field("additionalProperties", line, Yaml::Boolean(*allowed)),
        AdditionalProperties::Schema(proxy) => nb.field("additionalProperties", line, proxy.render()),
      }
    }
    nb.array("oneOf", line_of(low, |l| l.one_of.as_ref()), &self.one_of);
    nb.array("anyOf", line_of(low, |l| l.any_of.as_ref()), &self.any_of);
    nb.array("allOf", line_of(low, |l| l.all_of.as_ref()), &self.all_of);
    nb.object(
      "not",
      line_of(low, |l| l.not.as_ref()),
      self.not.as_ref().map(|not| not as &dyn Renderable),
    );
    nb.object(
      "discriminator",
      line_of(low, |l| l.discriminator.as_ref()),
      self.discriminator.as_ref().map(|d| d as &dyn Renderable),
    );
    nb.object(
      "externalDocs",
      line_of(low, |l| l.external_docs.as_ref()),
      self.external_docs.as_ref().map(|docs| docs as &dyn Renderable),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
