use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  NodeBuilder, Renderable, lift_extensions, lift_str_vec, lift_string, line_of, node_builder::ref_value,
};
use crate::low;

#[derive(Debug, Clone, Default)]
pub struct ServerVariable {
  pub enum_values: Vec<String>,
  pub default: Option<String>,
  pub description: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::ServerVariable>>,
}

impl ServerVariable {
  #[must_use]
  pub fn from_value(low: &low::ServerVariable, reference: Option<String>) -> Self {
    Self {
      enum_values: lift_str_vec(&low.enum_values),
      default: lift_string(&low.default),
      description: lift_string(&low.description),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for ServerVariable {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_array("enum", line_of(low, |l| l.enum_values.as_ref()), &self.enum_values);
    nb.str_field("default", line_of(low, |l| l.default.as_ref()), self.default.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Server {
  pub url: Option<String>,
  pub description: Option<String>,
  pub variables: IndexMap<String, ServerVariable>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Server>>,
}

impl Server {
  #[must_use]
  pub fn from_value(low: &low::Server, reference: Option<String>) -> Self {
    Self {
      url: lift_string(&low.url),
      description: lift_string(&low.description),
      variables: super::lift_map(&low.variables, ServerVariable::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Server {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("url", line_of(low, |l| l.url.as_ref()), self.url.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.map(
      "variables",
      line_of(low, |l| l.variables.as_ref()),
      &self.variables,
      low.and_then(|l| l.variables.as_ref()).map(|m| &m.value),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
