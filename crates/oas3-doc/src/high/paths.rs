use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  NodeBuilder, Operation, Parameter, Renderable, Server, lift_extensions, lift_low_map, lift_object, lift_string,
  lift_vec, line_of, node_builder::ref_value,
};
use crate::low::{self, NEW_FIELD_LINE};

#[derive(Debug, Clone, Default)]
pub struct PathItem {
  pub summary: Option<String>,
  pub description: Option<String>,
  pub get: Option<Operation>,
  pub put: Option<Operation>,
  pub post: Option<Operation>,
  pub delete: Option<Operation>,
  pub options: Option<Operation>,
  pub head: Option<Operation>,
  pub patch: Option<Operation>,
  pub trace: Option<Operation>,
  pub servers: Vec<Server>,
  pub parameters: Vec<Parameter>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::PathItem>>,
}

impl PathItem {
  #[must_use]
  pub fn from_value(low: &low::PathItem, reference: Option<String>) -> Self {
    Self {
      summary: lift_string(&low.summary),
      description: lift_string(&low.description),
      get: lift_object(&low.get, Operation::from_value),
      put: lift_object(&low.put, Operation::from_value),
      post: lift_object(&low.post, Operation::from_value),
      delete: lift_object(&low.delete, Operation::from_value),
      options: lift_object(&low.options, Operation::from_value),
      head: lift_object(&low.head, Operation::from_value),
      patch: lift_object(&low.patch, Operation::from_value),
      trace: lift_object(&low.trace, Operation::from_value),
      servers: lift_vec(&low.servers, Server::from_value),
      parameters: lift_vec(&low.parameters, Parameter::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for PathItem {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("summary", line_of(low, |l| l.summary.as_ref()), self.summary.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.object(
      "get",
      line_of(low, |l| l.get.as_ref()),
      self.get.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.object(
      "put",
      line_of(low, |l| l.put.as_ref()),
      self.put.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.object(
      "post",
      line_of(low, |l| l.post.as_ref()),
      self.post.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.object(
      "delete",
      line_of(low, |l| l.delete.as_ref()),
      self.delete.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.object(
      "options",
      line_of(low, |l| l.options.as_ref()),
      self.options.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.object(
      "head",
      line_of(low, |l| l.head.as_ref()),
      self.head.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.object(
      "patch",
      line_of(low, |l| l.patch.as_ref()),
      self.patch.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.object(
      "trace",
      line_of(low, |l| l.trace.as_ref()),
      self.trace.as_ref().map(|op| op as &dyn Renderable),
    );
    nb.array("servers", line_of(low, |l| l.servers.as_ref()), &self.servers);
    nb.array("parameters", line_of(low, |l| l.parameters.as_ref()), &self.parameters);
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

/// The `paths` container: path templates in document order, new paths at
/// the end.
#[derive(Debug, Clone, Default)]
pub struct Paths {
  pub path_items: IndexMap<String, PathItem>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Paths>>,
}

impl Paths {
  #[must_use]
  pub fn from_value(low: &low::Paths, reference: Option<String>) -> Self {
    Self {
      path_items: lift_low_map(&low.path_items, PathItem::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Paths {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    for (path, item) in &self.path_items {
      let line = low
        .and_then(|l| l.path_items.get_key_value(path.as_str()))
        .map_or(NEW_FIELD_LINE, |(key, _)| key.line);
      nb.field(path, line, item.render());
    }
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
