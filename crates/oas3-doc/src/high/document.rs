use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  Components, ExternalDocs, Info, NodeBuilder, PathItem, Paths, Renderable, SecurityRequirement, Server, Tag,
  lift_extensions, lift_map, lift_object, lift_string, lift_vec, line_of, render_to_string,
};
use crate::low;

/// The mutable document: edit the fields, then [`Document::render`] to
/// get YAML with original ordering and edits at container ends.
#[derive(Debug, Clone, Default)]
pub struct Document {
  pub version: String,
  pub info: Option<Info>,
  pub servers: Vec<Server>,
  pub tags: Vec<Tag>,
  pub components: Option<Components>,
  pub security: Vec<SecurityRequirement>,
  pub external_docs: Option<ExternalDocs>,
  pub paths: Option<Paths>,
  pub webhooks: IndexMap<String, PathItem>,
  pub json_schema_dialect: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub low: Option<Arc<low::Document>>,
}

impl Document {
  #[must_use]
  pub fn from_low(low: &low::Document) -> Self {
    Self {
      version: low.version.value.clone(),
      info: lift_object(&low.info, Info::from_value),
      servers: lift_vec(&low.servers, Server::from_value),
      tags: lift_vec(&low.tags, Tag::from_value),
      components: lift_object(&low.components, Components::from_value),
      security: lift_vec(&low.security, SecurityRequirement::from_value),
      external_docs: lift_object(&low.external_docs, ExternalDocs::from_value),
      paths: lift_object(&low.paths, Paths::from_value),
      webhooks: lift_map(&low.webhooks, PathItem::from_value),
      json_schema_dialect: lift_string(&low.json_schema_dialect),
      extensions: lift_extensions(&low.extensions),
      low: Some(Arc::new(low.clone())),
    }
  }

  /// Renders the whole document to block-style YAML.
  #[must_use]
  pub fn render(&self) -> String {
    render_to_string(self)
  }
}

impl Renderable for Document {
  fn render(&self) -> Yaml {
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    let version_line = low.map_or(low::NEW_FIELD_LINE, |l| l.version.line);
    nb.str_field("openapi", version_line, Some(&self.version));
    nb.str_field(
      "jsonSchemaDialect",
      line_of(low, |l| l.json_schema_dialect.as_ref()),
      self.json_schema_dialect.as_ref(),
    );
    nb.object(
      "info",
      line_of(low, |l| l.info.as_ref()),
      self.info.as_ref().map(|info| info as &dyn Renderable),
    );
    nb.array("servers", line_of(low, |l| l.servers.as_ref()), &self.servers);
    nb.array("tags", line_of(low, |l| l.tags.as_ref()), &self.tags);
    nb.object(
      "paths",
      line_of(low, |l| l.paths.as_ref()),
      self.paths.as_ref().map(|paths| paths as &dyn Renderable),
    );
    nb.map(
      "webhooks",
      line_of(low, |l| l.webhooks.as_ref()),
      &self.webhooks,
      low.and_then(|l| l.webhooks.as_ref()).map(|m| &m.value),
    );
    nb.object(
      "components",
      line_of(low, |l| l.components.as_ref()),
      self.components.as_ref().map(|components| components as &dyn Renderable),
    );
    nb.array("security", line_of(low, |l| l.security.as_ref()), &self.security);
    nb.object(
      "externalDocs",
      line_of(low, |l| l.external_docs.as_ref()),
      self.external_docs.as_ref().map(|docs| docs as &dyn Renderable),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
