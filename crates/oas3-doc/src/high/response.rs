use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  Header, Link, MediaType, NodeBuilder, Renderable, lift_extensions, lift_map, lift_object, lift_string,
  lift_low_map, line_of, node_builder::ref_value,
};
use crate::low::{self, NEW_FIELD_LINE};

#[derive(Debug, Clone, Default)]
pub struct Response {
  pub description: Option<String>,
  pub headers: IndexMap<String, Header>,
  pub content: IndexMap<String, MediaType>,
  pub links: IndexMap<String, Link>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Response>>,
}

impl Response {
  #[must_use]
  pub fn from_value(low: &low::Response, reference: Option<String>) -> Self {
    Self {
      description: lift_string(&low.description),
      headers: lift_map(&low.headers, Header::from_value),
      content: lift_map(&low.content, MediaType::from_value),
      links: lift_map(&low.links, Link::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Response {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.map(
      "headers",
      line_of(low, |l| l.headers.as_ref()),
      &self.headers,
      low.and_then(|l| l.headers.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "content",
      line_of(low, |l| l.content.as_ref()),
      &self.content,
      low.and_then(|l| l.content.as_ref()).map(|m| &m.value),
    );
    nb.map(
      "links",
      line_of(low, |l| l.links.as_ref()),
      &self.links,
      low.and_then(|l| l.links.as_ref()).map(|m| &m.value),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

/// The `responses` container: status codes in document order, `default`
/// at its original slot.
#[derive(Debug, Clone, Default)]
pub struct Responses {
  pub codes: IndexMap<String, Response>,
  pub default: Option<Response>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Responses>>,
}

impl Responses {
  #[must_use]
  pub fn from_value(low: &low::Responses, reference: Option<String>) -> Self {
    Self {
      codes: lift_low_map(&low.codes, Response::from_value),
      default: lift_object(&low.default, Response::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Responses {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    for (code, response) in &self.codes {
      let line = low
        .and_then(|l| l.codes.get_key_value(code.as_str()))
        .map_or(NEW_FIELD_LINE, |(key, _)| key.line);
      nb.field(code, line, response.render());
    }
    if let Some(default) = &self.default {
      nb.field("default", line_of(low, |l| l.default.as_ref()), default.render());
    }
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
