use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  MediaType, NodeBuilder, Renderable, lift_bool, lift_extensions, lift_map, lift_string, line_of,
  node_builder::ref_value,
};
use crate::low;

#[derive(Debug, Clone, Default)]
pub struct RequestBody {
  pub description: Option<String>,
  pub content: IndexMap<String, MediaType>,
  pub required: Option<bool>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::RequestBody>>,
}

impl RequestBody {
  #[must_use]
  pub fn from_value(low: &low::RequestBody, reference: Option<String>) -> Self {
    Self {
      description: lift_string(&low.description),
      content: lift_map(&low.content, MediaType::from_value),
      required: lift_bool(&low.required),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for RequestBody {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.map(
      "content",
      line_of(low, |l| l.content.as_ref()),
      &self.content,
      low.and_then(|l| l.content.as_ref()).map(|m| &m.value),
    );
    nb.bool_field("required", line_of(low, |l| l.required.as_ref()), self.required);
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}
