use std::sync::Arc;

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use super::{
  NodeBuilder, Renderable, lift_extensions, lift_object, lift_string, lift_string_map, lift_value, line_of,
  node_builder::ref_value,
};
use crate::low;

#[derive(Debug, Clone, Default)]
pub struct Contact {
  pub name: Option<String>,
  pub url: Option<String>,
  pub email: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Contact>>,
}

impl Contact {
  #[must_use]
  pub fn from_value(low: &low::Contact, reference: Option<String>) -> Self {
    Self {
      name: lift_string(&low.name),
      url: lift_string(&low.url),
      email: lift_string(&low.email),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Contact {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("name", line_of(low, |l| l.name.as_ref()), self.name.as_ref());
    nb.str_field("url", line_of(low, |l| l.url.as_ref()), self.url.as_ref());
    nb.str_field("email", line_of(low, |l| l.email.as_ref()), self.email.as_ref());
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct License {
  pub name: Option<String>,
  pub identifier: Option<String>,
  pub url: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::License>>,
}

impl License {
  #[must_use]
  pub fn from_value(low: &low::License, reference: Option<String>) -> Self {
    Self {
      name: lift_string(&low.name),
      identifier: lift_string(&low.identifier),
      url: lift_string(&low.url),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for License {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("name", line_of(low, |l| l.name.as_ref()), self.name.as_ref());
    nb.str_field("identifier", line_of(low, |l| l.identifier.as_ref()), self.identifier.as_ref());
    nb.str_field("url", line_of(low, |l| l.url.as_ref()), self.url.as_ref());
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Info {
  pub title: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub terms_of_service: Option<String>,
  pub contact: Option<Contact>,
  pub license: Option<License>,
  pub version: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Info>>,
}

impl Info {
  #[must_use]
  pub fn from_value(low: &low::Info, reference: Option<String>) -> Self {
    Self {
      title: lift_string(&low.title),
      summary: lift_string(&low.summary),
      description: lift_string(&low.description),
      terms_of_service: lift_string(&low.terms_of_service),
      contact: lift_object(&low.contact, Contact::from_value),
      license: lift_object(&low.license, License::from_value),
      version: lift_string(&low.version),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Info {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("title", line_of(low, |l| l.title.as_ref()), self.title.as_ref());
    nb.str_field("summary", line_of(low, |l| l.summary.as_ref()), self.summary.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.str_field(
      "termsOfService",
      line_of(low, |l| l.terms_of_service.as_ref()),
      self.terms_of_service.as_ref(),
    );
    nb.object(
      "contact",
      line_of(low, |l| l.contact.as_ref()),
      self.contact.as_ref().map(|contact| contact as &dyn Renderable),
    );
    nb.object(
      "license",
      line_of(low, |l| l.license.as_ref()),
      self.license.as_ref().map(|license| license as &dyn Renderable),
    );
    nb.str_field("version", line_of(low, |l| l.version.as_ref()), self.version.as_ref());
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct ExternalDocs {
  pub description: Option<String>,
  pub url: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::ExternalDocs>>,
}

impl ExternalDocs {
  #[must_use]
  pub fn from_value(low: &low::ExternalDocs, reference: Option<String>) -> Self {
    Self {
      description: lift_string(&low.description),
      url: lift_string(&low.url),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for ExternalDocs {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.str_field("url", line_of(low, |l| l.url.as_ref()), self.url.as_ref());
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Tag {
  pub name: Option<String>,
  pub description: Option<String>,
  pub external_docs: Option<ExternalDocs>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Tag>>,
}

impl Tag {
  #[must_use]
  pub fn from_value(low: &low::Tag, reference: Option<String>) -> Self {
    Self {
      name: lift_string(&low.name),
      description: lift_string(&low.description),
      external_docs: lift_object(&low.external_docs, ExternalDocs::from_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Tag {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("name", line_of(low, |l| l.name.as_ref()), self.name.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.object(
      "externalDocs",
      line_of(low, |l| l.external_docs.as_ref()),
      self.external_docs.as_ref().map(|docs| docs as &dyn Renderable),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Example {
  pub summary: Option<String>,
  pub description: Option<String>,
  pub value: Option<Yaml>,
  pub external_value: Option<String>,
  pub extensions: IndexMap<String, Yaml>,
  pub reference: Option<String>,
  pub low: Option<Arc<low::Example>>,
}

impl Example {
  #[must_use]
  pub fn from_value(low: &low::Example, reference: Option<String>) -> Self {
    Self {
      summary: lift_string(&low.summary),
      description: lift_string(&low.description),
      value: lift_value(&low.value),
      external_value: lift_string(&low.external_value),
      extensions: lift_extensions(&low.extensions),
      reference,
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Example {
  fn render(&self) -> Yaml {
    if let Some(raw) = &self.reference {
      return ref_value(raw);
    }
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field("summary", line_of(low, |l| l.summary.as_ref()), self.summary.as_ref());
    nb.str_field("description", line_of(low, |l| l.description.as_ref()), self.description.as_ref());
    nb.value_field("value", line_of(low, |l| l.value.as_ref()), self.value.as_ref());
    nb.str_field(
      "externalValue",
      line_of(low, |l| l.external_value.as_ref()),
      self.external_value.as_ref(),
    );
    nb.extensions(&self.extensions, low.map(|l| &l.extensions));
    nb.build()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Discriminator {
  pub property_name: Option<String>,
  pub mapping: IndexMap<String, String>,
  pub low: Option<Arc<low::Discriminator>>,
}

impl Discriminator {
  #[must_use]
  pub fn from_value(low: &low::Discriminator, _reference: Option<String>) -> Self {
    Self {
      property_name: lift_string(&low.property_name),
      mapping: lift_string_map(&low.mapping),
      low: Some(Arc::new(low.clone())),
    }
  }
}

impl Renderable for Discriminator {
  fn render(&self) -> Yaml {
    let low = self.low.as_deref();
    let mut nb = NodeBuilder::new();
    nb.str_field(
      "propertyName",
      line_of(low, |l| l.property_name.as_ref()),
      self.property_name.as_ref(),
    );
    nb.string_map(
      "mapping",
      line_of(low, |l| l.mapping.as_ref()),
      &self.mapping,
      low.and_then(|l| l.mapping.as_ref()).map(|m| &m.value),
    );
    nb.build()
  }
}
