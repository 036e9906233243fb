//! Foundational low objects shared across the document: info block,
//! tags, external docs, examples and discriminators.

use yaml_rust2::yaml::Yaml;

use super::{
  Extensions, LowMap, NodeRef, ValueRef,
  extract::{
    Buildable, ExtractContext, extract_extensions, extract_map, extract_object, extract_string, extract_value,
  },
};
use crate::{error::DocError, yaml::NodeId};

#[derive(Debug, Clone, Default)]
pub struct Contact {
  pub name: Option<NodeRef<String>>,
  pub url: Option<NodeRef<String>>,
  pub email: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Buildable for Contact {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      name: extract_string(tree, node, "name"),
      url: extract_string(tree, node, "url"),
      email: extract_string(tree, node, "email"),
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct License {
  pub name: Option<NodeRef<String>>,
  pub identifier: Option<NodeRef<String>>,
  pub url: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Buildable for License {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      name: extract_string(tree, node, "name"),
      identifier: extract_string(tree, node, "identifier"),
      url: extract_string(tree, node, "url"),
      extensions: extract_extensions(tree, node),
    })
  }
}

/// The `info` block of a document.
#[derive(Debug, Clone, Default)]
pub struct Info {
  pub title: Option<NodeRef<String>>,
  pub summary: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub terms_of_service: Option<NodeRef<String>>,
  pub contact: Option<NodeRef<Contact>>,
  pub license: Option<NodeRef<License>>,
  pub version: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Buildable for Info {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      title: extract_string(tree, node, "title"),
      summary: extract_string(tree, node, "summary"),
      description: extract_string(tree, node, "description"),
      terms_of_service: extract_string(tree, node, "termsOfService"),
      contact: extract_object("contact", node, ctx)?,
      license: extract_object("license", node, ctx)?,
      version: extract_string(tree, node, "version"),
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct ExternalDocs {
  pub description: Option<NodeRef<String>>,
  pub url: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Buildable for ExternalDocs {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      description: extract_string(tree, node, "description"),
      url: extract_string(tree, node, "url"),
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct Tag {
  pub name: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub external_docs: Option<NodeRef<ExternalDocs>>,
  pub extensions: Extensions,
}

impl Buildable for Tag {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      name: extract_string(tree, node, "name"),
      description: extract_string(tree, node, "description"),
      external_docs: extract_object("externalDocs", node, ctx)?,
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct Example {
  pub summary: Option<NodeRef<String>>,
  pub description: Option<NodeRef<String>>,
  pub value: Option<NodeRef<Yaml>>,
  pub external_value: Option<NodeRef<String>>,
  pub extensions: Extensions,
}

impl Buildable for Example {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    let tree = &ctx.tree;
    Ok(Self {
      summary: extract_string(tree, node, "summary"),
      description: extract_string(tree, node, "description"),
      value: extract_value(tree, node, "value"),
      external_value: extract_string(tree, node, "externalValue"),
      extensions: extract_extensions(tree, node),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct Discriminator {
  pub property_name: Option<NodeRef<String>>,
  pub mapping: Option<NodeRef<LowMap<String>>>,
}

impl Buildable for Discriminator {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    Ok(Self {
      property_name: extract_string(&ctx.tree, node, "propertyName"),
      mapping: extract_map::<MappedName>("mapping", node, ctx)?.map(lower_mapping),
    })
  }
}

/// `discriminator.mapping` values are plain strings; a tiny buildable
/// shim lets the generic map extractor handle them.
#[derive(Debug, Clone)]
struct MappedName(String);

impl Buildable for MappedName {
  fn build(node: NodeId, _key: Option<NodeId>, ctx: &ExtractContext) -> Result<Self, DocError> {
    Ok(Self(ctx.tree.scalar(node).unwrap_or_default().to_string()))
  }
}

fn lower_mapping(wrapped: NodeRef<LowMap<MappedName>>) -> NodeRef<LowMap<String>> {
  let mut out = NodeRef::new(
    wrapped
      .value
      .into_iter()
      .map(|(key, value)| {
        (
          key,
          ValueRef {
            value: value.value.0,
            value_node: value.value_node,
            line: value.line,
            reference: value.reference,
          },
        )
      })
      .collect(),
    wrapped.key_node,
    wrapped.value_node,
    wrapped.line,
  );
  out.reference = wrapped.reference;
  out
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  fn build<T: Buildable>(text: &str) -> T {
    let tree = Arc::new(YamlTree::parse(text).expect("parse"));
    let ctx = ExtractContext::standalone("/spec/root.yaml", tree);
    let root = ctx.tree.root().expect("root");
    T::build(root, None, &ctx).expect("build")
  }

  #[test]
  fn info_extracts_nested_objects() {
    let info: Info = build(
      "title: Pet Store\nversion: 1.0.0\ncontact:\n  name: support\n  email: help@example.com\nlicense:\n  name: MIT\nx-internal: true\n",
    );
    assert_eq!(info.title.as_ref().map(|t| t.value.as_str()), Some("Pet Store"));
    assert_eq!(info.version.as_ref().map(|v| v.value.as_str()), Some("1.0.0"));
    assert_eq!(
      info.contact.as_ref().and_then(|c| c.value.email.as_ref()).map(|e| e.value.as_str()),
      Some("help@example.com")
    );
    assert_eq!(info.license.as_ref().and_then(|l| l.value.name.as_ref()).map(|n| n.value.as_str()), Some("MIT"));
    assert_eq!(info.extensions.len(), 1);
    assert_eq!(info.title.as_ref().map(|t| t.line), Some(1));
    assert_eq!(info.contact.as_ref().map(|c| c.line), Some(3));
  }

  #[test]
  fn discriminator_builds_plain_string_mapping() {
    let discriminator: Discriminator = build("propertyName: petType\nmapping:\n  dog: '#/components/schemas/Dog'\n");
    assert_eq!(
      discriminator.property_name.as_ref().map(|p| p.value.as_str()),
      Some("petType")
    );
    let mapping = discriminator.mapping.expect("mapping");
    assert_eq!(
      mapping.value.get("dog").map(|v| v.value.as_str()),
      Some("#/components/schemas/Dog")
    );
  }

  #[test]
  fn example_value_keeps_structure() {
    let example: Example = build("summary: sample\nvalue:\n  id: 3\n  tags:\n    - a\n");
    let value = example.value.expect("value");
    let Yaml::Hash(hash) = &value.value else {
      panic!("expected hash");
    };
    assert_eq!(hash.len(), 2);
  }
}
