//! The low model: parsed values with key/value node identity and source
//! lines on every field. Immutable once built; the high model renders
//! through it to reproduce original document order.

mod base;
mod components;
pub mod create;
mod document;
pub mod extract;
mod link;
mod media;
mod operation;
mod parameter;
mod paths;
mod request_body;
mod response;
mod schema;
mod security;
mod server;

pub use base::{Contact, Discriminator, Example, ExternalDocs, Info, License, Tag};
pub use components::Components;
pub use create::{DocumentBuildResult, SpecInfo, create_document};
pub use document::Document;
pub use extract::ExtractContext;
pub use link::{Callback, Link};
pub use media::{Encoding, MediaType};
pub use operation::Operation;
pub use parameter::{Header, Parameter};
pub use paths::{PathItem, Paths};
pub use request_body::RequestBody;
pub use response::{Response, Responses};
pub use schema::{AdditionalProperties, Schema, SchemaProxy, SchemaTypeSet};
pub use security::{OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme};
pub use server::{Server, ServerVariable};

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use crate::yaml::NodeId;

/// Sort line for fields injected after parse. New content carries no
/// source position and sinks to the bottom of its container on render.
pub const NEW_FIELD_LINE: u32 = u32::MAX;

/// A field extracted from the document: its value plus the key and value
/// nodes it came from. `line >= 1` whenever the field was parsed.
#[derive(Debug, Clone)]
pub struct NodeRef<T> {
  pub value: T,
  pub key_node: Option<NodeId>,
  pub value_node: Option<NodeId>,
  pub line: u32,
  /// Raw `$ref` string when the value was reached through a reference.
  pub reference: Option<String>,
}

impl<T> NodeRef<T> {
  pub fn new(value: T, key_node: Option<NodeId>, value_node: Option<NodeId>, line: u32) -> Self {
    Self {
      value,
      key_node,
      value_node,
      line,
      reference: None,
    }
  }

  #[must_use]
  pub fn is_reference(&self) -> bool {
    self.reference.is_some()
  }
}

/// A value with only its value-node identity, used for sequence items.
#[derive(Debug, Clone)]
pub struct ValueRef<T> {
  pub value: T,
  pub value_node: NodeId,
  pub line: u32,
  pub reference: Option<String>,
}

impl<T> ValueRef<T> {
  pub fn new(value: T, value_node: NodeId, line: u32) -> Self {
    Self {
      value,
      value_node,
      line,
      reference: None,
    }
  }
}

/// A mapping key with its node identity. Equality and hashing consider
/// the value only, so maps can be queried by plain string.
#[derive(Debug, Clone)]
pub struct KeyRef<T> {
  pub value: T,
  pub key_node: NodeId,
  pub line: u32,
}

impl<T: PartialEq> PartialEq for KeyRef<T> {
  fn eq(&self, other: &Self) -> bool {
    self.value == other.value
  }
}

impl<T: Eq> Eq for KeyRef<T> {}

impl<T: std::hash::Hash> std::hash::Hash for KeyRef<T> {
  fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
    self.value.hash(state);
  }
}

impl indexmap::Equivalent<KeyRef<String>> for str {
  fn equivalent(&self, key: &KeyRef<String>) -> bool {
    self == key.value
  }
}

/// Ordered string-keyed mapping with node identity on both sides.
pub type LowMap<T> = IndexMap<KeyRef<String>, ValueRef<T>>;

/// Specification extensions (`x-` keys) with their original positions.
pub type Extensions = LowMap<Yaml>;

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  #[test]
  fn key_ref_maps_are_queryable_by_str() {
    let tree = Arc::new(YamlTree::parse("a: 1\n").expect("parse"));
    let root = tree.root().expect("root");
    let (key_node, value_node) = tree.pairs(root).next().expect("pair");

    let mut map: LowMap<i64> = IndexMap::new();
    map.insert(
      KeyRef {
        value: "a".to_string(),
        key_node,
        line: 1,
      },
      ValueRef::new(1, value_node, 1),
    );
    assert_eq!(map.get("a").map(|entry| entry.value), Some(1));
    assert!(map.get("b").is_none());
  }

  #[test]
  fn node_refs_track_reference_state() {
    let plain = NodeRef::new("x", None, None, NEW_FIELD_LINE);
    assert!(!plain.is_reference());
    let mut via_ref = NodeRef::new("x", None, None, 3);
    via_ref.reference = Some("#/components/schemas/X".to_string());
    assert!(via_ref.is_reference());
  }
}
