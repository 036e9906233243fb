//! The high model: a mutable mirror of the low model holding plain
//! values. Every entity keeps a read-only handle to its low counterpart
//! so rendering can recover original source lines; editing the high side
//! never touches the low side.

mod base;
mod components;
mod document;
mod link;
mod media;
mod node_builder;
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
pub use document::Document;
pub use link::{Callback, Link};
pub use media::{Encoding, MediaType};
pub use node_builder::{NodeBuilder, Renderable, line_of, ref_value, render_to_string};
pub use operation::Operation;
pub use parameter::{Header, Parameter};
pub use paths::{PathItem, Paths};
pub use request_body::RequestBody;
pub use response::{Response, Responses};
pub use schema::{AdditionalProperties, Schema, SchemaProxy};
pub use security::{OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme};
pub use server::{Server, ServerVariable};

use indexmap::IndexMap;
use yaml_rust2::yaml::Yaml;

use crate::low::{self, LowMap, NodeRef, ValueRef};

pub(crate) fn lift_string(field: &Option<NodeRef<String>>) -> Option<String> {
  field.as_ref().map(|entry| entry.value.clone())
}

pub(crate) fn lift_bool(field: &Option<NodeRef<bool>>) -> Option<bool> {
  field.as_ref().map(|entry| entry.value)
}

pub(crate) fn lift_int(field: &Option<NodeRef<i64>>) -> Option<i64> {
  field.as_ref().map(|entry| entry.value)
}

pub(crate) fn lift_float(field: &Option<NodeRef<f64>>) -> Option<f64> {
  field.as_ref().map(|entry| entry.value)
}

pub(crate) fn lift_value(field: &Option<NodeRef<Yaml>>) -> Option<Yaml> {
  field.as_ref().map(|entry| entry.value.clone())
}

pub(crate) fn lift_str_vec(field: &Option<NodeRef<Vec<ValueRef<String>>>>) -> Vec<String> {
  field
    .as_ref()
    .map(|entry| entry.value.iter().map(|item| item.value.clone()).collect())
    .unwrap_or_default()
}

pub(crate) fn lift_value_vec(field: &Option<NodeRef<Vec<ValueRef<Yaml>>>>) -> Vec<Yaml> {
  field
    .as_ref()
    .map(|entry| entry.value.iter().map(|item| item.value.clone()).collect())
    .unwrap_or_default()
}

pub(crate) fn lift_extensions(low: &low::Extensions) -> IndexMap<String, Yaml> {
  low.iter().map(|(key, value)| (key.value.clone(), value.value.clone())).collect()
}

/// Lifts an optional object field, handing the builder the low value and
/// any reference recorded at the field site.
pub(crate) fn lift_object<L, H>(
  field: &Option<NodeRef<L>>,
  build: impl Fn(&L, Option<String>) -> H,
) -> Option<H> {
  field.as_ref().map(|entry| build(&entry.value, entry.reference.clone()))
}

/// Lifts an optional sequence field into plain items.
pub(crate) fn lift_vec<L, H>(
  field: &Option<NodeRef<Vec<ValueRef<L>>>>,
  build: impl Fn(&L, Option<String>) -> H,
) -> Vec<H> {
  field
    .as_ref()
    .map(|entry| {
      entry
        .value
        .iter()
        .map(|item| build(&item.value, item.reference.clone()))
        .collect()
    })
    .unwrap_or_default()
}

/// Lifts an optional string-keyed mapping field, preserving order.
pub(crate) fn lift_map<L, H>(
  field: &Option<NodeRef<LowMap<L>>>,
  build: impl Fn(&L, Option<String>) -> H,
) -> IndexMap<String, H> {
  field
    .as_ref()
    .map(|entry| lift_low_map(&entry.value, &build))
    .unwrap_or_default()
}

pub(crate) fn lift_low_map<L, H>(
  map: &LowMap<L>,
  build: impl Fn(&L, Option<String>) -> H,
) -> IndexMap<String, H> {
  map
    .iter()
    .map(|(key, value)| (key.value.clone(), build(&value.value, value.reference.clone())))
    .collect()
}

pub(crate) fn lift_string_map(field: &Option<NodeRef<LowMap<String>>>) -> IndexMap<String, String> {
  field
    .as_ref()
    .map(|entry| {
      entry
        .value
        .iter()
        .map(|(key, value)| (key.value.clone(), value.value.clone()))
        .collect()
    })
    .unwrap_or_default()
}
