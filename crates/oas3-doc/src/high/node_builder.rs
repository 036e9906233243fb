//! Renders high objects back to YAML, honouring original line order.
//!
//! Every high entity implements [`Renderable`] with an explicit `render`
//! method that feeds its fields through a [`NodeBuilder`]. Entries sort
//! by the source line recovered from the low model; fields with no low
//! counterpart carry the sentinel line and sink to the bottom of their
//! container.

use indexmap::IndexMap;
use yaml_rust2::yaml::{Hash, Yaml};

use crate::{
  low::{Extensions, LowMap, NEW_FIELD_LINE, NodeRef},
  yaml,
};

/// A high object that can produce its YAML representation.
pub trait Renderable {
  fn render(&self) -> Yaml;
}

/// Serializes a renderable to block-style UTF-8 YAML.
#[must_use]
pub fn render_to_string(value: &dyn Renderable) -> String {
  yaml::emit(&value.render())
}

/// Builds `{$ref: ...}` for reference round-tripping.
#[must_use]
pub fn ref_value(raw: &str) -> Yaml {
  let mut hash = Hash::new();
  hash.insert(Yaml::String("$ref".to_string()), Yaml::String(raw.to_string()));
  Yaml::Hash(hash)
}

/// Source line of a low field, or the bottom sentinel when the low side
/// is absent.
pub fn line_of<L, T>(low: Option<&L>, get: impl Fn(&L) -> Option<&NodeRef<T>>) -> u32 {
  low.and_then(get).map_or(NEW_FIELD_LINE, |field| field.line)
}

struct NodeEntry {
  key: String,
  line: u32,
  value: Yaml,
}

/// Collects `(key, line, value)` entries and emits them as a mapping in
/// ascending line order. Ties keep insertion order.
#[derive(Default)]
pub struct NodeBuilder {
  entries: Vec<NodeEntry>,
}

impl NodeBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a field. Null values and empty containers stand for unset
  /// fields and are skipped.
  pub fn field(&mut self, key: &str, line: u32, value: Yaml) {
    let skip = match &value {
      Yaml::Null | Yaml::BadValue => true,
      Yaml::Array(items) => items.is_empty(),
      Yaml::Hash(entries) => entries.is_empty(),
      _ => false,
    };
    if skip {
      return;
    }
    self.entries.push(NodeEntry {
      key: key.to_string(),
      line,
      value,
    });
  }

  pub fn str_field(&mut self, key: &str, line: u32, value: Option<&String>) {
    self.field(key, line, value.map_or(Yaml::Null, |text| Yaml::String(text.clone())));
  }

  pub fn bool_field(&mut self, key: &str, line: u32, value: Option<bool>) {
    self.field(key, line, value.map_or(Yaml::Null, Yaml::Boolean));
  }

  pub fn int_field(&mut self, key: &str, line: u32, value: Option<i64>) {
    self.field(key, line, value.map_or(Yaml::Null, Yaml::Integer));
  }

  pub fn float_field(&mut self, key: &str, line: u32, value: Option<f64>) {
    self.field(key, line, value.map_or(Yaml::Null, |number| Yaml::Real(number.to_string())));
  }

  pub fn value_field(&mut self, key: &str, line: u32, value: Option<&Yaml>) {
    self.field(key, line, value.cloned().unwrap_or(Yaml::Null));
  }

  /// A nested object. Entities that were reached through a `$ref` render
  /// themselves as the reference, so round-tripping never flattens.
  pub fn object(&mut self, key: &str, line: u32, value: Option<&dyn Renderable>) {
    if let Some(value) = value {
      self.field(key, line, value.render());
    }
  }

  /// An ordered sequence of renderables.
  pub fn array<T: Renderable>(&mut self, key: &str, line: u32, items: &[T]) {
    if items.is_empty() {
      return;
    }
    self.field(key, line, Yaml::Array(items.iter().map(Renderable::render).collect()));
  }

  pub fn str_array(&mut self, key: &str, line: u32, items: &[String]) {
    if items.is_empty() {
      return;
    }
    self.field(
      key,
      line,
      Yaml::Array(items.iter().map(|text| Yaml::String(text.clone())).collect()),
    );
  }

  pub fn value_array(&mut self, key: &str, line: u32, items: &[Yaml]) {
    if items.is_empty() {
      return;
    }
    self.field(key, line, Yaml::Array(items.to_vec()));
  }

  /// A string-keyed mapping of renderables, ordered by the line of each
  /// low key node; inserted keys sink to the bottom.
  pub fn map<T: Renderable, L>(&mut self, key: &str, line: u32, entries: &IndexMap<String, T>, low: Option<&LowMap<L>>) {
    self.map_with(key, line, entries, low, Renderable::render);
  }

  /// A string-keyed mapping of plain strings, same ordering rules.
  pub fn string_map(&mut self, key: &str, line: u32, entries: &IndexMap<String, String>, low: Option<&LowMap<String>>) {
    self.map_with(key, line, entries, low, |text| Yaml::String(text.clone()));
  }

  fn map_with<T, L>(
    &mut self,
    key: &str,
    line: u32,
    entries: &IndexMap<String, T>,
    low: Option<&LowMap<L>>,
    mut render: impl FnMut(&T) -> Yaml,
  ) {
    if entries.is_empty() {
      return;
    }
    let mut ordered: Vec<(&String, &T, u32)> = entries
      .iter()
      .map(|(name, value)| {
        let key_line = low
          .and_then(|map| map.get_key_value(name.as_str()))
          .map_or(NEW_FIELD_LINE, |(key_ref, _)| key_ref.line);
        (name, value, key_line)
      })
      .collect();
    ordered.sort_by_key(|(_, _, key_line)| *key_line);

    let mut hash = Hash::new();
    for (name, value, _) in ordered {
      let rendered = render(value);
      if matches!(rendered, Yaml::Null | Yaml::BadValue) {
        continue;
      }
      hash.insert(Yaml::String(name.clone()), rendered);
    }
    self.field(key, line, Yaml::Hash(hash));
  }

  /// Extension keys render at their original positions; unknown
  /// extensions go to the bottom of the container.
  pub fn extensions(&mut self, high: &IndexMap<String, Yaml>, low: Option<&Extensions>) {
    for (name, value) in high {
      let line = low
        .and_then(|map| map.get_key_value(name.as_str()))
        .map_or(NEW_FIELD_LINE, |(key_ref, _)| key_ref.line);
      self.field(name, line, value.clone());
    }
  }

  /// Emits the collected entries as a mapping, sorted by ascending line.
  #[must_use]
  pub fn build(mut self) -> Yaml {
    self.entries.sort_by_key(|entry| entry.line);
    let mut hash = Hash::new();
    for entry in self.entries {
      hash.insert(Yaml::String(entry.key), entry.value);
    }
    Yaml::Hash(hash)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Plain(String);

  impl Renderable for Plain {
    fn render(&self) -> Yaml {
      Yaml::String(self.0.clone())
    }
  }

  fn keys(value: &Yaml) -> Vec<String> {
    let Yaml::Hash(hash) = value else {
      panic!("expected hash");
    };
    hash
      .keys()
      .map(|key| key.as_str().expect("string key").to_string())
      .collect()
  }

  #[test]
  fn entries_sort_by_line_with_new_fields_last() {
    let mut nb = NodeBuilder::new();
    nb.str_field("added", NEW_FIELD_LINE, Some(&"new".to_string()));
    nb.str_field("second", 5, Some(&"b".to_string()));
    nb.str_field("first", 2, Some(&"a".to_string()));
    assert_eq!(keys(&nb.build()), vec!["first", "second", "added"]);
  }

  #[test]
  fn ties_preserve_insertion_order() {
    let mut nb = NodeBuilder::new();
    nb.str_field("alpha", NEW_FIELD_LINE, Some(&"1".to_string()));
    nb.str_field("beta", NEW_FIELD_LINE, Some(&"2".to_string()));
    assert_eq!(keys(&nb.build()), vec!["alpha", "beta"]);
  }

  #[test]
  fn unset_fields_are_skipped() {
    let mut nb = NodeBuilder::new();
    nb.str_field("present", 1, Some(&"x".to_string()));
    nb.str_field("absent", 2, None);
    nb.bool_field("flag", 3, None);
    nb.array::<Plain>("empty", 4, &[]);
    assert_eq!(keys(&nb.build()), vec!["present"]);
  }

  #[test]
  fn ref_value_builds_single_key_mapping() {
    let raw = "#/components/schemas/Pet";
    let Yaml::Hash(hash) = ref_value(raw) else {
      panic!("expected hash");
    };
    assert_eq!(hash.len(), 1);
    assert_eq!(
      hash.get(&Yaml::String("$ref".to_string())),
      Some(&Yaml::String(raw.to_string()))
    );
  }

  #[test]
  fn rendered_yaml_is_block_style() {
    let mut nb = NodeBuilder::new();
    nb.str_field("openapi", 1, Some(&"3.0.0".to_string()));
    nb.int_field("count", 2, Some(3));
    struct Doc(Yaml);
    impl Renderable for Doc {
      fn render(&self) -> Yaml {
        self.0.clone()
      }
    }
    let text = render_to_string(&Doc(nb.build()));
    assert_eq!(text, "openapi: 3.0.0\ncount: 3\n");
  }
}
