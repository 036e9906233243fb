//! Links every discovered `$ref` to its target index entry and records
//! the edge in a reference graph. References are never substituted into
//! the source tree; the graph is a separate structure so `$ref` strings
//! round-trip through rendering untouched.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::{
  error::DocError,
  index::RefKind,
  rolodex::{ResolvedTarget, Rolodex, split_ref},
};

/// A vertex in the reference graph: one addressable component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefNode {
  pub cid: String,
  pub pointer: String,
}

/// A reference edge, tagged with everything the cycle detector needs.
#[derive(Debug, Clone)]
pub struct RefEdge {
  pub kind: RefKind,
  pub via_items: bool,
  pub poly_key: Option<String>,
  pub source_cid: String,
  pub line: u32,
  pub column: u32,
}

/// One reference occurrence and what became of it.
#[derive(Debug, Clone)]
pub struct ReferenceRecord {
  pub source_cid: String,
  pub source_pointer: String,
  pub raw: String,
  pub target_cid: Option<String>,
  pub target_pointer: String,
  pub resolved: bool,
  pub kind: RefKind,
}

/// The aggregated, directed reference graph across all rolodex members.
/// Vertices are interned component addresses; edges carry classification.
#[derive(Debug, Default)]
pub struct ReferenceGraph {
  graph: DiGraph<RefNode, RefEdge>,
  interned: HashMap<RefNode, NodeIndex>,
  records: Vec<ReferenceRecord>,
}

impl ReferenceGraph {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn graph(&self) -> &DiGraph<RefNode, RefEdge> {
    &self.graph
  }

  #[must_use]
  pub fn records(&self) -> &[ReferenceRecord] {
    &self.records
  }

  #[must_use]
  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  fn intern(&mut self, cid: &str, pointer: &str) -> NodeIndex {
    let node = RefNode {
      cid: cid.to_string(),
      pointer: pointer.to_string(),
    };
    if let Some(index) = self.interned.get(&node) {
      return *index;
    }
    let index = self.graph.add_node(node.clone());
    self.interned.insert(node, index);
    index
  }
}

/// Walks every indexed reference site, links it across rolodex members,
/// and installs the resulting graph on the rolodex. Unresolvable pointers
/// record a `NotFound` error; a location whose fetch or parse already
/// failed during indexing stays unresolved without a second error.
pub fn resolve_references(rolodex: &mut Rolodex) {
  let mut graph = ReferenceGraph::new();
  let entries: Vec<_> = rolodex.entries().cloned().collect();
  let mut errors = Vec::new();
  let mut resolved = Vec::new();

  for entry in &entries {
    for site in entry.index.refs() {
      let (location, pointer) = split_ref(&site.ref_str);
      let target_cid = if location.is_empty() {
        Some(entry.cid.clone())
      } else {
        rolodex.cached_location(&entry.cid, &site.ref_str).cloned()
      };

      let mut record = ReferenceRecord {
        source_cid: entry.cid.clone(),
        source_pointer: site.pointer.clone(),
        raw: site.ref_str.clone(),
        target_cid: target_cid.clone(),
        target_pointer: pointer.clone(),
        resolved: false,
        kind: site.kind,
      };

      let located = target_cid
        .as_ref()
        .and_then(|cid| rolodex.entry(cid))
        .map(|target| (target.cid.clone(), target.tree.clone(), target.index.locate(&pointer)));

      match located {
        Some((cid, tree, Some(index_entry))) => {
          record.resolved = true;
          resolved.push((
            entry.cid.clone(),
            site.ref_str.clone(),
            ResolvedTarget {
              cid: cid.clone(),
              pointer: pointer.clone(),
              node: index_entry.node,
              tree,
            },
          ));
          let source = graph.intern(&entry.cid, &site.owner);
          let target = graph.intern(&cid, &pointer);
          graph.graph.add_edge(
            source,
            target,
            RefEdge {
              kind: site.kind,
              via_items: site.via_items,
              poly_key: site.poly_key.clone(),
              source_cid: entry.cid.clone(),
              line: site.line,
              column: site.column,
            },
          );
        }
        Some((cid, _, None)) => {
          errors.push(
            DocError::not_found(format!("cannot locate reference '{}' in '{cid}'", site.ref_str))
              .with_cid(&entry.cid)
              .with_location(site.line, site.column),
          );
        }
        None => {}
      }
      graph.records.push(record);
    }
  }

  debug!(
    references = graph.records.len(),
    edges = graph.edge_count(),
    "reference resolution complete"
  );
  for (origin, raw, target) in resolved {
    rolodex.record_resolved(&origin, &raw, target);
  }
  for error in errors {
    rolodex.push_error(error);
  }
  rolodex.set_graph(graph);
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::yaml::YamlTree;

  fn resolved_rolodex(text: &str) -> Rolodex {
    let mut rolodex = Rolodex::new();
    let tree = Arc::new(YamlTree::parse(text).expect("parse"));
    rolodex.set_root("/spec/root.yaml", tree);
    resolve_references(&mut rolodex);
    rolodex
  }

  #[test]
  fn links_same_document_references() {
    let rolodex = resolved_rolodex(
      "components:\n  schemas:\n    A:\n      properties:\n        x:\n          $ref: '#/components/schemas/B'\n    B:\n      type: string\n",
    );
    let graph = rolodex.graph().expect("graph");
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.records()[0].resolved);
    assert!(rolodex.errors().is_empty());

    let target = rolodex
      .resolved_target("/spec/root.yaml", "#/components/schemas/B")
      .expect("target");
    assert_eq!(target.pointer, "/components/schemas/B");
  }

  #[test]
  fn missing_pointer_records_not_found() {
    let rolodex = resolved_rolodex(
      "components:\n  schemas:\n    A:\n      properties:\n        x:\n          $ref: '#/components/schemas/Missing'\n",
    );
    let graph = rolodex.graph().expect("graph");
    assert_eq!(graph.edge_count(), 0);
    assert!(!graph.records()[0].resolved);
    assert_eq!(rolodex.errors().len(), 1);
    assert_eq!(rolodex.errors()[0].kind, crate::error::ErrorKind::NotFound);
    assert_eq!(rolodex.errors()[0].line, Some(6));
  }
}
