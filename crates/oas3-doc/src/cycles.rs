//! Circular-reference detection over the resolved reference graph.

use std::collections::{HashMap, HashSet};

use petgraph::{
  graph::{EdgeIndex, NodeIndex},
  visit::EdgeRef,
};

use crate::{
  error::DocError,
  index::RefKind,
  resolver::{RefEdge, ReferenceGraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
  /// Every edge is a schema reference and at least one runs through a
  /// polymorphic composition key.
  Polymorphic,
  /// At least one edge runs through an array-item position.
  Array,
  /// A plain property-to-property loop.
  Direct,
}

/// One detected cycle: the component addresses in traversal order and
/// the edges connecting them (last edge closes the loop).
#[derive(Debug, Clone)]
pub struct Cycle {
  pub kind: CycleKind,
  pub participants: Vec<String>,
  pub edges: Vec<RefEdge>,
}

impl Cycle {
  /// Human-readable loop description, e.g. `A -> B -> A`.
  #[must_use]
  pub fn describe(&self) -> String {
    let mut names: Vec<&str> = self.participants.iter().map(|pointer| short_name(pointer)).collect();
    if let Some(first) = names.first().copied() {
      names.push(first);
    }
    names.join(" -> ")
  }
}

fn short_name(pointer: &str) -> &str {
  pointer.rsplit('/').next().unwrap_or(pointer)
}

#[derive(Clone, Copy, PartialEq)]
enum Colour {
  White,
  Grey,
  Black,
}

struct Frame {
  node: NodeIndex,
  edges: Vec<(EdgeIndex, NodeIndex)>,
  next: usize,
  entry_edge: Option<EdgeIndex>,
}

/// Iterative three-colour depth-first search. A back-edge to a grey node
/// yields the cycle as the slice of the traversal path from that node to
/// the current one, so every reported cycle is simple and minimal.
#[must_use]
pub fn detect_cycles(reference_graph: &ReferenceGraph) -> Vec<Cycle> {
  let graph = reference_graph.graph();
  let mut colour = vec![Colour::White; graph.node_count()];
  let mut cycles = Vec::new();
  let mut signatures: HashSet<Vec<usize>> = HashSet::new();

  for start in graph.node_indices() {
    if colour[start.index()] != Colour::White {
      continue;
    }
    let mut stack = vec![new_frame(reference_graph, start, None)];
    colour[start.index()] = Colour::Grey;
    let mut path = vec![start];
    let mut position: HashMap<NodeIndex, usize> = HashMap::from([(start, 0)]);

    while let Some(frame) = stack.last_mut() {
      if frame.next >= frame.edges.len() {
        let node = frame.node;
        colour[node.index()] = Colour::Black;
        position.remove(&node);
        path.pop();
        stack.pop();
        continue;
      }
      let (edge, target) = frame.edges[frame.next];
      frame.next += 1;
      match colour[target.index()] {
        Colour::White => {
          colour[target.index()] = Colour::Grey;
          position.insert(target, path.len());
          path.push(target);
          stack.push(new_frame(reference_graph, target, Some(edge)));
        }
        Colour::Grey => {
          let Some(&start_pos) = position.get(&target) else {
            continue;
          };
          let members = &path[start_pos..];
          let mut signature: Vec<usize> = members.iter().map(|node| node.index()).collect();
          signature.sort_unstable();
          if !signatures.insert(signature) {
            continue;
          }
          // edges along the slice are the ones each member was entered
          // through, closed by the back-edge
          let mut edges: Vec<RefEdge> = stack[stack.len() - members.len() + 1..]
            .iter()
            .filter_map(|frame| frame.entry_edge)
            .filter_map(|entry| graph.edge_weight(entry).cloned())
            .collect();
          if let Some(weight) = graph.edge_weight(edge) {
            edges.push(weight.clone());
          }
          let participants = members
            .iter()
            .filter_map(|node| graph.node_weight(*node))
            .map(|weight| weight.pointer.clone())
            .collect();
          cycles.push(Cycle {
            kind: classify(&edges),
            participants,
            edges,
          });
        }
        Colour::Black => {}
      }
    }
  }
  cycles
}

fn new_frame(reference_graph: &ReferenceGraph, node: NodeIndex, entry_edge: Option<EdgeIndex>) -> Frame {
  let graph = reference_graph.graph();
  let mut edges: Vec<(EdgeIndex, NodeIndex)> = graph.edges(node).map(|edge| (edge.id(), edge.target())).collect();
  // adjacency lists iterate newest-first; document order keeps reports stable
  edges.reverse();
  Frame {
    node,
    edges,
    next: 0,
    entry_edge,
  }
}

fn classify(edges: &[RefEdge]) -> CycleKind {
  let all_schema = edges.iter().all(|edge| edge.kind == RefKind::Schema);
  if all_schema && edges.iter().any(|edge| edge.poly_key.is_some()) {
    return CycleKind::Polymorphic;
  }
  if edges.iter().any(|edge| edge.via_items) {
    return CycleKind::Array;
  }
  CycleKind::Direct
}

/// Turns detected cycles into errors, honouring the ignore flags.
#[must_use]
pub fn report(cycles: &[Cycle], ignore_array: bool, ignore_polymorphic: bool) -> Vec<DocError> {
  cycles
    .iter()
    .filter(|cycle| match cycle.kind {
      CycleKind::Array => !ignore_array,
      CycleKind::Polymorphic => !ignore_polymorphic,
      CycleKind::Direct => true,
    })
    .map(|cycle| {
      let mut error = DocError::circular(format!("circular reference detected: {}", cycle.describe()));
      if let Some(edge) = cycle.edges.first() {
        error = error.with_cid(&edge.source_cid).with_location(edge.line, edge.column);
      }
      error
    })
    .collect()
}
