use yaml_rust2::{
  ScanError,
  parser::{Event, MarkedEventReceiver, Parser, Tag},
  scanner::{Marker, TScalarStyle},
};

use super::{NodeId, NodeKind, YamlNode, YamlTree};

pub(super) fn parse_tree(text: &str) -> Result<YamlTree, ScanError> {
  let mut builder = TreeBuilder::default();
  let mut parser = Parser::new_from_str(text);
  parser.load(&mut builder, false)?;
  Ok(YamlTree {
    nodes: builder.nodes,
    root: builder.root,
  })
}

#[derive(Default)]
struct TreeBuilder {
  nodes: Vec<YamlNode>,
  stack: Vec<NodeId>,
  root: Option<NodeId>,
}

impl TreeBuilder {
  fn push(&mut self, kind: NodeKind, tag: String, value: String, mark: Marker) -> NodeId {
    let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
    self.nodes.push(YamlNode {
      kind,
      tag,
      value,
      line: u32::try_from(mark.line()).unwrap_or(u32::MAX),
      column: u32::try_from(mark.col()).unwrap_or(u32::MAX).saturating_add(1),
      children: Vec::new(),
    });
    id
  }

  fn attach(&mut self, id: NodeId) {
    if let Some(parent) = self.stack.last().copied() {
      self.nodes[parent.index()].children.push(id);
    } else if self.root.is_none() {
      self.root = Some(id);
    }
  }
}

impl MarkedEventReceiver for TreeBuilder {
  fn on_event(&mut self, event: Event, mark: Marker) {
    match event {
      Event::Scalar(value, style, _, tag) => {
        let tag = resolve_scalar_tag(&value, style, tag.as_ref());
        let id = self.push(NodeKind::Scalar, tag, value, mark);
        self.attach(id);
      }
      Event::SequenceStart(..) => {
        let id = self.push(NodeKind::Sequence, "!!seq".to_string(), String::new(), mark);
        self.attach(id);
        self.stack.push(id);
      }
      Event::MappingStart(..) => {
        let id = self.push(NodeKind::Mapping, "!!map".to_string(), String::new(), mark);
        self.attach(id);
        self.stack.push(id);
      }
      Event::SequenceEnd | Event::MappingEnd => {
        self.stack.pop();
      }
      Event::Alias(_) => {
        // anchors/aliases carry no meaning in OpenAPI documents; a null
        // placeholder keeps mapping pairs aligned
        let id = self.push(NodeKind::Scalar, "!!null".to_string(), String::new(), mark);
        self.attach(id);
      }
      _ => {}
    }
  }
}

fn resolve_scalar_tag(value: &str, style: TScalarStyle, tag: Option<&Tag>) -> String {
  if let Some(tag) = tag {
    if tag.handle == "tag:yaml.org,2002:" || tag.handle == "!!" {
      return format!("!!{}", tag.suffix);
    }
    return format!("{}{}", tag.handle, tag.suffix);
  }
  if style != TScalarStyle::Plain {
    return "!!str".to_string();
  }
  implicit_tag(value).to_string()
}

fn implicit_tag(value: &str) -> &'static str {
  match value {
    "" | "~" | "null" | "Null" | "NULL" => "!!null",
    "true" | "false" => "!!bool",
    _ => {
      if value.parse::<i64>().is_ok() {
        "!!int"
      } else if value.parse::<f64>().is_ok() {
        "!!float"
      } else {
        "!!str"
      }
    }
  }
}
