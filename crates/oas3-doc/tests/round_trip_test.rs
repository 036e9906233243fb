use oas3_doc::{DocumentConfig, build_high_document, yaml::YamlTree};

const PETSTORE: &str = "openapi: 3.0.0\n\
info:\n  title: Pet Store\n  version: 1.0.0\n  x-team: platform\n\
servers:\n  - url: https://api.example.com\n\
tags:\n  - name: pets\n\
paths:\n  /pets:\n    get:\n      operationId: listPets\n      tags:\n        - pets\n      parameters:\n        - name: limit\n          in: query\n          schema:\n            type: integer\n      responses:\n        '200':\n          description: ok\n          content:\n            application/json:\n              schema:\n                type: array\n                items:\n                  $ref: '#/components/schemas/Pet'\n\
components:\n  schemas:\n    Pet:\n      type: object\n      required:\n        - name\n      properties:\n        name:\n          type: string\n        tag:\n          type: string\n\
security:\n  - api_key: []\n";

/// Recursively collects mapping key order for structural comparison.
fn key_tree(tree: &YamlTree, node: oas3_doc::yaml::NodeId) -> Vec<(String, Vec<String>)> {
  let mut out = Vec::new();
  collect_keys(tree, node, String::new(), &mut out);
  out
}

fn collect_keys(tree: &YamlTree, node: oas3_doc::yaml::NodeId, path: String, out: &mut Vec<(String, Vec<String>)>) {
  let keys: Vec<String> = tree
    .pairs(node)
    .filter_map(|(key, _)| tree.scalar(key).map(str::to_string))
    .collect();
  if !keys.is_empty() {
    out.push((path.clone(), keys));
  }
  for (key, value) in tree.pairs(node) {
    let name = tree.scalar(key).unwrap_or_default();
    collect_keys(tree, value, format!("{path}/{name}"), out);
  }
  let items: Vec<_> = tree.items(node).collect();
  for (position, item) in items.into_iter().enumerate() {
    collect_keys(tree, item, format!("{path}/{position}"), out);
  }
}

#[tokio::test]
async fn parse_render_parse_preserves_mapping_order() {
  let (document, errors) = build_high_document(PETSTORE, DocumentConfig::default()).await.expect("document");
  assert!(errors.is_empty(), "unexpected errors: {errors:?}");

  let rendered = document.render();

  let original = YamlTree::parse(PETSTORE).expect("original");
  let reparsed = YamlTree::parse(&rendered).expect("rendered parses");
  let original_keys = key_tree(&original, original.root().expect("root"));
  let reparsed_keys = key_tree(&reparsed, reparsed.root().expect("root"));
  assert_eq!(original_keys, reparsed_keys, "rendered:\n{rendered}");
}

#[tokio::test]
async fn render_is_stable_across_a_second_pass() {
  let (document, _) = build_high_document(PETSTORE, DocumentConfig::default()).await.expect("document");
  let first = document.render();

  let (second_document, errors) = build_high_document(&first, DocumentConfig::default()).await.expect("document");
  assert!(errors.is_empty());
  let second = second_document.render();
  assert_eq!(first, second);
}

#[tokio::test]
async fn refs_round_trip_without_flattening() {
  let (document, _) = build_high_document(PETSTORE, DocumentConfig::default()).await.expect("document");
  let rendered = document.render();
  assert!(rendered.contains("$ref"));
  assert!(rendered.contains("#/components/schemas/Pet"));
}

#[tokio::test]
async fn edits_render_at_the_end_of_their_container() {
  let (mut document, _) = build_high_document(PETSTORE, DocumentConfig::default()).await.expect("document");
  if let Some(info) = document.info.as_mut() {
    info.description = Some("edited".to_string());
  }
  let rendered = document.render();

  let tree = YamlTree::parse(&rendered).expect("parse");
  let root = tree.root().expect("root");
  let info_value = tree
    .pairs(root)
    .find(|(key, _)| tree.scalar(*key) == Some("info"))
    .map(|(_, value)| value)
    .expect("info");
  let info_keys: Vec<_> = tree
    .pairs(info_value)
    .filter_map(|(key, _)| tree.scalar(key).map(str::to_string))
    .collect();
  assert_eq!(info_keys, vec!["title", "version", "x-team", "description"]);
}

#[tokio::test]
async fn new_extensions_render_at_the_bottom() {
  let (mut document, _) = build_high_document(PETSTORE, DocumentConfig::default()).await.expect("document");
  if let Some(info) = document.info.as_mut() {
    info
      .extensions
      .insert("x-added".to_string(), yaml_rust2::yaml::Yaml::String("later".to_string()));
  }
  let rendered = document.render();

  let tree = YamlTree::parse(&rendered).expect("parse");
  let root = tree.root().expect("root");
  let info_value = tree
    .pairs(root)
    .find(|(key, _)| tree.scalar(*key) == Some("info"))
    .map(|(_, value)| value)
    .expect("info");
  let info_keys: Vec<_> = tree
    .pairs(info_value)
    .filter_map(|(key, _)| tree.scalar(key).map(str::to_string))
    .collect();
  assert_eq!(info_keys, vec!["title", "version", "x-team", "x-added"]);
}

#[tokio::test]
async fn security_requirements_keep_empty_scope_lists() {
  let (document, _) = build_high_document(PETSTORE, DocumentConfig::default()).await.expect("document");
  let rendered = document.render();
  assert!(rendered.contains("api_key"));
}
