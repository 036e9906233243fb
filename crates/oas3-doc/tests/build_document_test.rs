use std::sync::Arc;

use oas3_doc::{
  DocumentConfig, ErrorKind, build_document,
  cycles::CycleKind,
  rolodex::Rolodex,
  yaml::YamlTree,
};

#[tokio::test]
async fn minimal_valid_document() {
  let source = "openapi: \"3.0.0\"\ninfo:\n  title: t\n  version: v\n";
  let result = build_document(source, DocumentConfig::default()).await.expect("document");

  assert!(result.errors.is_empty());
  assert_eq!(result.document.version.value, "3.0.0");
  let info = result.document.info.expect("info");
  assert_eq!(info.value.title.as_ref().map(|t| t.value.as_str()), Some("t"));
  assert_eq!(info.value.version.as_ref().map(|v| v.value.as_str()), Some("v"));
}

#[tokio::test]
async fn missing_version_returns_no_document() {
  let err = build_document("info:\n  title: t\n", DocumentConfig::default())
    .await
    .expect_err("fatal");
  assert_eq!(err.kind, ErrorKind::MissingVersion);
}

#[tokio::test]
async fn local_ref_resolves_without_cycle() {
  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\ncomponents:\n  schemas:\n    A:\n      type: object\n      properties:\n        x:\n          $ref: '#/components/schemas/B'\n    B:\n      type: string\n";
  let result = build_document(source, DocumentConfig::default()).await.expect("document");

  assert!(result.errors.is_empty());
  let graph = result.rolodex.graph().expect("graph");
  assert_eq!(graph.edge_count(), 1);
  assert!(graph.records().iter().all(|record| record.resolved));
}

#[tokio::test]
async fn self_recursive_schema_reports_direct_cycle() {
  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\ncomponents:\n  schemas:\n    A:\n      type: object\n      properties:\n        next:\n          $ref: '#/components/schemas/A'\n";
  let result = build_document(source, DocumentConfig::default()).await.expect("document");

  let circular: Vec<_> = result
    .errors
    .iter()
    .filter(|error| error.kind == ErrorKind::CircularReference)
    .collect();
  assert_eq!(circular.len(), 1);
  assert!(circular[0].message.contains("A -> A"));

  // the document itself still builds
  assert!(result.document.components.is_some());
}

#[tokio::test]
async fn skip_flag_disables_cycle_check() {
  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\ncomponents:\n  schemas:\n    A:\n      type: object\n      properties:\n        next:\n          $ref: '#/components/schemas/A'\n";
  let config = DocumentConfig::builder().skip_circular_reference_check(true).build();
  let result = build_document(source, config).await.expect("document");
  assert!(result.errors.iter().all(|error| error.kind != ErrorKind::CircularReference));
}

#[tokio::test]
async fn one_of_recursion_is_polymorphic_and_suppressible() {
  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\ncomponents:\n  schemas:\n    A:\n      oneOf:\n        - $ref: '#/components/schemas/A'\n";

  let result = build_document(source, DocumentConfig::default()).await.expect("document");
  let circular: Vec<_> = result
    .errors
    .iter()
    .filter(|error| error.kind == ErrorKind::CircularReference)
    .collect();
  assert_eq!(circular.len(), 1);
  let cycles = oas3_doc::cycles::detect_cycles(result.rolodex.graph().expect("graph"));
  assert_eq!(cycles[0].kind, CycleKind::Polymorphic);

  let config = DocumentConfig::builder().ignore_polymorphic_circular_references(true).build();
  let result = build_document(source, config).await.expect("document");
  assert!(result.errors.iter().all(|error| error.kind != ErrorKind::CircularReference));
}

#[tokio::test]
async fn external_file_ref_adds_rolodex_entry() {
  let dir = tempfile::tempdir().expect("tempdir");
  std::fs::write(dir.path().join("file.yaml"), "X:\n  type: string\n").expect("write");

  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\ncomponents:\n  schemas:\n    A:\n      type: object\n      properties:\n        x:\n          $ref: 'file.yaml#/X'\n";
  let config = DocumentConfig::builder().base_path(dir.path().to_string_lossy().to_string()).build();
  let result = build_document(source, config).await.expect("document");

  assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
  assert_eq!(result.rolodex.len(), 2);
  let graph = result.rolodex.graph().expect("graph");
  assert!(graph.records().iter().all(|record| record.resolved));
  assert!(oas3_doc::cycles::detect_cycles(graph).is_empty());
}

#[tokio::test]
async fn rolodex_cids_are_absolute_and_canonical() {
  let dir = tempfile::tempdir().expect("tempdir");
  std::fs::write(dir.path().join("file.yaml"), "X:\n  type: string\n").expect("write");

  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\ncomponents:\n  schemas:\n    A:\n      properties:\n        x:\n          $ref: 'file.yaml#/X'\n";
  let config = DocumentConfig::builder().base_path(dir.path().to_string_lossy().to_string()).build();
  let result = build_document(source, config).await.expect("document");

  for entry in result.rolodex.entries() {
    assert!(entry.cid.starts_with('/'), "cid not absolute: {}", entry.cid);
    assert!(!entry.cid.contains('\\'));
    assert!(result.rolodex.entry(&entry.cid).is_some());
  }
}

#[tokio::test]
async fn unresolved_reference_is_recorded_not_fatal() {
  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\ncomponents:\n  schemas:\n    A:\n      properties:\n        x:\n          $ref: '#/components/schemas/Missing'\n";
  let result = build_document(source, DocumentConfig::default()).await.expect("document");

  assert_eq!(result.errors.len(), 1);
  assert_eq!(result.errors[0].kind, ErrorKind::NotFound);
  assert!(result.errors[0].line.is_some());
  let graph = result.rolodex.graph().expect("graph");
  assert!(graph.records().iter().any(|record| !record.resolved));
}

#[test]
fn cycle_check_is_idempotent() {
  let mut rolodex = Rolodex::new();
  let tree = Arc::new(
    YamlTree::parse(
      "components:\n  schemas:\n    A:\n      properties:\n        next:\n          $ref: '#/components/schemas/A'\n",
    )
    .expect("parse"),
  );
  rolodex.set_root("/spec/root.yaml", tree);
  rolodex.check_for_circular_references();
  let errors = rolodex.errors().len();
  assert_eq!(errors, 1);
  rolodex.check_for_circular_references();
  assert_eq!(rolodex.errors().len(), errors);
}

#[tokio::test]
async fn low_field_lines_are_positive() {
  let source = "openapi: 3.0.0\ninfo:\n  title: t\n  version: v\nservers:\n  - url: https://api.example.com\n";
  let result = build_document(source, DocumentConfig::default()).await.expect("document");

  assert!(result.document.version.line >= 1);
  let info = result.document.info.expect("info");
  assert!(info.line >= 1);
  assert!(info.value.title.as_ref().is_some_and(|t| t.line >= 1));
  let servers = result.document.servers.expect("servers");
  assert!(servers.value.iter().all(|server| server.line >= 1));
}
