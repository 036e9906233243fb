//! Document construction: version gate, rolodex assembly, reference
//! resolution, cycle check, then concurrent extraction of the top-level
//! sections.
//!
//! Section extractions run as parallel tasks joined by a completion
//! barrier. An error in one section never cancels its siblings; all
//! errors are collected after the barrier so independent failures are
//! reported together.

use std::sync::Arc;

use tracing::debug;

use super::{
  Components, Document, ExternalDocs, Info, LowMap, NodeRef, PathItem, Paths, SecurityRequirement, Server, Tag,
  ValueRef,
  extract::{
    Buildable, ExtractContext, build_from_node, extract_array, extract_extensions, extract_map, extract_object,
    extract_string,
  },
};
use crate::{
  config::DocumentConfig,
  error::DocError,
  resolver,
  rolodex::Rolodex,
  sources::{LocalSource, RemoteSource},
  utils,
  yaml::{NodeId, YamlTree},
};

/// Pre-scan of a raw document: the parsed tree and the `openapi` version
/// field with its node identity.
#[derive(Debug, Clone)]
pub struct SpecInfo {
  pub tree: Arc<YamlTree>,
  pub version: NodeRef<String>,
}

impl SpecInfo {
  /// Parses the document and locates the `openapi` field. A missing
  /// field is fatal; nothing else is inspected here.
  pub fn parse(text: &str) -> Result<Self, DocError> {
    let tree = YamlTree::parse(text).map_err(|err| DocError::parse(err.to_string()))?;
    let root = tree.root().ok_or_else(|| DocError::parse("document is empty"))?;
    let hit = utils::find_key_top(&tree, root, "openapi")
      .ok_or_else(|| DocError::missing_version("no openapi version/tag found, cannot create document"))?;
    let value = tree
      .scalar(hit.value)
      .ok_or_else(|| DocError::missing_version("openapi version must be a scalar"))?
      .to_string();
    let version = NodeRef::new(value, Some(hit.key), Some(hit.value), tree.node(hit.key).line);
    Ok(Self {
      tree: Arc::new(tree),
      version,
    })
  }
}

/// A best-effort document plus every error recovered along the way. A
/// non-empty error list does not invalidate the document.
pub struct DocumentBuildResult {
  pub document: Document,
  pub errors: Vec<DocError>,
  pub rolodex: Arc<Rolodex>,
}

impl std::fmt::Debug for DocumentBuildResult {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DocumentBuildResult")
      .field("document", &self.document)
      .field("errors", &self.errors)
      .finish_non_exhaustive()
  }
}

/// Builds the low document: assembles the rolodex from the configuration,
/// indexes all reachable documents, resolves references, checks cycles,
/// then extracts the top-level sections concurrently.
pub async fn create_document(info: SpecInfo, config: DocumentConfig) -> Result<DocumentBuildResult, DocError> {
  let mut rolodex = Rolodex::new();
  rolodex.ignore_array_cycles = config.ignore_array_circular_references;
  rolodex.ignore_polymorphic_cycles = config.ignore_polymorphic_circular_references;

  let root_cid = root_cid(&config);
  rolodex.set_root(root_cid, info.tree.clone());

  if let Some(base_path) = &config.base_path {
    let base_path = std::path::absolute(base_path).unwrap_or_else(|_| base_path.clone());
    let mount = utils::normalize_path(&base_path.to_string_lossy());
    let source = config
      .local_source
      .clone()
      .unwrap_or_else(|| Arc::new(LocalSource::with_filter(&base_path, config.file_filter.clone())));
    rolodex.add_local_source(mount, source);
  } else if let Some(source) = config.local_source.clone() {
    rolodex.add_local_source("/", source);
  }

  if let Some(base_url) = &config.base_url {
    let source = config.remote_source.clone().unwrap_or_else(|| {
      let remote = match config.remote_fetcher.clone() {
        Some(fetcher) => RemoteSource::with_fetcher(base_url.clone(), fetcher),
        None => RemoteSource::new(base_url.clone()),
      };
      Arc::new(remote)
    });
    rolodex.add_remote_source(base_url.to_string(), source);
  } else if let Some(source) = config.remote_source.clone() {
    rolodex.add_remote_source("", source);
  }

  rolodex.index_all().await;
  resolver::resolve_references(&mut rolodex);
  if !config.skip_circular_reference_check {
    rolodex.check_for_circular_references();
  }

  let mut errors: Vec<DocError> = rolodex.errors().to_vec();
  let rolodex = Arc::new(rolodex);
  let ctx = ExtractContext::for_root(&rolodex)
    .ok_or_else(|| DocError::build("rolodex has no root document"))?;
  let root = ctx.tree.root().ok_or_else(|| DocError::build("root document has no content"))?;

  let mut document = Document::new(info.version);
  document.extensions = extract_extensions(&ctx.tree, root);
  document.json_schema_dialect = extract_string(&ctx.tree, root, "jsonSchemaDialect");

  let sections = [
    SectionKind::Info,
    SectionKind::Servers,
    SectionKind::Tags,
    SectionKind::Components,
    SectionKind::Security,
    SectionKind::ExternalDocs,
    SectionKind::Paths,
    SectionKind::Webhooks,
  ];
  let mut handles = Vec::with_capacity(sections.len());
  for kind in sections {
    let ctx = ctx.clone();
    handles.push(tokio::spawn(async move { extract_section(kind, &ctx, root) }));
  }

  // completion barrier: every sibling finishes before errors are read
  for handle in handles {
    match handle.await {
      Ok(Ok(section)) => apply_section(&mut document, section),
      Ok(Err(err)) => errors.push(err),
      Err(join_err) => errors.push(DocError::build(format!("extraction task failed: {join_err}"))),
    }
  }

  debug!(errors = errors.len(), "document build complete");
  Ok(DocumentBuildResult {
    document,
    errors,
    rolodex,
  })
}

fn root_cid(config: &DocumentConfig) -> String {
  match &config.base_path {
    Some(base_path) => {
      let base_path = std::path::absolute(base_path).unwrap_or_else(|_| base_path.clone());
      format!("{}/__root__.yaml", utils::normalize_path(&base_path.to_string_lossy()))
    }
    None => "/__root__.yaml".to_string(),
  }
}

#[derive(Clone, Copy)]
enum SectionKind {
  Info,
  Servers,
  Tags,
  Components,
  Security,
  ExternalDocs,
  Paths,
  Webhooks,
}

enum Section {
  Info(Option<NodeRef<Info>>),
  Servers(Option<NodeRef<Vec<ValueRef<Server>>>>),
  Tags(Option<NodeRef<Vec<ValueRef<Tag>>>>),
  Components(Option<NodeRef<Components>>),
  Security(Option<NodeRef<Vec<ValueRef<SecurityRequirement>>>>),
  ExternalDocs(Option<NodeRef<ExternalDocs>>),
  Paths(Option<NodeRef<Paths>>),
  Webhooks(Option<NodeRef<LowMap<PathItem>>>),
}

fn extract_section(kind: SectionKind, ctx: &ExtractContext, root: NodeId) -> Result<Section, DocError> {
  match kind {
    SectionKind::Info => Ok(Section::Info(extract_object("info", root, ctx)?)),
    SectionKind::Servers => Ok(Section::Servers(extract_tolerant_array("servers", root, ctx))),
    SectionKind::Tags => Ok(Section::Tags(extract_tolerant_array("tags", root, ctx))),
    SectionKind::Components => Ok(Section::Components(extract_object("components", root, ctx)?)),
    SectionKind::Security => Ok(Section::Security(extract_array("security", root, ctx)?)),
    SectionKind::ExternalDocs => Ok(Section::ExternalDocs(extract_object("externalDocs", root, ctx)?)),
    SectionKind::Paths => Ok(Section::Paths(extract_object("paths", root, ctx)?)),
    SectionKind::Webhooks => Ok(Section::Webhooks(extract_map("webhooks", root, ctx)?)),
  }
}

fn apply_section(document: &mut Document, section: Section) {
  match section {
    Section::Info(value) => document.info = value,
    Section::Servers(value) => document.servers = value,
    Section::Tags(value) => document.tags = value,
    Section::Components(value) => document.components = value,
    Section::Security(value) => document.security = value,
    Section::ExternalDocs(value) => document.external_docs = value,
    Section::Paths(value) => document.paths = value,
    Section::Webhooks(value) => document.webhooks = value,
  }
}

/// `servers` and `tags` tolerate malformed shapes: a non-array value or
/// non-mapping items are skipped without reporting.
fn extract_tolerant_array<T: Buildable>(
  label: &str,
  root: NodeId,
  ctx: &ExtractContext,
) -> Option<NodeRef<Vec<ValueRef<T>>>> {
  let tree = &ctx.tree;
  let hit = utils::find_key_top(tree, root, label)?;
  if !utils::is_array(tree, hit.value) {
    return None;
  }
  let mut items = Vec::new();
  for item in tree.items(hit.value) {
    if !utils::is_map(tree, item) {
      continue;
    }
    let Ok(built) = build_from_node::<T>(item, None, ctx) else {
      continue;
    };
    let mut value = ValueRef::new(built.value, item, tree.node(item).line);
    value.reference = built.reference;
    items.push(value);
  }
  Some(NodeRef::new(items, Some(hit.key), Some(hit.value), tree.node(hit.key).line))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  #[tokio::test]
  async fn builds_minimal_document() {
    let info = SpecInfo::parse("openapi: \"3.0.0\"\ninfo:\n  title: t\n  version: v\n").expect("spec info");
    let result = create_document(info, DocumentConfig::default()).await.expect("document");
    assert!(result.errors.is_empty());
    assert_eq!(result.document.version.value, "3.0.0");
    let doc_info = result.document.info.expect("info");
    assert_eq!(doc_info.value.title.as_ref().map(|t| t.value.as_str()), Some("t"));
    assert_eq!(doc_info.value.version.as_ref().map(|v| v.value.as_str()), Some("v"));
  }

  #[test]
  fn missing_version_is_fatal() {
    let err = SpecInfo::parse("info:\n  title: t\n").expect_err("missing version");
    assert_eq!(err.kind, ErrorKind::MissingVersion);
  }

  #[tokio::test]
  async fn non_array_servers_and_tags_are_skipped_silently() {
    let info = SpecInfo::parse("openapi: 3.0.0\nservers: broken\ntags:\n  not: an array\n").expect("spec info");
    let result = create_document(info, DocumentConfig::default()).await.expect("document");
    assert!(result.errors.is_empty());
    assert!(result.document.servers.is_none());
    assert!(result.document.tags.is_none());
  }

  #[tokio::test]
  async fn webhooks_and_dialect_extract_for_31() {
    let info = SpecInfo::parse(
      "openapi: 3.1.0\njsonSchemaDialect: https://json-schema.org/draft/2020-12/schema\nwebhooks:\n  newPet:\n    post:\n      responses:\n        '200':\n          description: ok\n",
    )
    .expect("spec info");
    let result = create_document(info, DocumentConfig::default()).await.expect("document");
    assert!(result.errors.is_empty());
    assert!(result.document.json_schema_dialect.is_some());
    let webhooks = result.document.webhooks.expect("webhooks");
    assert!(webhooks.value.get("newPet").is_some());
  }
}
