//! The rolodex: registry and cache of every document reachable from the
//! root. The single authority for resolving a reference location to a
//! parsed, indexed document.

use std::{
  collections::{HashMap, HashSet, VecDeque},
  sync::Arc,
};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
  cycles,
  error::DocError,
  index::SpecIndex,
  resolver::{self, ReferenceGraph},
  sources::FileSource,
  utils,
  yaml::{NodeId, YamlTree},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
  Root,
  Local,
  Remote,
}

/// One parsed document. Created on first reference to its CID and kept
/// for the lifetime of the rolodex.
#[derive(Debug, Clone)]
pub struct RolodexEntry {
  pub cid: String,
  pub kind: SourceKind,
  pub tree: Arc<YamlTree>,
  pub index: Arc<SpecIndex>,
}

/// A fully resolved reference target, usable without further lookup.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
  pub cid: String,
  pub pointer: String,
  pub node: NodeId,
  pub tree: Arc<YamlTree>,
}

#[derive(Default)]
pub struct Rolodex {
  root_cid: Option<String>,
  entries: IndexMap<String, RolodexEntry>,
  locals: Vec<(String, Arc<dyn FileSource>)>,
  remotes: Vec<(String, Arc<dyn FileSource>)>,
  resolved: HashMap<(String, String), ResolvedTarget>,
  location_cache: HashMap<(String, String), String>,
  errors: Vec<DocError>,
  graph: Option<ReferenceGraph>,
  indexed: bool,
  cycle_checked: bool,
  pub ignore_array_cycles: bool,
  pub ignore_polymorphic_cycles: bool,
}

impl Rolodex {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers the root document. All subsequent references resolve
  /// relative to `cid`.
  pub fn set_root(&mut self, cid: impl Into<String>, tree: Arc<YamlTree>) {
    let cid = cid.into();
    let index = Arc::new(SpecIndex::build(cid.clone(), tree.clone()));
    self.root_cid = Some(cid.clone());
    self.entries.insert(
      cid.clone(),
      RolodexEntry {
        cid,
        kind: SourceKind::Root,
        tree,
        index,
      },
    );
  }

  /// Mounts a local source at a base-directory prefix.
  pub fn add_local_source(&mut self, mount: impl Into<String>, source: Arc<dyn FileSource>) {
    self.locals.push((utils::normalize_path(&mount.into()), source));
  }

  /// Mounts a remote source at a base-URL prefix.
  pub fn add_remote_source(&mut self, mount: impl Into<String>, source: Arc<dyn FileSource>) {
    self.remotes.push((mount.into(), source));
  }

  #[must_use]
  pub fn root(&self) -> Option<&RolodexEntry> {
    self.root_cid.as_ref().and_then(|cid| self.entries.get(cid))
  }

  #[must_use]
  pub fn root_cid(&self) -> Option<&str> {
    self.root_cid.as_deref()
  }

  #[must_use]
  pub fn entry(&self, cid: &str) -> Option<&RolodexEntry> {
    self.entries.get(cid)
  }

  pub fn entries(&self) -> impl Iterator<Item = &RolodexEntry> {
    self.entries.values()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[must_use]
  pub fn errors(&self) -> &[DocError] {
    &self.errors
  }

  pub(crate) fn push_error(&mut self, error: DocError) {
    self.errors.push(error);
  }

  #[must_use]
  pub fn graph(&self) -> Option<&ReferenceGraph> {
    self.graph.as_ref()
  }

  pub(crate) fn record_resolved(&mut self, origin: &str, raw: &str, target: ResolvedTarget) {
    self.resolved.insert((origin.to_string(), raw.to_string()), target);
  }

  /// The pre-resolved target of a raw reference string seen in `origin`,
  /// if the resolver linked it.
  #[must_use]
  pub fn resolved_target(&self, origin: &str, raw: &str) -> Option<&ResolvedTarget> {
    self.resolved.get(&(origin.to_string(), raw.to_string()))
  }

  /// Parses a reference into a target document and pointer, fetching and
  /// indexing the target document on first sight.
  pub async fn resolve(&mut self, ref_str: &str, origin_cid: &str) -> Result<(String, String), DocError> {
    let (location, pointer) = split_ref(ref_str);
    if location.is_empty() {
      return Ok((origin_cid.to_string(), pointer));
    }
    let cid = self.ensure_document(location, origin_cid).await?;
    self
      .location_cache
      .insert((origin_cid.to_string(), ref_str.to_string()), cid.clone());
    Ok((cid, pointer))
  }

  /// Target CID a raw reference resolved to during indexing, if any.
  #[must_use]
  pub(crate) fn cached_location(&self, origin: &str, raw: &str) -> Option<&String> {
    self.location_cache.get(&(origin.to_string(), raw.to_string()))
  }

  /// Materializes every document transitively reachable from the root.
  /// Idempotent; failures accumulate in the error list.
  pub async fn index_all(&mut self) {
    if self.indexed {
      return;
    }
    self.indexed = true;
    let Some(root) = self.root_cid.clone() else {
      return;
    };

    let mut queue = VecDeque::from([root.clone()]);
    let mut seen = HashSet::from([root]);
    while let Some(cid) = queue.pop_front() {
      let Some(entry) = self.entries.get(&cid) else {
        continue;
      };
      let sites: Vec<_> = entry
        .index
        .refs()
        .iter()
        .map(|site| (site.ref_str.clone(), site.line, site.column))
        .collect();
      for (ref_str, line, column) in sites {
        if split_ref(&ref_str).0.is_empty() {
          continue;
        }
        match self.resolve(&ref_str, &cid).await {
          Ok((target_cid, _)) => {
            if seen.insert(target_cid.clone()) {
              queue.push_back(target_cid);
            }
          }
          Err(err) => {
            warn!(reference = %ref_str, origin = %cid, "reference resolution failed");
            self.errors.push(err.with_location(line, column));
          }
        }
      }
    }
    debug!(documents = self.entries.len(), "rolodex indexed");
  }

  /// Runs the cycle detector over the aggregated reference graph,
  /// building the graph first if the resolver has not run. Idempotent.
  pub fn check_for_circular_references(&mut self) {
    if self.cycle_checked {
      return;
    }
    self.cycle_checked = true;
    if self.graph.is_none() {
      resolver::resolve_references(self);
    }
    let Some(graph) = self.graph.as_ref() else {
      return;
    };
    let cycles = cycles::detect_cycles(graph);
    let reported = cycles::report(&cycles, self.ignore_array_cycles, self.ignore_polymorphic_cycles);
    debug!(detected = cycles.len(), reported = reported.len(), "cycle check complete");
    self.errors.extend(reported);
  }

  pub(crate) fn set_graph(&mut self, graph: ReferenceGraph) {
    self.graph = Some(graph);
  }

  async fn ensure_document(&mut self, location: &str, origin: &str) -> Result<String, DocError> {
    let target = self.classify_location(location, origin);
    match target {
      Target::Local(identifier) => {
        let source = self
          .pick_local(&identifier)
          .ok_or_else(|| DocError::not_found(format!("no local source configured for '{location}'")))?;
        self.load(SourceKind::Local, source, &identifier).await
      }
      Target::Remote(identifier) => {
        let source = self
          .pick_remote(&identifier)
          .ok_or_else(|| DocError::not_found(format!("no remote source configured for '{location}'")))?;
        self.load(SourceKind::Remote, source, &identifier).await
      }
    }
  }

  async fn load(&mut self, kind: SourceKind, source: Arc<dyn FileSource>, identifier: &str) -> Result<String, DocError> {
    let fetched = source.fetch(identifier).await?;
    if self.entries.contains_key(&fetched.cid) {
      return Ok(fetched.cid);
    }
    let text = String::from_utf8_lossy(&fetched.bytes);
    // a parse failure surfaces as ParseError while the referencing site
    // stays unresolved; the caller records it once
    let tree = YamlTree::parse(&text).map_err(|err| DocError::parse(err.to_string()).with_cid(&fetched.cid))?;
    let tree = Arc::new(tree);
    let index = Arc::new(SpecIndex::build(fetched.cid.clone(), tree.clone()));
    debug!(cid = %fetched.cid, "document added to rolodex");
    self.entries.insert(
      fetched.cid.clone(),
      RolodexEntry {
        cid: fetched.cid.clone(),
        kind,
        tree,
        index,
      },
    );
    Ok(fetched.cid)
  }

  fn classify_location(&self, location: &str, origin: &str) -> Target {
    if location.contains("://") {
      return Target::Remote(location.to_string());
    }
    let origin_is_remote = origin.contains("://");
    let normalized = utils::normalize_path(location);
    if normalized.starts_with('/') {
      // absolute paths prefer a local source whenever one is mounted
      if !self.locals.is_empty() {
        return Target::Local(normalized);
      }
      if origin_is_remote {
        return Target::Remote(join_remote(origin, &normalized));
      }
      return Target::Local(normalized);
    }
    if origin_is_remote {
      return Target::Remote(join_remote(origin, &normalized));
    }
    Target::Local(join_local(origin, &normalized))
  }

  fn pick_local(&self, identifier: &str) -> Option<Arc<dyn FileSource>> {
    self
      .locals
      .iter()
      .filter(|(mount, _)| identifier.starts_with(mount.as_str()))
      .max_by_key(|(mount, _)| mount.len())
      .or_else(|| self.locals.first())
      .map(|(_, source)| source.clone())
  }

  fn pick_remote(&self, identifier: &str) -> Option<Arc<dyn FileSource>> {
    self
      .remotes
      .iter()
      .filter(|(mount, _)| identifier.starts_with(mount.as_str()))
      .max_by_key(|(mount, _)| mount.len())
      .or_else(|| self.remotes.first())
      .map(|(_, source)| source.clone())
  }
}

enum Target {
  Local(String),
  Remote(String),
}

/// Splits a raw reference into `(location, pointer)`. An empty location
/// means the same document.
#[must_use]
pub fn split_ref(ref_str: &str) -> (&str, String) {
  match ref_str.split_once('#') {
    Some((location, pointer)) => {
      let pointer = if pointer.is_empty() || pointer.starts_with('/') {
        pointer.to_string()
      } else {
        format!("/{pointer}")
      };
      (location, pointer)
    }
    None => (ref_str, String::new()),
  }
}

fn join_local(origin: &str, relative: &str) -> String {
  let dir = origin.rsplit_once('/').map_or("", |(dir, _)| dir);
  let mut base: Vec<&str> = dir.split('/').collect();
  let mut rest: Vec<&str> = Vec::new();
  for segment in relative.split('/') {
    match segment {
      "." | "" => {}
      ".." => {
        if rest.pop().is_none() {
          base.pop();
        }
      }
      other => rest.push(other),
    }
  }
  let joined = if rest.is_empty() {
    base.join("/")
  } else {
    // refs often repeat the last directory segment of their origin;
    // collapse the shared boundary instead of doubling it
    utils::join_path_overlap(&base.join("/"), &rest.join("/"), "/")
  };
  if joined.starts_with('/') { joined } else { format!("/{joined}") }
}

fn join_remote(origin: &str, relative: &str) -> String {
  url::Url::parse(origin)
    .ok()
    .and_then(|base| base.join(relative).ok())
    .map_or_else(|| relative.to_string(), |joined| joined.to_string())
}
