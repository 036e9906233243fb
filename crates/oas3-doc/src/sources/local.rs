use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{FetchedFile, FileSource};
use crate::{error::DocError, utils};

/// Serves documents from a directory tree. Identifiers resolve against
/// the base directory; `..` components and symlinks are canonicalized
/// first, so paths that escape the base directory either way, or that
/// fall outside the filter set when one is configured, are rejected.
pub struct LocalSource {
  base_dir: PathBuf,
  filter: Vec<String>,
}

impl LocalSource {
  #[must_use]
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self::with_filter(base_dir, Vec::new())
  }

  #[must_use]
  pub fn with_filter(base_dir: impl Into<PathBuf>, filter: Vec<String>) -> Self {
    let base_dir = base_dir.into();
    let base_dir = std::path::absolute(&base_dir).unwrap_or(base_dir);
    let base_dir = lexical_normalize(&base_dir);
    Self {
      base_dir: std::fs::canonicalize(&base_dir).unwrap_or(base_dir),
      filter,
    }
  }

  #[must_use]
  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  /// Resolves an identifier to an on-disk path and its CID. Symlinks
  /// are followed before the escape check, so a link inside the base
  /// directory pointing outside it is rejected like any other escape.
  pub fn resolve(&self, identifier: &str) -> Result<(PathBuf, String), DocError> {
    let normalized = utils::normalize_path(identifier);
    let candidate = if normalized.starts_with('/') {
      PathBuf::from(&normalized)
    } else {
      self.base_dir.join(&normalized)
    };
    let resolved = resolve_symlinks(&lexical_normalize(&candidate));
    if !resolved.starts_with(&self.base_dir) {
      return Err(DocError::not_found(format!(
        "'{identifier}' escapes the base directory {}",
        self.base_dir.display()
      )));
    }
    if !self.filter.is_empty() {
      let relative = resolved
        .strip_prefix(&self.base_dir)
        .map(|p| utils::normalize_path(&p.to_string_lossy()))
        .unwrap_or_default();
      if !self.filter.iter().any(|allowed| utils::normalize_path(allowed) == relative) {
        return Err(DocError::not_found(format!("'{relative}' is not in the file filter")));
      }
    }
    let cid = utils::normalize_path(&resolved.to_string_lossy());
    Ok((resolved, cid))
  }
}

#[async_trait]
impl FileSource for LocalSource {
  async fn fetch(&self, identifier: &str) -> Result<FetchedFile, DocError> {
    let (path, cid) = self.resolve(identifier)?;
    let bytes = tokio::fs::read(&path)
      .await
      .map_err(|err| DocError::fetch(format!("cannot read '{}': {err}", path.display())).with_cid(&cid))?;
    Ok(FetchedFile { cid, bytes })
  }

  fn enumerate(&self) -> Vec<String> {
    if !self.filter.is_empty() {
      return self
        .filter
        .iter()
        .filter_map(|relative| self.resolve(relative).ok().map(|(_, cid)| cid))
        .collect();
    }
    walkdir::WalkDir::new(&self.base_dir)
      .follow_links(true)
      .into_iter()
      .filter_map(Result::ok)
      .filter(|entry| entry.file_type().is_file())
      .filter(|entry| {
        matches!(
          entry.path().extension().and_then(|ext| ext.to_str()),
          Some("yaml" | "yml" | "json")
        )
      })
      .map(|entry| utils::normalize_path(&entry.path().to_string_lossy()))
      .collect()
  }
}

/// Collapses `.` and `..` components without touching the filesystem, so
/// escape checks work for paths that do not exist yet.
fn lexical_normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      other => out.push(other),
    }
  }
  out
}

/// Follows symlinks through the filesystem. A path that does not exist
/// yet canonicalizes its deepest existing ancestor and keeps the rest
/// lexical, so missing files still surface as fetch errors rather than
/// escapes.
fn resolve_symlinks(path: &Path) -> PathBuf {
  if let Ok(real) = std::fs::canonicalize(path) {
    return real;
  }
  if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
    if let Ok(real_parent) = std::fs::canonicalize(parent) {
      return real_parent.join(name);
    }
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  #[tokio::test]
  async fn fetches_files_under_base_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("spec.yaml"), "a: 1\n").expect("write");

    let source = LocalSource::new(dir.path());
    let fetched = source.fetch("spec.yaml").await.expect("fetch");
    assert_eq!(fetched.bytes, b"a: 1\n");
    assert!(fetched.cid.ends_with("/spec.yaml"));
    assert!(fetched.cid.starts_with('/'));
  }

  #[tokio::test]
  async fn rejects_escapes_with_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = LocalSource::new(dir.path());
    let err = source.fetch("../outside.yaml").await.expect_err("escape");
    assert_eq!(err.kind, ErrorKind::NotFound);
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn rejects_symlinks_that_escape_the_base_directory() {
    let outside = tempfile::tempdir().expect("outside dir");
    std::fs::write(outside.path().join("secret.yaml"), "s: 1\n").expect("write");

    let dir = tempfile::tempdir().expect("tempdir");
    std::os::unix::fs::symlink(outside.path().join("secret.yaml"), dir.path().join("link.yaml")).expect("symlink");

    let source = LocalSource::new(dir.path());
    let err = source.fetch("link.yaml").await.expect_err("symlink escape");
    assert_eq!(err.kind, ErrorKind::NotFound);
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn follows_symlinks_that_stay_inside_the_base_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("real.yaml"), "a: 1\n").expect("write");
    std::os::unix::fs::symlink(dir.path().join("real.yaml"), dir.path().join("alias.yaml")).expect("symlink");

    let source = LocalSource::new(dir.path());
    let fetched = source.fetch("alias.yaml").await.expect("fetch");
    assert_eq!(fetched.bytes, b"a: 1\n");
    assert!(fetched.cid.ends_with("/real.yaml"));
  }

  #[tokio::test]
  async fn applies_file_filter() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("allowed.yaml"), "a: 1\n").expect("write");
    std::fs::write(dir.path().join("blocked.yaml"), "b: 2\n").expect("write");

    let source = LocalSource::with_filter(dir.path(), vec!["allowed.yaml".to_string()]);
    assert!(source.fetch("allowed.yaml").await.is_ok());
    let err = source.fetch("blocked.yaml").await.expect_err("filtered");
    assert_eq!(err.kind, ErrorKind::NotFound);
  }

  #[tokio::test]
  async fn missing_file_is_a_fetch_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = LocalSource::new(dir.path());
    let err = source.fetch("absent.yaml").await.expect_err("missing");
    assert_eq!(err.kind, ErrorKind::FetchError);
  }

  #[test]
  fn enumerate_lists_spec_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("one.yaml"), "a: 1\n").expect("write");
    std::fs::write(dir.path().join("two.json"), "{}\n").expect("write");
    std::fs::write(dir.path().join("notes.txt"), "skip\n").expect("write");

    let source = LocalSource::new(dir.path());
    let mut cids = source.enumerate();
    cids.sort();
    assert_eq!(cids.len(), 2);
    assert!(cids[0].ends_with("/one.yaml"));
    assert!(cids[1].ends_with("/two.json"));
  }
}
