//! Document build configuration.

use std::{path::PathBuf, sync::Arc};

use bon::Builder;
use url::Url;

use crate::sources::{FileSource, RemoteFetcher};

/// Options controlling reference lookup and circular-reference tolerance
/// during document construction.
#[derive(Clone, Builder)]
pub struct DocumentConfig {
  /// Root for remote references. Enables remote lookup when set.
  pub base_url: Option<Url>,

  /// Root for local file references. Enables file lookup when set.
  #[builder(into)]
  pub base_path: Option<PathBuf>,

  /// Replaces the default local filesystem source.
  pub local_source: Option<Arc<dyn FileSource>>,

  /// Replaces the default remote source.
  pub remote_source: Option<Arc<dyn FileSource>>,

  /// HTTP handler used by the default remote source.
  pub remote_fetcher: Option<Arc<dyn RemoteFetcher>>,

  /// Relative paths the local source may serve. Empty allows all.
  #[builder(default)]
  pub file_filter: Vec<String>,

  /// Suppress cycles whose critical edge runs through an array item.
  #[builder(default)]
  pub ignore_array_circular_references: bool,

  /// Suppress cycles whose critical edge runs through `oneOf`, `anyOf`,
  /// `allOf` or `not`.
  #[builder(default)]
  pub ignore_polymorphic_circular_references: bool,

  /// Disable circular-reference detection entirely.
  #[builder(default)]
  pub skip_circular_reference_check: bool,
}

impl DocumentConfig {
  #[must_use]
  pub fn allow_file_lookup(&self) -> bool {
    self.base_path.is_some() || self.local_source.is_some()
  }

  #[must_use]
  pub fn allow_remote_lookup(&self) -> bool {
    self.base_url.is_some() || self.remote_source.is_some()
  }
}

impl Default for DocumentConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_flags_derive_from_roots() {
    let config = DocumentConfig::default();
    assert!(!config.allow_file_lookup());
    assert!(!config.allow_remote_lookup());

    let config = DocumentConfig::builder().base_path("/tmp/spec").build();
    assert!(config.allow_file_lookup());
    assert!(!config.allow_remote_lookup());

    let url = Url::parse("https://example.com/specs/").expect("url");
    let config = DocumentConfig::builder().base_url(url).build();
    assert!(config.allow_remote_lookup());
  }
}
