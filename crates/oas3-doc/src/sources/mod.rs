//! Document sources: abstractions over where referenced files come from.

mod local;
mod remote;

use async_trait::async_trait;
use url::Url;

pub use local::LocalSource;
pub use remote::{HttpFetcher, RemoteSource};

use crate::error::DocError;

/// Bytes delivered by a source together with the canonical identifier
/// they were resolved to.
#[derive(Debug, Clone)]
pub struct FetchedFile {
  pub cid: String,
  pub bytes: Vec<u8>,
}

/// A namespace of documents addressable by relative or absolute
/// identifiers.
#[async_trait]
pub trait FileSource: Send + Sync {
  /// Resolves `identifier` to a canonical identifier and delivers the
  /// document bytes.
  async fn fetch(&self, identifier: &str) -> Result<FetchedFile, DocError>;

  /// Canonical identifiers this source can currently serve. Used only by
  /// eager indexing modes.
  fn enumerate(&self) -> Vec<String>;
}

/// HTTP response body and content type for a remote fetch.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
  pub bytes: Vec<u8>,
  pub content_type: Option<String>,
}

/// Injectable HTTP transport. Implementations must be idempotent; the
/// remote source caches bodies and never re-fetches a cached identifier.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
  async fn fetch(&self, url: &Url) -> Result<RemoteResponse, DocError>;
}
