use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError, RwLock},
};

use async_trait::async_trait;
use url::Url;

use super::{FetchedFile, FileSource, RemoteFetcher, RemoteResponse};
use crate::error::DocError;

/// Serves documents from a remote HTTP namespace rooted at a base URL.
/// Response bodies are cached by canonical URL; a cached identifier never
/// re-invokes the fetcher, even after the fetcher is replaced.
pub struct RemoteSource {
  base_url: Url,
  fetcher: RwLock<Arc<dyn RemoteFetcher>>,
  cache: Mutex<HashMap<String, Vec<u8>>>,
}

impl RemoteSource {
  #[must_use]
  pub fn new(base_url: Url) -> Self {
    Self::with_fetcher(base_url, Arc::new(HttpFetcher::new()))
  }

  #[must_use]
  pub fn with_fetcher(base_url: Url, fetcher: Arc<dyn RemoteFetcher>) -> Self {
    Self {
      base_url,
      fetcher: RwLock::new(fetcher),
      cache: Mutex::new(HashMap::new()),
    }
  }

  /// Replaces the HTTP handler for subsequent uncached fetches.
  pub fn set_fetcher(&self, fetcher: Arc<dyn RemoteFetcher>) {
    *self.fetcher.write().unwrap_or_else(PoisonError::into_inner) = fetcher;
  }

  /// Resolves an identifier against the base URL and normalizes it:
  /// default ports are dropped and a non-root trailing slash is trimmed.
  pub fn canonical_url(&self, identifier: &str) -> Result<Url, DocError> {
    let mut url = if identifier.contains("://") {
      Url::parse(identifier).map_err(|err| DocError::fetch(format!("invalid URL '{identifier}': {err}")))?
    } else {
      self
        .base_url
        .join(identifier)
        .map_err(|err| DocError::fetch(format!("cannot resolve '{identifier}' against {}: {err}", self.base_url)))?
    };
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
      let trimmed = path.trim_end_matches('/').to_string();
      url.set_path(&trimmed);
    }
    Ok(url)
  }
}

#[async_trait]
impl FileSource for RemoteSource {
  async fn fetch(&self, identifier: &str) -> Result<FetchedFile, DocError> {
    let url = self.canonical_url(identifier)?;
    let cid = url.to_string();

    {
      let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
      if let Some(bytes) = cache.get(&cid) {
        return Ok(FetchedFile {
          cid,
          bytes: bytes.clone(),
        });
      }
    }

    let fetcher = self.fetcher.read().unwrap_or_else(PoisonError::into_inner).clone();
    let response = fetcher.fetch(&url).await.map_err(|err| err.with_cid(&cid))?;

    let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
    let bytes = cache.entry(cid.clone()).or_insert(response.bytes).clone();
    Ok(FetchedFile { cid, bytes })
  }

  fn enumerate(&self) -> Vec<String> {
    let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
    cache.keys().cloned().collect()
  }
}

/// Default [`RemoteFetcher`] backed by `reqwest`.
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  #[must_use]
  pub fn new() -> Self {
    Self {
      client: reqwest::Client::new(),
    }
  }
}

impl Default for HttpFetcher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
  async fn fetch(&self, url: &Url) -> Result<RemoteResponse, DocError> {
    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|err| DocError::fetch(format!("GET {url} failed: {err}")))?;
    if !response.status().is_success() {
      return Err(DocError::fetch(format!("GET {url} returned {}", response.status())));
    }
    let content_type = response
      .headers()
      .get(reqwest::header::CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string);
    let bytes = response
      .bytes()
      .await
      .map_err(|err| DocError::fetch(format!("reading body of {url} failed: {err}")))?;
    Ok(RemoteResponse {
      bytes: bytes.to_vec(),
      content_type,
    })
  }
}
