//! Source-located OpenAPI 3.x document model.
//!
//! Ingests a raw YAML or JSON document, resolves every `$ref` across
//! local and remote files through a rolodex of parsed documents, detects
//! circular references, and materializes a dual-level model: an immutable
//! low level carrying key/value node identity and source lines on every
//! field, and a mutable high level that renders back to YAML preserving
//! original line order, with edits clustered at the end of their
//! containers.
//!
//! ```no_run
//! use oas3_doc::{DocumentConfig, build_high_document};
//!
//! # async fn run() -> Result<(), oas3_doc::DocError> {
//! let source = "openapi: 3.0.0\ninfo:\n  title: Pets\n  version: 1.0.0\n";
//! let (mut document, errors) = build_high_document(source, DocumentConfig::default()).await?;
//! assert!(errors.is_empty());
//! if let Some(info) = document.info.as_mut() {
//!   info.description = Some("managed by platform".to_string());
//! }
//! println!("{}", document.render());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cycles;
pub mod error;
pub mod high;
pub mod index;
pub mod low;
pub mod resolver;
pub mod rolodex;
pub mod sources;
pub mod translate;
pub mod utils;
pub mod yaml;

pub use config::DocumentConfig;
pub use error::{DocError, ErrorKind};
pub use low::{DocumentBuildResult, SpecInfo, create_document};

/// Parses a document and builds the low model. Fatal only when the
/// `openapi` field is missing or the root fails to parse; all other
/// errors come back in the result's error list.
pub async fn build_document(source: &str, config: DocumentConfig) -> Result<DocumentBuildResult, DocError> {
  let info = SpecInfo::parse(source)?;
  create_document(info, config).await
}

/// Parses a document and wraps the low model in the mutable high model.
pub async fn build_high_document(
  source: &str,
  config: DocumentConfig,
) -> Result<(high::Document, Vec<DocError>), DocError> {
  let result = build_document(source, config).await?;
  Ok((high::Document::from_low(&result.document), result.errors))
}
