//! Classified, source-located errors returned alongside best-effort models.

/// What went wrong. Only [`ErrorKind::MissingVersion`] is fatal for
/// document construction; every other kind accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  MissingVersion,
  ParseError,
  FetchError,
  NotFound,
  CircularReference,
  BuildError,
}

impl std::fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::MissingVersion => "missing version",
      Self::ParseError => "parse error",
      Self::FetchError => "fetch error",
      Self::NotFound => "not found",
      Self::CircularReference => "circular reference",
      Self::BuildError => "build error",
    };
    f.write_str(label)
  }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}{}", self.location_suffix())]
pub struct DocError {
  pub kind: ErrorKind,
  pub message: String,
  /// Canonical identifier of the document the error originated in.
  pub cid: Option<String>,
  pub line: Option<u32>,
  pub column: Option<u32>,
}

impl DocError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
      cid: None,
      line: None,
      column: None,
    }
  }

  pub fn missing_version(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::MissingVersion, message)
  }

  pub fn parse(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::ParseError, message)
  }

  pub fn fetch(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::FetchError, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::NotFound, message)
  }

  pub fn circular(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::CircularReference, message)
  }

  pub fn build(message: impl Into<String>) -> Self {
    Self::new(ErrorKind::BuildError, message)
  }

  #[must_use]
  pub fn with_cid(mut self, cid: impl Into<String>) -> Self {
    self.cid = Some(cid.into());
    self
  }

  #[must_use]
  pub fn with_location(mut self, line: u32, column: u32) -> Self {
    self.line = Some(line);
    self.column = Some(column);
    self
  }

  fn location_suffix(&self) -> String {
    match (&self.cid, self.line) {
      (Some(cid), Some(line)) => format!(" [{cid}:{line}:{}]", self.column.unwrap_or(0)),
      (Some(cid), None) => format!(" [{cid}]"),
      (None, Some(line)) => format!(" [line {line}]"),
      (None, None) => String::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_includes_location_when_present() {
    let err = DocError::not_found("cannot locate reference '#/components/schemas/Missing'")
      .with_cid("/spec/root.yaml")
      .with_location(12, 5);
    let text = err.to_string();
    assert!(text.starts_with("not found: cannot locate reference"));
    assert!(text.ends_with("[/spec/root.yaml:12:5]"));
  }

  #[test]
  fn display_omits_location_when_absent() {
    let err = DocError::missing_version("no openapi field on root document");
    assert_eq!(err.to_string(), "missing version: no openapi field on root document");
  }
}
