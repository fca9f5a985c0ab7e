use oxc::span::Span;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobalsError {
  /// Namespace options are missing or malformed for the selected wrapper variant.
  #[error("Invalid configuration: {0}")]
  Configuration(String),

  /// Module syntax the rewrite has no global-namespace equivalent for.
  #[error("Unsupported construct `{construct}` at {}..{}", .span.start, .span.end)]
  UnsupportedConstruct { construct: String, span: Span },

  /// Distinct import sources that sanitize to the same global identifier.
  #[error("Import sources {} all read the global `{identifier}`", .sources.join(", "))]
  IdentifierCollision { identifier: String, sources: Vec<String> },

  #[error("Failed to parse: {0}")]
  Parse(String),
}

impl GlobalsError {
  pub fn unsupported(construct: impl Into<String>, span: Span) -> Self {
    Self::UnsupportedConstruct { construct: construct.into(), span }
  }
}
