use std::path::Path;

use clap::ValueEnum;
use esglobals::SourceType;

/// Overrides the extension based detection, only modules get wrapped.
#[derive(PartialEq, Eq, Clone, Copy, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum SourceKind {
  Module,
  Script,
}

impl From<SourceKind> for SourceType {
  fn from(value: SourceKind) -> Self {
    match value {
      SourceKind::Module => SourceType::mjs(),
      SourceKind::Script => SourceType::cjs(),
    }
  }
}

/// `.cjs` files are scripts, anything oxc doesn't recognize is parsed as a module.
pub fn source_type_for(path: &Path, kind: Option<SourceKind>) -> SourceType {
  match kind {
    Some(kind) => kind.into(),
    None => SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs()),
  }
}
