use oxc::{semantic::SymbolId, span::Span};
use rustc_hash::FxHashMap;

use esglobals_utils::FxIndexMap;

/// What a module imports and exports, in the form the wrapper needs.
#[derive(Debug, Default)]
pub struct ModuleMeta {
  /// Keyed by the source string, in order of first appearance.
  pub sources: FxIndexMap<String, SourceMeta>,
  /// Name of the aggregate export object inside the factory, e.g. `_exports`.
  pub export_name: String,
  pub has_exports: bool,
  /// Import bindings, keyed by the symbol of their local name.
  pub named_imports: FxHashMap<SymbolId, NamedImport>,
  /// Exported names of local bindings. Assignments to these symbols update the export object.
  pub exported_symbols: FxHashMap<SymbolId, Vec<String>>,
  /// Every name the module exports explicitly, `export *` re-exports never overwrite these.
  pub export_names: Vec<String>,
}

impl ModuleMeta {
  pub fn source_name(&self, source: &str) -> Option<&str> {
    self.sources.get(source).map(|meta| meta.name.as_str())
  }
}

#[derive(Debug)]
pub struct SourceMeta {
  /// Parameter name of the dependency inside the factory, e.g. `_a` for `./a`.
  pub name: String,
  /// Whether a default import reads this source. Namespace imports use the global as is.
  pub interop: bool,
  /// Span of the first declaration that mentions the source.
  pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NamedImport {
  pub source: String,
  pub imported: ImportedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
  Default,
  Namespace,
  Named(String),
}

impl ImportedName {
  pub fn property(&self) -> Option<&str> {
    match self {
      Self::Default => Some("default"),
      Self::Namespace => None,
      Self::Named(name) => Some(name),
    }
  }
}
