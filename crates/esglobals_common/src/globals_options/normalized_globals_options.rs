use crate::{CollisionPolicy, NamespacePath, RootExpr, WrapperVariant};

#[allow(clippy::struct_excessive_bools)] // Using raw booleans is more clear in this case
#[derive(Debug)]
pub struct NormalizedGlobalsOptions {
  // --- Module normalization
  pub loose: bool,
  pub strict: bool,
  pub strict_mode: bool,
  pub allow_top_level_this: bool,
  pub no_interop: bool,

  // --- Namespaces
  pub export_namespace: NamespacePath,
  pub import_namespace: NamespacePath,
  pub import_relative_path: Option<String>,
  pub root: RootExpr,

  // --- Wrapper
  pub variant: WrapperVariant,
  pub on_identifier_collision: CollisionPolicy,
}

impl NormalizedGlobalsOptions {
  /// Whether `Object.defineProperty(_exports, "__esModule", ...)` or its loose form is emitted.
  #[inline]
  pub fn emits_es_module_marker(&self) -> bool {
    !self.strict
  }
}
