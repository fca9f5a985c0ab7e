use std::path::Path;

use esglobals_common::{GlobalsOptions, NamespacePath, NormalizedGlobalsOptions, WrapperVariant};
use esglobals_error::GlobalsError;
use esglobals_utils::ecmascript::is_valid_binding_name;

use crate::RootExpr;

pub fn normalize_options(
  raw_options: GlobalsOptions,
) -> Result<NormalizedGlobalsOptions, GlobalsError> {
  let variant = raw_options.variant.unwrap_or_default();

  if variant == WrapperVariant::Seeded && raw_options.export_namespace.as_deref() == Some("") {
    return Err(GlobalsError::Configuration(
      "`exportNamespace` can't be empty for the `seeded` variant, the exports need a target to be assigned to".into(),
    ));
  }

  let export_namespace = NamespacePath::parse(raw_options.export_namespace.as_deref())?;
  let import_namespace = NamespacePath::parse(raw_options.import_namespace.as_deref())?;

  let import_relative_path = match raw_options.import_relative_path {
    Some(path) if !Path::new(&path).is_absolute() => {
      return Err(GlobalsError::Configuration(format!(
        "`importRelativePath` must be an absolute path, got `{path}`"
      )));
    }
    path => path.filter(|path| !path.is_empty()),
  };

  let root = raw_options.root.unwrap_or_default();
  if let RootExpr::Identifier(name) = &root {
    if !is_valid_binding_name(name) {
      return Err(GlobalsError::Configuration(format!("`root` must be an identifier, got `{name}`")));
    }
  }

  Ok(NormalizedGlobalsOptions {
    loose: raw_options.loose.unwrap_or(false),
    strict: raw_options.strict.unwrap_or(false),
    strict_mode: raw_options.strict_mode.unwrap_or(true),
    allow_top_level_this: raw_options.allow_top_level_this.unwrap_or(false),
    no_interop: raw_options.no_interop.unwrap_or(false),
    export_namespace,
    import_namespace,
    import_relative_path,
    root,
    variant,
    on_identifier_collision: raw_options.on_identifier_collision.unwrap_or_default(),
  })
}
