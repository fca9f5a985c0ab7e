pub mod collision_policy;
pub mod normalized_globals_options;
pub mod root_expr;
pub mod wrapper_variant;

use serde::Deserialize;

use crate::{CollisionPolicy, RootExpr, WrapperVariant};

/// Raw options, usually read from a JSON file with the same keys a Babel plugin would take.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GlobalsOptions {
  // --- Module normalization
  pub loose: Option<bool>,
  pub strict: Option<bool>,
  pub strict_mode: Option<bool>,
  pub allow_top_level_this: Option<bool>,
  pub no_interop: Option<bool>,

  // --- Namespaces
  pub export_namespace: Option<String>,
  pub import_namespace: Option<String>,
  pub import_relative_path: Option<String>,
  pub root: Option<RootExpr>,

  // --- Wrapper
  pub variant: Option<WrapperVariant>,
  pub on_identifier_collision: Option<CollisionPolicy>,
}

impl GlobalsOptions {
  /// Fills every field that is unset in `self` from `fallback`.
  pub fn or(self, fallback: Self) -> Self {
    Self {
      loose: self.loose.or(fallback.loose),
      strict: self.strict.or(fallback.strict),
      strict_mode: self.strict_mode.or(fallback.strict_mode),
      allow_top_level_this: self.allow_top_level_this.or(fallback.allow_top_level_this),
      no_interop: self.no_interop.or(fallback.no_interop),
      export_namespace: self.export_namespace.or(fallback.export_namespace),
      import_namespace: self.import_namespace.or(fallback.import_namespace),
      import_relative_path: self.import_relative_path.or(fallback.import_relative_path),
      root: self.root.or(fallback.root),
      variant: self.variant.or(fallback.variant),
      on_identifier_collision: self.on_identifier_collision.or(fallback.on_identifier_collision),
    }
  }
}

#[test]
fn test_deserialize_babel_style_options() {
  let options: GlobalsOptions = serde_json::from_str(
    r#"{
      "importNamespace": "Foo.Bar",
      "exportNamespace": "Dog.Cat",
      "importRelativePath": "/dummy/root",
      "noInterop": true,
      "variant": "seeded",
      "root": "globalThis"
    }"#,
  )
  .unwrap();
  assert_eq!(options.import_namespace.as_deref(), Some("Foo.Bar"));
  assert_eq!(options.export_namespace.as_deref(), Some("Dog.Cat"));
  assert_eq!(options.no_interop, Some(true));
  assert_eq!(options.variant, Some(WrapperVariant::Seeded));
  assert_eq!(options.root, Some(RootExpr::Identifier("globalThis".into())));
  assert!(options.loose.is_none());
}

#[test]
fn test_reject_unknown_option() {
  assert!(serde_json::from_str::<GlobalsOptions>(r#"{ "exportNamespaces": "A" }"#).is_err());
}

#[test]
fn test_or_prefers_self() {
  let cli = GlobalsOptions { loose: Some(true), ..Default::default() };
  let file = GlobalsOptions {
    loose: Some(false),
    export_namespace: Some("A.B".into()),
    ..Default::default()
  };
  let merged = cli.or(file);
  assert_eq!(merged.loose, Some(true));
  assert_eq!(merged.export_namespace.as_deref(), Some("A.B"));
}
