use std::path::PathBuf;

use clap::Args;
use esglobals::{GlobalsOptions, RootExpr};

use crate::types::{
  collision_policy::CollisionPolicy, source_kind::SourceKind, wrapper_variant::WrapperVariant,
};

#[derive(Args)]
pub struct InputArgs {
  #[clap(required = true)]
  pub input: Vec<PathBuf>,

  /// JSON file with the same keys as the Babel plugin options.
  #[clap(long, short = 'c')]
  pub config: Option<PathBuf>,

  #[clap(long)]
  pub source_type: Option<SourceKind>,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Prints to stdout when absent.
  #[clap(long, short = 'd')]
  pub out_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct NamespaceArgs {
  #[clap(long)]
  pub export_namespace: Option<String>,

  #[clap(long)]
  pub import_namespace: Option<String>,

  #[clap(long)]
  pub import_relative_path: Option<String>,

  /// Global every namespace starts from, `this` by default.
  #[clap(long)]
  pub root: Option<String>,

  #[clap(long)]
  pub variant: Option<WrapperVariant>,

  #[clap(long)]
  pub on_identifier_collision: Option<CollisionPolicy>,
}

#[derive(Args)]
pub struct ModuleArgs {
  #[clap(long)]
  pub loose: bool,

  #[clap(long)]
  pub strict: bool,

  #[clap(long)]
  pub no_strict_mode: bool,

  #[clap(long)]
  pub allow_top_level_this: bool,

  #[clap(long)]
  pub no_interop: bool,
}

/// Flags only override the config file when given.
pub fn options_from_flags(namespace: NamespaceArgs, module: &ModuleArgs) -> GlobalsOptions {
  GlobalsOptions {
    loose: module.loose.then_some(true),
    strict: module.strict.then_some(true),
    strict_mode: module.no_strict_mode.then_some(false),
    allow_top_level_this: module.allow_top_level_this.then_some(true),
    no_interop: module.no_interop.then_some(true),
    export_namespace: namespace.export_namespace,
    import_namespace: namespace.import_namespace,
    import_relative_path: namespace.import_relative_path,
    root: namespace.root.map(RootExpr::from),
    variant: namespace.variant.map(Into::into),
    on_identifier_collision: namespace.on_identifier_collision.map(Into::into),
  }
}
