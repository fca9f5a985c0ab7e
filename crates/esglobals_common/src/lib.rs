mod globals_options;
mod types;

pub use crate::{
  globals_options::{
    GlobalsOptions, collision_policy::CollisionPolicy,
    normalized_globals_options::NormalizedGlobalsOptions, root_expr::RootExpr,
    wrapper_variant::WrapperVariant,
  },
  types::{
    module_meta::{ImportedName, ModuleMeta, NamedImport, SourceMeta},
    namespace_path::NamespacePath,
  },
};
