mod global_identifier;
mod globals_transformer;
mod module_rewriter;
mod module_scanner;
mod namespace;
mod types;
mod utils;
mod wrapper;

pub use crate::{
  global_identifier::global_identifier_for,
  globals_transformer::GlobalsTransformer,
  types::{TransformOutput, TransformReturn},
  utils::normalize_options::normalize_options,
};
pub use esglobals_common::*;
pub use esglobals_ecmascript::{EcmaAst, EcmaCompiler};
pub use esglobals_error::{BuildError, BuildResult, GlobalsError};
pub use oxc::span::SourceType;
