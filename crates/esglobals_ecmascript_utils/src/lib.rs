mod ast_snippet;
mod binding_pattern_ext;

pub use crate::{ast_snippet::AstSnippet, binding_pattern_ext::BindingPatternExt};
