use arcstr::ArcStr;
use esglobals_common::{
  CollisionPolicy, GlobalsOptions, ModuleMeta, NormalizedGlobalsOptions, WrapperVariant,
};
use esglobals_ecmascript::{EcmaAst, EcmaCompiler, WithMutFields};
use esglobals_error::{BuildError, BuildResult, GlobalsError};
use esglobals_utils::{FxIndexMap, ecmascript::property_access_str};
use itertools::Itertools;
use oxc::{semantic::SemanticBuilder, span::SourceType};

use crate::{
  global_identifier::global_identifier_for,
  module_rewriter::ModuleRewriter,
  module_scanner::ModuleScanner,
  types::{TransformOutput, TransformReturn},
  utils::{normalize_options::normalize_options, uid_generator::UidGenerator},
  wrapper::WrapperSynthesizer,
};

/// Rewrites ES modules into scripts that read their imports from, and write their exports to,
/// a global namespace object.
///
/// The options are validated once in [`GlobalsTransformer::new`] and shared by every file.
#[derive(Debug)]
pub struct GlobalsTransformer {
  options: NormalizedGlobalsOptions,
}

impl GlobalsTransformer {
  pub fn new(options: GlobalsOptions) -> BuildResult<Self> {
    Ok(Self { options: normalize_options(options)? })
  }

  pub fn options(&self) -> &NormalizedGlobalsOptions {
    &self.options
  }

  /// Wraps `ast` in place. Scripts are left untouched and reported with `wrapped: false`.
  ///
  /// Every check runs before the first mutation, an error leaves `ast` as it was.
  pub fn transform(&self, ast: &mut EcmaAst) -> BuildResult<TransformOutput> {
    if !ast.is_module() {
      tracing::debug!("not a module, skipped");
      return Ok(TransformOutput::default());
    }

    ast.program.with_mut(|WithMutFields { allocator, program, .. }| {
      let scoping = {
        let semantic_ret = SemanticBuilder::new().build(program);
        if !semantic_ret.errors.is_empty() {
          return Err(BuildError::from(
            semantic_ret
              .errors
              .iter()
              .map(|error| GlobalsError::Parse(error.message.to_string()).into())
              .collect::<Vec<anyhow::Error>>(),
          ));
        }
        semantic_ret.semantic.into_scoping()
      };

      let mut uid = UidGenerator::new(&scoping);
      let meta = ModuleScanner::new(&scoping).scan(program, &mut uid)?;
      tracing::debug!(
        sources = %meta.sources.keys().join(", "),
        has_exports = meta.has_exports,
        "scanned module",
      );

      let global_identifiers = meta
        .sources
        .keys()
        .map(|source| global_identifier_for(source, self.options.import_relative_path.as_deref()))
        .collect::<Vec<_>>();
      tracing::debug!(globals = %self.describe_global_reads(&global_identifiers), "derived globals");
      let warnings = self.check_identifier_collisions(&meta, &global_identifiers)?;
      self.validate(&meta)?;

      ModuleRewriter::new(allocator, &scoping, &meta, &self.options, &mut uid).rewrite(program);

      let wrapper = WrapperSynthesizer::new(allocator, &meta, &self.options);
      let plan = wrapper.plan(&global_identifiers);
      wrapper.wrap(program, plan);

      Ok(TransformOutput { wrapped: true, warnings })
    })
  }

  /// Parses, transforms and prints `source`.
  pub fn transform_source(
    &self,
    source: impl Into<ArcStr>,
    source_type: SourceType,
  ) -> BuildResult<TransformReturn> {
    let mut ast = EcmaCompiler::parse(source, source_type)?;
    let TransformOutput { wrapped, warnings } = self.transform(&mut ast)?;
    let code = EcmaCompiler::print(&ast).code;
    Ok(TransformReturn { code, wrapped, warnings })
  }

  /// `this.Foo.a, this.Foo.b`
  fn describe_global_reads(&self, global_identifiers: &[String]) -> String {
    let import_root = self.options.import_namespace.display_from(self.options.root.as_str());
    global_identifiers.iter().map(|identifier| property_access_str(&import_root, identifier)).join(", ")
  }

  fn validate(&self, meta: &ModuleMeta) -> Result<(), GlobalsError> {
    if meta.has_exports
      && self.options.variant == WrapperVariant::Seeded
      && self.options.export_namespace.is_root()
    {
      return Err(GlobalsError::Configuration(
        "`exportNamespace` is required for the `seeded` variant when the module has exports"
          .into(),
      ));
    }
    Ok(())
  }

  /// Distinct sources that would read the same global are reported as warnings, or as errors
  /// under [`CollisionPolicy::Error`].
  fn check_identifier_collisions(
    &self,
    meta: &ModuleMeta,
    global_identifiers: &[String],
  ) -> BuildResult<Vec<GlobalsError>> {
    let mut sources_by_identifier = FxIndexMap::<&str, Vec<&str>>::default();
    for (source, identifier) in meta.sources.keys().zip(global_identifiers) {
      sources_by_identifier.entry(identifier.as_str()).or_default().push(source.as_str());
    }

    let collisions = sources_by_identifier
      .into_iter()
      .filter(|(_, sources)| sources.len() > 1)
      .map(|(identifier, sources)| GlobalsError::IdentifierCollision {
        identifier: identifier.to_string(),
        sources: sources.into_iter().map(ToString::to_string).collect(),
      })
      .collect::<Vec<_>>();

    match self.options.on_identifier_collision {
      CollisionPolicy::Error if !collisions.is_empty() => {
        Err(collisions.into_iter().map(anyhow::Error::from).collect::<Vec<_>>().into())
      }
      _ => {
        for collision in &collisions {
          tracing::warn!("{collision}");
        }
        Ok(collisions)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use esglobals_common::GlobalsOptions;
  use esglobals_ecmascript::EcmaCompiler;
  use oxc::span::SourceType;

  use super::GlobalsTransformer;

  #[test]
  fn scripts_are_left_untouched() {
    let transformer = GlobalsTransformer::new(GlobalsOptions::default()).unwrap();
    let source = "var a = require('./a');\nthis.b = a;\n";
    let ret = transformer.transform_source(source, SourceType::cjs()).unwrap();
    assert!(!ret.wrapped);
    let expected = EcmaCompiler::print(&EcmaCompiler::parse(source, SourceType::cjs()).unwrap());
    assert_eq!(ret.code, expected.code);
  }

  #[test]
  fn failed_scan_leaves_ast_untouched() {
    let transformer = GlobalsTransformer::new(GlobalsOptions::default()).unwrap();
    let source = "import { x } from './a';\nexport * from './b';\nx();\n";
    let mut ast = EcmaCompiler::parse(source, SourceType::mjs()).unwrap();
    let before = EcmaCompiler::print(&ast).code;
    assert!(transformer.transform(&mut ast).is_err());
    assert_eq!(EcmaCompiler::print(&ast).code, before);
  }
}
