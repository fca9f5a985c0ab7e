use esglobals_common::{ImportedName, ModuleMeta, NamedImport, SourceMeta};
use esglobals_ecmascript_utils::BindingPatternExt;
use esglobals_error::{BuildError, GlobalsError};
use esglobals_utils::path_ext::parse_path;
use oxc::{
  ast::ast::{self, Declaration, ExportDefaultDeclarationKind, ImportDeclarationSpecifier},
  ast_visit::{Visit, walk},
  semantic::{ScopeFlags, Scoping, SymbolFlags, SymbolId},
  span::{GetSpan, Span},
};

use crate::utils::uid_generator::UidGenerator;

/// Collects [`ModuleMeta`] from a module without touching it.
///
/// Everything that would make the rewrite fail is reported here, so a module either gets
/// rewritten completely or not at all.
pub struct ModuleScanner<'me> {
  scoping: &'me Scoping,
  result: ModuleMeta,
  errors: Vec<anyhow::Error>,
  function_depth: usize,
}

impl<'me> ModuleScanner<'me> {
  pub fn new(scoping: &'me Scoping) -> Self {
    Self { scoping, result: ModuleMeta::default(), errors: vec![], function_depth: 0 }
  }

  pub fn scan(
    mut self,
    program: &ast::Program<'_>,
    uid: &mut UidGenerator,
  ) -> Result<ModuleMeta, BuildError> {
    self.visit_program(program);
    if !self.errors.is_empty() {
      return Err(self.errors.into());
    }

    self.result.export_name = uid.generate("exports");
    for (source, meta) in &mut self.result.sources {
      meta.name = uid.generate(parse_path(source).name);
    }

    Ok(self.result)
  }

  fn add_source(&mut self, source: &str, span: Span) -> &mut SourceMeta {
    self
      .result
      .sources
      .entry(source.to_string())
      .or_insert_with(|| SourceMeta { name: String::new(), interop: false, span })
  }

  fn add_unsupported(&mut self, construct: &str, span: Span) {
    self.errors.push(GlobalsError::unsupported(construct, span).into());
  }

  fn add_export_name(&mut self, exported: &str) {
    if !self.result.export_names.iter().any(|name| name == exported) {
      self.result.export_names.push(exported.to_string());
    }
  }

  fn add_exported_symbol(&mut self, symbol_id: Option<SymbolId>, exported: &str) {
    self.add_export_name(exported);
    if let Some(symbol_id) = symbol_id {
      self.result.exported_symbols.entry(symbol_id).or_default().push(exported.to_string());
    }
  }

  fn is_import_symbol(&self, symbol_id: SymbolId) -> bool {
    self.scoping.symbol_flags(symbol_id).contains(SymbolFlags::Import)
  }

  fn resolve_reference(&self, ident: &ast::IdentifierReference) -> Option<SymbolId> {
    self.scoping.get_reference(ident.reference_id.get()?).symbol_id()
  }

  fn scan_import_decl(&mut self, decl: &ast::ImportDeclaration<'_>) {
    if decl.import_kind.is_type() {
      return;
    }

    let source = decl.source.value.as_str();
    self.add_source(source, decl.span);

    for specifier in decl.specifiers.iter().flatten() {
      let (local, imported) = match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(spec) => {
          if spec.import_kind.is_type() {
            continue;
          }
          let imported = match spec.imported.name().as_str() {
            "default" => ImportedName::Default,
            name => ImportedName::Named(name.to_string()),
          };
          (&spec.local, imported)
        }
        ImportDeclarationSpecifier::ImportDefaultSpecifier(spec) => {
          (&spec.local, ImportedName::Default)
        }
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(spec) => {
          (&spec.local, ImportedName::Namespace)
        }
      };

      if imported == ImportedName::Default {
        self.add_source(source, decl.span).interop = true;
      }
      if let Some(symbol_id) = local.symbol_id.get() {
        self
          .result
          .named_imports
          .insert(symbol_id, NamedImport { source: source.to_string(), imported });
      }
    }
  }

  fn scan_export_named_decl(&mut self, decl: &ast::ExportNamedDeclaration<'_>) {
    if decl.export_kind.is_type() {
      return;
    }
    self.result.has_exports = true;

    if let Some(source) = &decl.source {
      self.add_source(source.value.as_str(), decl.span);
      for specifier in &decl.specifiers {
        self.add_export_name(specifier.exported.name().as_str());
      }
      return;
    }

    match &decl.declaration {
      Some(Declaration::VariableDeclaration(var_decl)) => {
        for declarator in &var_decl.declarations {
          for id in declarator.id.binding_identifiers() {
            self.add_exported_symbol(id.symbol_id.get(), id.name.as_str());
          }
        }
      }
      Some(Declaration::FunctionDeclaration(func)) => {
        if let Some(id) = &func.id {
          self.add_exported_symbol(id.symbol_id.get(), id.name.as_str());
        }
      }
      Some(Declaration::ClassDeclaration(class)) => {
        if let Some(id) = &class.id {
          self.add_exported_symbol(id.symbol_id.get(), id.name.as_str());
        }
      }
      Some(declaration) => {
        if !declaration.is_typescript_syntax() {
          self.add_unsupported("export declaration", declaration.span());
        }
      }
      None => {
        for specifier in &decl.specifiers {
          self.add_export_name(specifier.exported.name().as_str());
          let ast::ModuleExportName::IdentifierReference(local) = &specifier.local else {
            continue;
          };
          // Re-exported imports are read straight from their source, there is nothing to keep live.
          if let Some(symbol_id) =
            self.resolve_reference(local).filter(|symbol_id| !self.is_import_symbol(*symbol_id))
          {
            self.add_exported_symbol(Some(symbol_id), specifier.exported.name().as_str());
          }
        }
      }
    }
  }

  fn scan_export_default_decl(&mut self, decl: &ast::ExportDefaultDeclaration<'_>) {
    self.result.has_exports = true;
    self.add_export_name("default");
    let id = match &decl.declaration {
      ExportDefaultDeclarationKind::FunctionDeclaration(func) => func.id.as_ref(),
      ExportDefaultDeclarationKind::ClassDeclaration(class) => class.id.as_ref(),
      _ => None,
    };
    if let Some(id) = id {
      self.add_exported_symbol(id.symbol_id.get(), "default");
    }
  }

  fn scan_module_decl(&mut self, decl: &ast::ModuleDeclaration<'_>) {
    match decl {
      ast::ModuleDeclaration::ImportDeclaration(decl) => self.scan_import_decl(decl),
      ast::ModuleDeclaration::ExportNamedDeclaration(decl) => self.scan_export_named_decl(decl),
      ast::ModuleDeclaration::ExportDefaultDeclaration(decl) => {
        self.scan_export_default_decl(decl);
      }
      ast::ModuleDeclaration::ExportAllDeclaration(decl) => {
        if decl.export_kind.is_type() {
          return;
        }
        self.result.has_exports = true;
        self.add_source(decl.source.value.as_str(), decl.span);
        if let Some(exported) = &decl.exported {
          self.add_export_name(exported.name().as_str());
        }
      }
      ast::ModuleDeclaration::TSExportAssignment(decl) => {
        self.add_unsupported("export =", decl.span);
      }
      ast::ModuleDeclaration::TSNamespaceExportDeclaration(decl) => {
        self.add_unsupported("export as namespace", decl.span);
      }
    }
  }
}

impl<'ast> Visit<'ast> for ModuleScanner<'_> {
  fn visit_statement(&mut self, stmt: &ast::Statement<'ast>) {
    if let Some(decl) = stmt.as_module_declaration() {
      self.scan_module_decl(decl);
    }
    if let ast::Statement::TSImportEqualsDeclaration(decl) = stmt {
      self.add_unsupported("import = require()", decl.span);
    }
    walk::walk_statement(self, stmt);
  }

  fn visit_identifier_reference(&mut self, ident: &ast::IdentifierReference<'ast>) {
    let Some(reference_id) = ident.reference_id.get() else {
      return;
    };
    let reference = self.scoping.get_reference(reference_id);
    if let Some(symbol_id) = reference.symbol_id() {
      if self.is_import_symbol(symbol_id) && reference.flags().is_write() {
        self.errors.push(
          GlobalsError::unsupported(format!("Cannot assign to import '{}'", ident.name), ident.span)
            .into(),
        );
      }
    }
  }

  fn visit_meta_property(&mut self, it: &ast::MetaProperty<'ast>) {
    if it.meta.name == "import" {
      self.add_unsupported("import.meta", it.span);
    }
  }

  fn visit_await_expression(&mut self, it: &ast::AwaitExpression<'ast>) {
    if self.function_depth == 0 {
      self.add_unsupported("top-level await", it.span);
    }
    walk::walk_await_expression(self, it);
  }

  fn visit_for_of_statement(&mut self, it: &ast::ForOfStatement<'ast>) {
    if it.r#await && self.function_depth == 0 {
      self.add_unsupported("top-level for await", it.span);
    }
    walk::walk_for_of_statement(self, it);
  }

  fn visit_function(&mut self, it: &ast::Function<'ast>, flags: ScopeFlags) {
    self.function_depth += 1;
    walk::walk_function(self, it, flags);
    self.function_depth -= 1;
  }

  fn visit_arrow_function_expression(&mut self, it: &ast::ArrowFunctionExpression<'ast>) {
    self.function_depth += 1;
    walk::walk_arrow_function_expression(self, it);
    self.function_depth -= 1;
  }
}

#[cfg(test)]
mod tests {
  use esglobals_common::{ImportedName, ModuleMeta};
  use esglobals_ecmascript::{EcmaCompiler, WithMutFields};
  use esglobals_error::{BuildError, GlobalsError};
  use oxc::{semantic::SemanticBuilder, span::SourceType};

  use super::ModuleScanner;
  use crate::utils::uid_generator::UidGenerator;

  fn scan(source: &str) -> Result<ModuleMeta, BuildError> {
    let mut ast = EcmaCompiler::parse(source, SourceType::mjs()).unwrap();
    ast.program.with_mut(|WithMutFields { program, .. }| {
      let scoping = SemanticBuilder::new().build(program).semantic.into_scoping();
      let mut uid = UidGenerator::new(&scoping);
      ModuleScanner::new(&scoping).scan(program, &mut uid)
    })
  }

  fn unsupported(source: &str) -> String {
    match scan(source).unwrap_err().find_globals_error() {
      Some(GlobalsError::UnsupportedConstruct { construct, .. }) => construct.clone(),
      other => panic!("expected an unsupported construct, got {other:?}"),
    }
  }

  #[test]
  fn sources_keep_first_occurrence_order_and_collapse_duplicates() {
    let meta = scan(
      "import { x } from './b';\nimport './a';\nexport { y } from './c';\nimport z from './b';",
    )
    .unwrap();
    let sources = meta.sources.iter().map(|(source, meta)| (source.as_str(), meta.name.as_str()));
    assert_eq!(sources.collect::<Vec<_>>(), [("./b", "_b"), ("./a", "_a"), ("./c", "_c")]);
    assert!(meta.sources["./b"].interop);
    assert!(!meta.sources["./a"].interop);
    assert!(meta.has_exports);
  }

  #[test]
  fn generated_names_avoid_module_bindings() {
    let meta = scan("import { x } from './a';\nconst _a = 1, _exports = 2;\nexport { _a };").unwrap();
    assert_eq!(meta.export_name, "_exports2");
    assert_eq!(meta.source_name("./a"), Some("_a2"));
  }

  #[test]
  fn records_import_bindings() {
    let meta = scan("import def, { x as y, default as d2 } from './a';\nimport * as ns from './b';")
      .unwrap();
    let mut imported =
      meta.named_imports.values().map(|import| import.imported.clone()).collect::<Vec<_>>();
    imported.sort_by_key(|imported| format!("{imported:?}"));
    assert_eq!(
      imported,
      [
        ImportedName::Default,
        ImportedName::Default,
        ImportedName::Named("x".into()),
        ImportedName::Namespace
      ]
    );
    assert!(!meta.has_exports);
  }

  #[test]
  fn records_exported_locals() {
    let meta = scan(
      "export const { a, b: [c] } = obj;\nexport function f() {}\nlet g;\nexport { g as h, g };\nexport default class K {}",
    )
    .unwrap();
    let mut exported = meta.exported_symbols.values().flatten().cloned().collect::<Vec<_>>();
    exported.sort();
    assert_eq!(exported, ["a", "c", "default", "f", "g", "h"]);
  }

  #[test]
  fn re_exported_imports_are_not_live_bindings() {
    let meta = scan("import { x } from './a';\nexport { x };").unwrap();
    assert!(meta.exported_symbols.is_empty());
    assert!(meta.has_exports);
  }

  #[test]
  fn reports_unsupported_constructs() {
    assert_eq!(unsupported("console.log(import.meta.url);"), "import.meta");
    assert_eq!(unsupported("await Promise.resolve();"), "top-level await");
    assert_eq!(unsupported("import { x } from './a';\nx = 1;"), "Cannot assign to import 'x'");
  }

  #[test]
  fn nested_await_is_fine() {
    assert!(scan("export async function f() { await g(); }\nconst h = async () => await g();").is_ok());
  }

  #[test]
  fn export_star_as_registers_source() {
    let meta = scan("export * as ns from './a';").unwrap();
    assert_eq!(meta.source_name("./a"), Some("_a"));
  }

  #[test]
  fn export_star_registers_source_without_interop() {
    let meta = scan("export * from './a';").unwrap();
    assert_eq!(meta.source_name("./a"), Some("_a"));
    assert!(!meta.sources["./a"].interop);
    assert!(meta.has_exports);
    assert!(meta.export_names.is_empty());
  }

  #[test]
  fn collects_explicit_export_names() {
    let meta = scan(
      "export const a = 1;
export { a as b, a };
export { c } from './c';
export * as ns from './d';
export * from './e';
export default 1;",
    )
    .unwrap();
    assert_eq!(meta.export_names, ["a", "b", "c", "ns", "default"]);
  }
}
