use esglobals_common::{ModuleMeta, NamedImport, NormalizedGlobalsOptions};
use esglobals_ecmascript_utils::{AstSnippet, BindingPatternExt};
use oxc::{
  allocator::{Allocator, Box as ArenaBox, TakeIn},
  ast::ast::{
    self, AssignmentOperator, AssignmentTarget, Declaration, ExportDefaultDeclarationKind,
    Expression, ForStatementLeft, SimpleAssignmentTarget, Statement, VariableDeclarationKind,
  },
  ast_visit::{Visit, VisitMut, walk_mut},
  semantic::{ScopeFlags, Scoping, SymbolFlags, SymbolId},
  span::{GetSpan, SPAN, Span},
};

use crate::utils::uid_generator::UidGenerator;

/// Turns a scanned module into plain statements that read imports from the factory
/// parameters and write exports to the export object.
///
/// Runs only after [`crate::module_scanner::ModuleScanner`] accepted the module, so it can't fail.
pub struct ModuleRewriter<'me, 'ast> {
  snippet: AstSnippet<'ast>,
  scoping: &'me Scoping,
  meta: &'me ModuleMeta,
  options: &'me NormalizedGlobalsOptions,
  uid: &'me mut UidGenerator,
  /// Number of functions and class members around the current node, they all rebind `this`.
  this_depth: usize,
  /// `var` declared temporaries, declared once at the top of the factory.
  temps: Vec<String>,
  /// Set right before visiting the expression of an expression statement.
  result_unused: bool,
}

/// An export assignment waiting for the statement that declares its local.
struct PendingExport<'ast> {
  declared_at: Span,
  stmt: Statement<'ast>,
}

impl<'me, 'ast> ModuleRewriter<'me, 'ast> {
  pub fn new(
    alloc: &'ast Allocator,
    scoping: &'me Scoping,
    meta: &'me ModuleMeta,
    options: &'me NormalizedGlobalsOptions,
    uid: &'me mut UidGenerator,
  ) -> Self {
    Self {
      snippet: AstSnippet::new(alloc),
      scoping,
      meta,
      options,
      uid,
      this_depth: 0,
      temps: vec![],
      result_unused: false,
    }
  }

  pub fn rewrite(mut self, program: &mut ast::Program<'ast>) {
    let hoisted = self.rewrite_top_level_stmts(program);
    self.visit_program(program);

    let mut prologue = vec![];
    if self.meta.has_exports && self.options.emits_es_module_marker() {
      prologue.push(if self.options.loose {
        self.snippet.assign_es_module_marker_stmt(&self.meta.export_name)
      } else {
        self.snippet.define_es_module_marker_stmt(&self.meta.export_name)
      });
    }
    if !self.options.no_interop {
      prologue.extend(
        self
          .meta
          .sources
          .values()
          .filter(|source| source.interop)
          .map(|source| self.snippet.interop_default_stmt(&source.name)),
      );
    }
    if !self.temps.is_empty() {
      let temps = self.temps.iter().map(String::as_str).collect::<Vec<_>>();
      prologue.push(self.snippet.var_uninit_decl_stmt(&temps));
    }
    prologue.extend(hoisted);
    program.body.splice(0..0, prologue);

    if self.options.strict_mode
      && !program.directives.iter().any(|directive| directive.directive == "use strict")
    {
      program.directives.insert(0, self.snippet.use_strict_directive());
    }
  }

  /// Replaces import and export declarations with plain statements. Returns the export
  /// assignments that have to run before anything else, e.g. those of function declarations.
  fn rewrite_top_level_stmts(&mut self, program: &mut ast::Program<'ast>) -> Vec<Statement<'ast>> {
    let old_body = program.body.take_in(self.snippet.alloc());
    let mut hoisted = vec![];
    let mut pending = vec![];

    for top_stmt in old_body {
      match top_stmt {
        Statement::ImportDeclaration(_)
        | Statement::TSExportAssignment(_)
        | Statement::TSNamespaceExportDeclaration(_) => {}
        Statement::ExportNamedDeclaration(decl) => {
          let decl = decl.unbox();
          if decl.export_kind.is_type() {
            continue;
          }
          if let Some(source) = &decl.source {
            // `export { a as b } from './s'` => `_exports.b = _s.a`
            let source_name = &self.meta.sources[source.value.as_str()].name;
            for specifier in &decl.specifiers {
              let value = self.snippet.member_expr(
                self.snippet.id_ref_expr(source_name, SPAN),
                specifier.local.name().as_str(),
              );
              program.body.push(self.export_stmt(specifier.exported.name().as_str(), value));
            }
          } else if let Some(declaration) = decl.declaration {
            if declaration.is_typescript_syntax() {
              continue;
            }
            // `export const a = 1` => `const a = 1; _exports.a = a;`
            let declared = declared_names(&declaration);
            let is_function = matches!(declaration, Declaration::FunctionDeclaration(_));
            self.push_stmt(program, Statement::from(declaration), &mut pending);
            for name in declared {
              let stmt = self.export_stmt(&name, self.snippet.id_ref_expr(&name, SPAN));
              if is_function {
                hoisted.push(stmt);
              } else {
                program.body.push(stmt);
              }
            }
          } else {
            for specifier in &decl.specifiers {
              self.rewrite_local_export_specifier(
                program,
                specifier,
                decl.span,
                &mut hoisted,
                &mut pending,
              );
            }
          }
        }
        Statement::ExportDefaultDeclaration(mut decl) => {
          self.rewrite_export_default_decl(program, &mut decl, &mut hoisted, &mut pending);
        }
        Statement::ExportAllDeclaration(decl) => {
          if decl.export_kind.is_type() {
            continue;
          }
          let source_name = &self.meta.sources[decl.source.value.as_str()].name;
          let stmt = match &decl.exported {
            // `export * as ns from './s'` => `_exports.ns = _s`
            Some(exported) => self
              .export_stmt(exported.name().as_str(), self.snippet.id_ref_expr(source_name, SPAN)),
            // `export * from './s'` => `Object.keys(_s).forEach(...)`
            None => self.snippet.export_star_stmt(
              &self.meta.export_name,
              source_name,
              &self.meta.export_names,
              self.options.loose,
            ),
          };
          program.body.push(stmt);
        }
        top_stmt => self.push_stmt(program, top_stmt, &mut pending),
      }
    }

    program.body.extend(pending.into_iter().map(|pending| pending.stmt));
    hoisted
  }

  /// `export { a as b }` without a source.
  fn rewrite_local_export_specifier(
    &mut self,
    program: &mut ast::Program<'ast>,
    specifier: &ast::ExportSpecifier<'ast>,
    export_span: Span,
    hoisted: &mut Vec<Statement<'ast>>,
    pending: &mut Vec<PendingExport<'ast>>,
  ) {
    if specifier.export_kind.is_type() {
      return;
    }
    let exported = specifier.exported.name();
    let local = match &specifier.local {
      ast::ModuleExportName::IdentifierReference(local) => local,
      _ => return,
    };
    let Some(symbol_id) = self.symbol_of(local) else {
      // Exporting a global, the best that can be done is reading it in place.
      let stmt = self.export_stmt(&exported, self.snippet.id_ref_expr(&local.name, SPAN));
      program.body.push(stmt);
      return;
    };

    if let Some(import) = self.meta.named_imports.get(&symbol_id) {
      let stmt = self.export_stmt(&exported, self.import_read_expr(import));
      program.body.push(stmt);
      return;
    }

    let stmt = self.export_stmt(&exported, self.snippet.id_ref_expr(&local.name, SPAN));
    let declared_at = self.scoping.symbol_span(symbol_id);
    if self.scoping.symbol_flags(symbol_id).contains(SymbolFlags::Function) {
      hoisted.push(stmt);
    } else if declared_at.end <= export_span.start {
      program.body.push(stmt);
    } else {
      pending.push(PendingExport { declared_at, stmt });
    }
  }

  fn rewrite_export_default_decl(
    &mut self,
    program: &mut ast::Program<'ast>,
    decl: &mut ast::ExportDefaultDeclaration<'ast>,
    hoisted: &mut Vec<Statement<'ast>>,
    pending: &mut Vec<PendingExport<'ast>>,
  ) {
    let alloc = self.snippet.alloc();
    match &mut decl.declaration {
      decl @ ast::match_expression!(ExportDefaultDeclarationKind) => {
        // `export default foo` => `var _default = foo; _exports.default = _default;`
        let name = self.uid.generate("default");
        let init = decl.to_expression_mut().take_in(alloc);
        self.push_stmt(program, self.snippet.var_decl_stmt(&name, init), pending);
        let stmt = self.export_stmt("default", self.snippet.id_ref_expr(&name, SPAN));
        program.body.push(stmt);
      }
      ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
        // `export default function() {}` => `function _default() {}`
        let name = match &func.id {
          Some(id) => id.name.to_string(),
          None => {
            let name = self.uid.generate("default");
            func.id = Some(self.snippet.id(&name, SPAN));
            name
          }
        };
        let func = ArenaBox::new_in(func.as_mut().take_in(alloc), alloc);
        self.push_stmt(program, Statement::FunctionDeclaration(func), pending);
        hoisted.push(self.export_stmt("default", self.snippet.id_ref_expr(&name, SPAN)));
      }
      ExportDefaultDeclarationKind::ClassDeclaration(class) => {
        // `export default class {}` => `class _default {}`
        let name = match &class.id {
          Some(id) => id.name.to_string(),
          None => {
            let name = self.uid.generate("default");
            class.id = Some(self.snippet.id(&name, SPAN));
            name
          }
        };
        let class = ArenaBox::new_in(class.as_mut().take_in(alloc), alloc);
        self.push_stmt(program, Statement::ClassDeclaration(class), pending);
        let stmt = self.export_stmt("default", self.snippet.id_ref_expr(&name, SPAN));
        program.body.push(stmt);
      }
      ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => {}
    }
  }

  /// Pushes `stmt` followed by every pending export whose local it declares.
  fn push_stmt(
    &self,
    program: &mut ast::Program<'ast>,
    stmt: Statement<'ast>,
    pending: &mut Vec<PendingExport<'ast>>,
  ) {
    let span = stmt.span();
    program.body.push(stmt);
    if pending.is_empty() || span.is_empty() {
      return;
    }
    let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(pending)
      .into_iter()
      .partition(|export| span.start <= export.declared_at.start && export.declared_at.end <= span.end);
    *pending = waiting;
    program.body.extend(ready.into_iter().map(|export| export.stmt));
  }

  /// `_exports.[exported] = [value];`
  fn export_stmt(&self, exported: &str, value: Expression<'ast>) -> Statement<'ast> {
    self.snippet.property_assign_stmt(&self.meta.export_name, exported, value)
  }

  fn symbol_of(&self, ident: &ast::IdentifierReference<'ast>) -> Option<SymbolId> {
    self.scoping.get_reference(ident.reference_id.get()?).symbol_id()
  }

  /// `_s.name`, `_s.default` or `_s`.
  fn import_read_expr(&self, import: &NamedImport) -> Expression<'ast> {
    let object = self.snippet.id_ref_expr(&self.meta.sources[import.source.as_str()].name, SPAN);
    match import.imported.property() {
      Some(property) => self.snippet.member_expr(object, property),
      None => object,
    }
  }

  /// The read expression for a reference to an import binding.
  ///
  /// A called import goes through `(0, _s.name)` so it isn't called with the namespace as `this`.
  fn try_rewrite_import_ref(
    &self,
    ident: &ast::IdentifierReference<'ast>,
    is_callee: bool,
  ) -> Option<Expression<'ast>> {
    let import = self.meta.named_imports.get(&self.symbol_of(ident)?)?;
    let expr = self.import_read_expr(import);
    if is_callee && import.imported.property().is_some() {
      Some(self.snippet.indirect_callee_expr(expr))
    } else {
      Some(expr)
    }
  }

  fn exported_names_of(&self, ident: &ast::IdentifierReference<'ast>) -> Option<&'me [String]> {
    self.meta.exported_symbols.get(&self.symbol_of(ident)?).map(Vec::as_slice)
  }

  /// Exported locals written by `target`, with their exported names.
  fn exported_writes_of(&self, target: &AssignmentTarget<'ast>) -> Vec<(&'me str, &'me [String])> {
    let mut written = WrittenSymbols { scoping: self.scoping, symbols: vec![] };
    written.visit_assignment_target(target);
    written
      .symbols
      .into_iter()
      .filter_map(|symbol_id| {
        let names = self.meta.exported_symbols.get(&symbol_id)?;
        Some((self.scoping.symbol_name(symbol_id), names.as_slice()))
      })
      .collect()
  }

  /// `_exports.[names[0]] = _exports.[names[1]] = [value]`
  fn export_assign_expr(&self, names: &[String], value: Expression<'ast>) -> Expression<'ast> {
    names.iter().fold(value, |value, name| {
      self.snippet.property_assign_expr(&self.meta.export_name, name, value)
    })
  }

  fn temp(&mut self, hint: &str) -> String {
    let name = self.uid.generate(hint);
    self.temps.push(name.clone());
    name
  }

  fn rewrite_exported_assignment(&mut self, expr: &mut Expression<'ast>, result_unused: bool) {
    let Expression::AssignmentExpression(assign) = expr else {
      return;
    };
    let writes = self.exported_writes_of(&assign.left);
    if writes.is_empty() {
      return;
    }
    let alloc = self.snippet.alloc();

    if let AssignmentTarget::AssignmentTargetIdentifier(_) = assign.left {
      // `x = 1` => `_exports.x = x = 1`
      let value = expr.take_in(alloc);
      *expr = self.export_assign_expr(writes[0].1, value);
      return;
    }

    // `({ a } = o)` => `(_ref = { a } = o, _exports.a = a, _ref)`
    let temp = (!result_unused).then(|| self.temp("ref"));
    let assign = expr.take_in(alloc);
    let mut expressions = vec![match &temp {
      Some(temp) => self.snippet.id_assign_expr(temp, assign),
      None => assign,
    }];
    for (local, names) in writes {
      expressions.push(self.export_assign_expr(names, self.snippet.id_ref_expr(local, SPAN)));
    }
    expressions.extend(temp.map(|temp| self.snippet.id_ref_expr(&temp, SPAN)));
    *expr = self.snippet.seq_expr(expressions);
  }

  fn rewrite_exported_update(&mut self, expr: &mut Expression<'ast>, result_unused: bool) {
    let Expression::UpdateExpression(update) = expr else {
      return;
    };
    let SimpleAssignmentTarget::AssignmentTargetIdentifier(ident) = &update.argument else {
      return;
    };
    let Some(names) = self.exported_names_of(ident) else {
      return;
    };
    let local = ident.name.to_string();
    if result_unused {
      update.prefix = true;
    }
    let prefix = update.prefix;
    let value = expr.take_in(self.snippet.alloc());

    if prefix {
      // `++x` => `_exports.x = ++x`
      *expr = self.export_assign_expr(names, value);
    } else {
      // `x++` => `(_x = x++, _exports.x = x, _x)`
      let temp = self.temp(&local);
      *expr = self.snippet.seq_expr([
        self.snippet.id_assign_expr(&temp, value),
        self.export_assign_expr(names, self.snippet.id_ref_expr(&local, SPAN)),
        self.snippet.id_ref_expr(&temp, SPAN),
      ]);
    }
  }

  /// `for (x of xs) body` => `for (const _x of xs) { x = _x; body }`, the moved assignment is
  /// then rewritten like any other write to an exported local.
  fn rewrite_exported_for_left(
    &mut self,
    left: &mut ForStatementLeft<'ast>,
    body: &mut Statement<'ast>,
  ) {
    let Some(target) = left.as_assignment_target() else {
      return;
    };
    if self.exported_writes_of(target).is_empty() {
      return;
    }
    let hint = match target {
      AssignmentTarget::AssignmentTargetIdentifier(ident) => ident.name.to_string(),
      _ => "ref".to_string(),
    };
    let alloc = self.snippet.alloc();
    let temp = self.uid.generate(&hint);

    let target = left.to_assignment_target_mut().take_in(alloc);
    *left = ForStatementLeft::VariableDeclaration(self.snippet.variable_declaration(
      VariableDeclarationKind::Const,
      &[&temp],
      None,
    ));

    let assign = self.snippet.builder.expression_assignment(
      SPAN,
      AssignmentOperator::Assign,
      target,
      self.snippet.id_ref_expr(&temp, SPAN),
    );
    let mut statements = self.snippet.builder.vec_with_capacity(2);
    statements.push(self.snippet.builder.statement_expression(SPAN, assign));
    statements.push(body.take_in(alloc));
    *body = self.snippet.builder.statement_block(SPAN, statements);
  }

  fn with_this_rebound(&mut self, visit: impl FnOnce(&mut Self)) {
    self.this_depth += 1;
    visit(self);
    self.this_depth -= 1;
  }
}

/// Symbols of the identifiers an assignment target writes to.
struct WrittenSymbols<'s> {
  scoping: &'s Scoping,
  symbols: Vec<SymbolId>,
}

impl<'ast> Visit<'ast> for WrittenSymbols<'_> {
  fn visit_identifier_reference(&mut self, ident: &ast::IdentifierReference<'ast>) {
    let Some(reference_id) = ident.reference_id.get() else {
      return;
    };
    let reference = self.scoping.get_reference(reference_id);
    if reference.flags().is_write() {
      self.symbols.extend(reference.symbol_id());
    }
  }
}

impl<'ast> VisitMut<'ast> for ModuleRewriter<'_, 'ast> {
  fn visit_expression(&mut self, expr: &mut Expression<'ast>) {
    let result_unused = std::mem::take(&mut self.result_unused);
    match expr {
      Expression::Identifier(ident) => {
        if let Some(new_expr) = self.try_rewrite_import_ref(ident, false) {
          *expr = new_expr;
        }
      }
      Expression::ThisExpression(_) => {
        if self.this_depth == 0 && !self.options.allow_top_level_this {
          *expr = self.snippet.void_zero();
        }
      }
      _ => {}
    }

    walk_mut::walk_expression(self, expr);

    match expr {
      Expression::AssignmentExpression(_) => self.rewrite_exported_assignment(expr, result_unused),
      Expression::UpdateExpression(_) => self.rewrite_exported_update(expr, result_unused),
      _ => {}
    }
  }

  fn visit_expression_statement(&mut self, stmt: &mut ast::ExpressionStatement<'ast>) {
    self.result_unused = true;
    walk_mut::walk_expression_statement(self, stmt);
  }

  fn visit_for_of_statement(&mut self, stmt: &mut ast::ForOfStatement<'ast>) {
    self.rewrite_exported_for_left(&mut stmt.left, &mut stmt.body);
    walk_mut::walk_for_of_statement(self, stmt);
  }

  fn visit_for_in_statement(&mut self, stmt: &mut ast::ForInStatement<'ast>) {
    self.rewrite_exported_for_left(&mut stmt.left, &mut stmt.body);
    walk_mut::walk_for_in_statement(self, stmt);
  }

  fn visit_call_expression(&mut self, expr: &mut ast::CallExpression<'ast>) {
    if let Expression::Identifier(ident) = &expr.callee {
      if let Some(new_callee) = self.try_rewrite_import_ref(ident, true) {
        expr.callee = new_callee;
      }
    }
    walk_mut::walk_call_expression(self, expr);
  }

  fn visit_tagged_template_expression(&mut self, expr: &mut ast::TaggedTemplateExpression<'ast>) {
    if let Expression::Identifier(ident) = &expr.tag {
      if let Some(new_tag) = self.try_rewrite_import_ref(ident, true) {
        expr.tag = new_tag;
      }
    }
    walk_mut::walk_tagged_template_expression(self, expr);
  }

  fn visit_object_property(&mut self, prop: &mut ast::ObjectProperty<'ast>) {
    // `{ x }` => `{ x: _a.x }`
    if prop.shorthand {
      if let Expression::Identifier(ident) = &prop.value {
        if let Some(new_expr) = self.try_rewrite_import_ref(ident, false) {
          prop.value = new_expr;
          prop.shorthand = false;
        }
      }
    }
    walk_mut::walk_object_property(self, prop);
  }

  fn visit_function(&mut self, func: &mut ast::Function<'ast>, flags: ScopeFlags) {
    self.this_depth += 1;
    walk_mut::walk_function(self, func, flags);
    self.this_depth -= 1;
  }

  // Keys, decorators and `extends` see the outer `this`, only member bodies rebind it.
  fn visit_property_definition(&mut self, it: &mut ast::PropertyDefinition<'ast>) {
    for decorator in it.decorators.iter_mut() {
      self.visit_decorator(decorator);
    }
    self.visit_property_key(&mut it.key);
    if let Some(value) = &mut it.value {
      self.with_this_rebound(|this| this.visit_expression(value));
    }
  }

  fn visit_accessor_property(&mut self, it: &mut ast::AccessorProperty<'ast>) {
    for decorator in it.decorators.iter_mut() {
      self.visit_decorator(decorator);
    }
    self.visit_property_key(&mut it.key);
    if let Some(value) = &mut it.value {
      self.with_this_rebound(|this| this.visit_expression(value));
    }
  }

  fn visit_static_block(&mut self, it: &mut ast::StaticBlock<'ast>) {
    self.with_this_rebound(|this| walk_mut::walk_static_block(this, it));
  }
}

fn declared_names(declaration: &Declaration<'_>) -> Vec<String> {
  match declaration {
    Declaration::VariableDeclaration(var_decl) => var_decl
      .declarations
      .iter()
      .flat_map(|declarator| declarator.id.binding_identifiers())
      .map(|id| id.name.to_string())
      .collect(),
    Declaration::FunctionDeclaration(func) => {
      func.id.iter().map(|id| id.name.to_string()).collect()
    }
    Declaration::ClassDeclaration(class) => class.id.iter().map(|id| id.name.to_string()).collect(),
    _ => vec![],
  }
}
