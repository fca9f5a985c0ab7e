use esglobals_common::{ModuleMeta, NormalizedGlobalsOptions};
use esglobals_ecmascript_utils::AstSnippet;
use oxc::{
  allocator::{Allocator, Box, TakeIn},
  ast::ast::{self, Expression, Statement, StaticMemberExpression},
  span::SPAN,
};

use crate::namespace::NamespaceBuilder;

/// Everything the wrapper consists of, assembled before the program is touched.
pub struct WrapperPlan<'ast> {
  /// Arguments of the outer call. With exports the export slot comes first, then one global
  /// read per source.
  pub arguments: Vec<Expression<'ast>>,
  /// Factory parameters, positionally matching `arguments`.
  pub params: Vec<String>,
  /// `path = path || {}` for the intermediate segments of the export namespace.
  pub ensure_statements: Vec<Statement<'ast>>,
  /// Where the factory's result is stored. Only set for the seeded variant.
  pub export_target: Option<Box<'ast, StaticMemberExpression<'ast>>>,
  /// `return _exports`, appended to the factory body.
  pub trailing_return: Option<Statement<'ast>>,
}

pub struct WrapperSynthesizer<'me, 'ast> {
  snippet: AstSnippet<'ast>,
  meta: &'me ModuleMeta,
  options: &'me NormalizedGlobalsOptions,
}

impl<'me, 'ast> WrapperSynthesizer<'me, 'ast> {
  pub fn new(
    alloc: &'ast Allocator,
    meta: &'me ModuleMeta,
    options: &'me NormalizedGlobalsOptions,
  ) -> Self {
    Self { snippet: AstSnippet::new(alloc), meta, options }
  }

  /// `global_identifiers` holds the derived global name of every source, in source order.
  pub fn plan(&self, global_identifiers: &[String]) -> WrapperPlan<'ast> {
    debug_assert_eq!(global_identifiers.len(), self.meta.sources.len());
    let namespace = NamespaceBuilder::new(&self.snippet, &self.options.root);

    let mut plan = WrapperPlan {
      arguments: Vec::with_capacity(self.meta.sources.len() + 1),
      params: Vec::with_capacity(self.meta.sources.len() + 1),
      ensure_statements: vec![],
      export_target: None,
      trailing_return: None,
    };

    if self.meta.has_exports {
      let (target, ensure_statements) =
        namespace.build_export_target_and_ensure_chain(&self.options.export_namespace);
      plan.ensure_statements = ensure_statements;
      plan.params.push(self.meta.export_name.clone());
      if self.options.variant.returns_exports() {
        plan.arguments.push(self.snippet.empty_object_expr());
        plan.export_target = target;
        plan.trailing_return =
          Some(self.snippet.return_stmt(self.snippet.id_ref_expr(&self.meta.export_name, SPAN)));
      } else {
        // `this.A.B || (this.A.B = {})`, or the root itself for an empty namespace.
        let argument = match &target {
          Some(target) => self.snippet.or_assign_default_object_expr(target),
          None => namespace.root_expr(),
        };
        plan.arguments.push(argument);
      }
    }

    for (source, identifier) in self.meta.sources.values().zip(global_identifiers) {
      let import_root = namespace.build_path(&self.options.import_namespace);
      plan.arguments.push(self.snippet.member_expr(import_root, identifier));
      plan.params.push(source.name.clone());
    }

    plan
  }

  /// Moves the directives and statements of `program` into the factory. Afterwards the program
  /// holds the ensure statements followed by the single wrapper statement.
  pub fn wrap(&self, program: &mut ast::Program<'ast>, plan: WrapperPlan<'ast>) {
    let alloc = self.snippet.alloc();
    let directives = program.directives.take_in(alloc);
    let mut statements = program.body.take_in(alloc);
    statements.extend(plan.trailing_return);

    tracing::debug!(
      params = ?plan.params,
      ensure_statements = plan.ensure_statements.len(),
      variant = %self.options.variant,
      "wrapping module body",
    );

    let params = plan.params.iter().map(String::as_str).collect::<Vec<_>>();
    let iife = self.snippet.iife_expr(&params, directives, statements, plan.arguments);
    let wrapper = match plan.export_target {
      // `this.Dog.Cat = (function(_exports) { ...; return _exports; })({})`
      Some(target) => self.snippet.assign_member_expr(target, iife),
      None => iife,
    };

    program.body.extend(plan.ensure_statements);
    program.body.push(self.snippet.builder.statement_expression(SPAN, wrapper));
  }
}
