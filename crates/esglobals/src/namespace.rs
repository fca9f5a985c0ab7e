use esglobals_common::{NamespacePath, RootExpr};
use esglobals_ecmascript_utils::AstSnippet;
use oxc::{
  allocator::Box,
  ast::ast::{Expression, Statement, StaticMemberExpression},
  span::SPAN,
};

/// Builds property paths such as `this.Dog.Cat` from a root expression and a [`NamespacePath`].
pub struct NamespaceBuilder<'me, 'ast> {
  snippet: &'me AstSnippet<'ast>,
  root: &'me RootExpr,
}

impl<'me, 'ast> NamespaceBuilder<'me, 'ast> {
  pub fn new(snippet: &'me AstSnippet<'ast>, root: &'me RootExpr) -> Self {
    Self { snippet, root }
  }

  pub fn root_expr(&self) -> Expression<'ast> {
    match self.root {
      RootExpr::This => self.snippet.this_expr(),
      RootExpr::Identifier(name) => self.snippet.id_ref_expr(name, SPAN),
    }
  }

  /// `root.seg1.seg2...`, or the root itself when there are no segments.
  pub fn build_path(&self, path: &NamespacePath) -> Expression<'ast> {
    self.snippet.member_expr_or_ident_ref(self.root_expr(), path.segments())
  }

  /// The full path as a member expression, `None` for the root itself.
  pub fn build_member_path(
    &self,
    path: &NamespacePath,
  ) -> Option<Box<'ast, StaticMemberExpression<'ast>>> {
    self.snippet.static_member_chain(self.root_expr(), path.segments())
  }

  /// The write target for exports, plus one `path = path || {}` for every segment but the last.
  ///
  /// ```js
  /// this.A = this.A || {};
  /// this.A.B = this.A.B || {};
  /// // target: this.A.B.C
  /// ```
  pub fn build_export_target_and_ensure_chain(
    &self,
    path: &NamespacePath,
  ) -> (Option<Box<'ast, StaticMemberExpression<'ast>>>, Vec<Statement<'ast>>) {
    let segments = path.segments();
    let ensure_statements = (1..segments.len())
      .filter_map(|len| self.snippet.static_member_chain(self.root_expr(), &segments[..len]))
      .map(|intermediate| self.snippet.or_default_object_assign_stmt(&intermediate))
      .collect();
    (self.build_member_path(path), ensure_statements)
  }
}

#[cfg(test)]
mod tests {
  use esglobals_common::{NamespacePath, RootExpr};
  use esglobals_ecmascript::{EcmaCompiler, WithMutFields};
  use esglobals_ecmascript_utils::AstSnippet;
  use oxc::span::{SPAN, SourceType};

  use super::NamespaceBuilder;

  fn normalized(code: &str) -> String {
    EcmaCompiler::print(&EcmaCompiler::parse(code, SourceType::cjs()).unwrap()).code
  }

  /// Prints the ensure chain followed by `target;`.
  fn print_export_chain(dotted: Option<&str>, root: &RootExpr) -> String {
    let path = NamespacePath::parse(dotted).unwrap();
    let mut ast = EcmaCompiler::parse("", SourceType::cjs()).unwrap();
    ast.program.with_mut(|WithMutFields { allocator, program, .. }| {
      let snippet = AstSnippet::new(allocator);
      let builder = NamespaceBuilder::new(&snippet, root);
      let (target, ensure_statements) = builder.build_export_target_and_ensure_chain(&path);
      program.body.extend(ensure_statements);
      let target = target.map_or_else(|| builder.root_expr(), oxc::ast::ast::Expression::StaticMemberExpression);
      program.body.push(snippet.builder.statement_expression(SPAN, target));
    });
    EcmaCompiler::print(&ast).code
  }

  #[test]
  fn three_segments_emit_two_ensure_statements() {
    assert_eq!(
      print_export_chain(Some("A.B.C"), &RootExpr::This),
      normalized("this.A = this.A || {}; this.A.B = this.A.B || {}; this.A.B.C;")
    );
  }

  #[test]
  fn single_segment_has_no_ensure_statement() {
    assert_eq!(print_export_chain(Some("Dog"), &RootExpr::This), normalized("this.Dog;"));
  }

  #[test]
  fn empty_namespace_degenerates_to_root() {
    assert_eq!(print_export_chain(None, &RootExpr::This), normalized("this;"));
    assert_eq!(
      print_export_chain(Some(""), &RootExpr::Identifier("globalThis".into())),
      normalized("globalThis;")
    );
  }

  #[test]
  fn custom_root() {
    assert_eq!(
      print_export_chain(Some("Dog.Cat"), &RootExpr::Identifier("window".into())),
      normalized("window.Dog = window.Dog || {}; window.Dog.Cat;")
    );
  }
}
