use esglobals_utils::ecmascript::is_validate_identifier_name;
use oxc::{
  allocator::{self, Allocator, Box, CloneIn, Dummy, IntoIn},
  ast::{
    AstBuilder, NONE,
    ast::{
      self, Argument, AssignmentOperator, AssignmentTarget, BinaryOperator, BindingIdentifier,
      Expression, LogicalOperator, NumberBase, ObjectPropertyKind, PropertyKind, Statement,
    },
  },
  span::{Atom, SPAN, Span},
};

type PassedStr<'a> = &'a str;

// `AstBuilder` is more suitable name, but it's already used in oxc.
pub struct AstSnippet<'ast> {
  pub builder: AstBuilder<'ast>,
}

impl<'ast> AstSnippet<'ast> {
  pub fn new(alloc: &'ast Allocator) -> Self {
    Self { builder: AstBuilder::new(alloc) }
  }

  #[inline]
  pub fn alloc(&self) -> &'ast Allocator {
    self.builder.allocator
  }

  pub fn atom(&self, value: &str) -> Atom<'ast> {
    self.builder.atom(value)
  }

  #[inline]
  pub fn id(&self, name: PassedStr, span: Span) -> ast::BindingIdentifier<'ast> {
    self.builder.binding_identifier(span, self.atom(name))
  }

  #[inline]
  pub fn id_name(&self, name: PassedStr, span: Span) -> ast::IdentifierName<'ast> {
    self.builder.identifier_name(span, self.atom(name))
  }

  #[inline]
  pub fn id_ref_expr(&self, name: PassedStr, span: Span) -> Expression<'ast> {
    self.builder.expression_identifier(span, self.atom(name))
  }

  #[inline]
  pub fn this_expr(&self) -> Expression<'ast> {
    self.builder.expression_this(SPAN)
  }

  pub fn clone_member_expr(
    &self,
    member: &ast::StaticMemberExpression<'ast>,
  ) -> Box<'ast, ast::StaticMemberExpression<'ast>> {
    Box::new_in(member.clone_in(self.alloc()), self.alloc())
  }

  /// `[object].[property]`, or `[object]["[property]"]` if `property` isn't an identifier name.
  pub fn member_expr(&self, object: Expression<'ast>, property: PassedStr) -> Expression<'ast> {
    if is_validate_identifier_name(property) {
      Expression::StaticMemberExpression(self.builder.alloc_static_member_expression(
        SPAN,
        object,
        self.id_name(property, SPAN),
        false,
      ))
    } else {
      Expression::ComputedMemberExpression(self.builder.alloc_computed_member_expression(
        SPAN,
        object,
        self.string_literal_expr(property, SPAN),
        false,
      ))
    }
  }

  /// `[object].[names[0]].[names[1]]...`, or just `object` for empty `names`.
  pub fn member_expr_or_ident_ref<T: AsRef<str>>(
    &self,
    object: Expression<'ast>,
    names: &[T],
  ) -> Expression<'ast> {
    names.iter().fold(object, |acc, name| self.member_expr(acc, name.as_ref()))
  }

  /// `[object].[names[0]].[names[1]]...` for a non-empty list of identifier names.
  pub fn static_member_chain<T: AsRef<str>>(
    &self,
    object: Expression<'ast>,
    names: &[T],
  ) -> Option<Box<'ast, ast::StaticMemberExpression<'ast>>> {
    let (last, init) = names.split_last()?;
    Some(self.builder.alloc_static_member_expression(
      SPAN,
      self.member_expr_or_ident_ref(object, init),
      self.id_name(last.as_ref(), SPAN),
      false,
    ))
  }

  /// `[target] = [value]`
  pub fn assign_member_expr(
    &self,
    target: Box<'ast, ast::StaticMemberExpression<'ast>>,
    value: Expression<'ast>,
  ) -> Expression<'ast> {
    self.builder.expression_assignment(
      SPAN,
      AssignmentOperator::Assign,
      AssignmentTarget::StaticMemberExpression(target),
      value,
    )
  }

  /// ```js
  /// [path] = [path] || {};
  /// ```
  pub fn or_default_object_assign_stmt(
    &self,
    path: &ast::StaticMemberExpression<'ast>,
  ) -> Statement<'ast> {
    let fallback = self.builder.expression_logical(
      SPAN,
      Expression::StaticMemberExpression(self.clone_member_expr(path)),
      LogicalOperator::Or,
      self.empty_object_expr(),
    );
    self.builder.statement_expression(
      SPAN,
      self.assign_member_expr(self.clone_member_expr(path), fallback),
    )
  }

  /// ```js
  /// [path] || ([path] = {})
  /// ```
  pub fn or_assign_default_object_expr(
    &self,
    path: &ast::StaticMemberExpression<'ast>,
  ) -> Expression<'ast> {
    self.builder.expression_logical(
      SPAN,
      Expression::StaticMemberExpression(self.clone_member_expr(path)),
      LogicalOperator::Or,
      self.assign_member_expr(self.clone_member_expr(path), self.empty_object_expr()),
    )
  }

  /// ```js
  /// [object].[property] = [value];
  /// ```
  ///
  /// Falls back to `[object]["[property]"]` for names that aren't identifier names.
  pub fn property_assign_stmt(
    &self,
    object: PassedStr,
    property: PassedStr,
    value: Expression<'ast>,
  ) -> Statement<'ast> {
    self.builder.statement_expression(SPAN, self.property_assign_expr(object, property, value))
  }

  /// `[object].[property] = [value]`
  pub fn property_assign_expr(
    &self,
    object: PassedStr,
    property: PassedStr,
    value: Expression<'ast>,
  ) -> Expression<'ast> {
    let object = self.id_ref_expr(object, SPAN);
    let target = if is_validate_identifier_name(property) {
      AssignmentTarget::StaticMemberExpression(self.builder.alloc_static_member_expression(
        SPAN,
        object,
        self.id_name(property, SPAN),
        false,
      ))
    } else {
      AssignmentTarget::ComputedMemberExpression(self.builder.alloc_computed_member_expression(
        SPAN,
        object,
        self.string_literal_expr(property, SPAN),
        false,
      ))
    };
    self.builder.expression_assignment(SPAN, AssignmentOperator::Assign, target, value)
  }

  /// `{}`
  pub fn empty_object_expr(&self) -> Expression<'ast> {
    Expression::ObjectExpression(ast::ObjectExpression::dummy(self.alloc()).into_in(self.alloc()))
  }

  /// `{ [key]: [value] }`
  pub fn single_property_object_expr(
    &self,
    key: PassedStr,
    value: Expression<'ast>,
  ) -> Expression<'ast> {
    let property = self.object_property_kind_object_property(key, value);
    Expression::ObjectExpression(
      ast::ObjectExpression {
        properties: self.builder.vec1(property),
        ..ast::ObjectExpression::dummy(self.alloc())
      }
      .into_in(self.alloc()),
    )
  }

  // create `a: expr` for `{ a: expr }`
  pub fn object_property_kind_object_property(
    &self,
    key: PassedStr,
    value: Expression<'ast>,
  ) -> ObjectPropertyKind<'ast> {
    let computed = !is_validate_identifier_name(key);
    self.builder.object_property_kind_object_property(
      SPAN,
      PropertyKind::Init,
      if computed {
        ast::PropertyKey::from(self.string_literal_expr(key, SPAN))
      } else {
        self.builder.property_key_static_identifier(SPAN, self.atom(key))
      },
      value,
      false,
      false,
      computed,
    )
  }

  /// ```js
  /// function([params]) { [directives] [statements] }
  /// ```
  pub fn function_expr(
    &self,
    params: &[&str],
    directives: allocator::Vec<'ast, ast::Directive<'ast>>,
    statements: allocator::Vec<'ast, Statement<'ast>>,
  ) -> Expression<'ast> {
    let items = self.builder.vec_from_iter(params.iter().map(|name| {
      self.builder.formal_parameter(
        SPAN,
        self.builder.vec(),
        self.builder.binding_pattern(
          self.builder.binding_pattern_kind_binding_identifier(SPAN, self.atom(name)),
          NONE,
          false,
        ),
        None,
        false,
        false,
      )
    }));

    Expression::FunctionExpression(self.builder.alloc_function(
      SPAN,
      ast::FunctionType::FunctionExpression,
      None::<BindingIdentifier>,
      false,
      false,
      false,
      NONE,
      NONE,
      self.builder.formal_parameters(SPAN, ast::FormalParameterKind::FormalParameter, items, NONE),
      NONE,
      Some(self.builder.function_body(SPAN, directives, statements)),
    ))
  }

  /// `[callee]([arguments])`
  pub fn call_expr(
    &self,
    callee: Expression<'ast>,
    arguments: impl IntoIterator<Item = Expression<'ast>>,
  ) -> Expression<'ast> {
    self.builder.expression_call(
      SPAN,
      callee,
      NONE,
      self.builder.vec_from_iter(arguments.into_iter().map(Argument::from)),
      false,
    )
  }

  /// ```js
  /// (function([params]) { [directives] [statements] })([arguments])
  /// ```
  pub fn iife_expr(
    &self,
    params: &[&str],
    directives: allocator::Vec<'ast, ast::Directive<'ast>>,
    statements: allocator::Vec<'ast, Statement<'ast>>,
    arguments: Vec<Expression<'ast>>,
  ) -> Expression<'ast> {
    self.call_expr(self.function_expr(params, directives, statements), arguments)
  }

  /// `[kind] [name] = [init]`, or just `[kind] [name]` without `init`.
  pub fn variable_declaration(
    &self,
    kind: ast::VariableDeclarationKind,
    names: &[&str],
    mut init: Option<Expression<'ast>>,
  ) -> Box<'ast, ast::VariableDeclaration<'ast>> {
    let declarations = self.builder.vec_from_iter(names.iter().map(|name| {
      self.builder.variable_declarator(
        SPAN,
        kind,
        self.builder.binding_pattern(
          self.builder.binding_pattern_kind_binding_identifier(SPAN, self.atom(name)),
          NONE,
          false,
        ),
        init.take(),
        false,
      )
    }));
    self.builder.alloc_variable_declaration(SPAN, kind, declarations, false)
  }

  /// `var [name] = [init]`
  pub fn var_decl_stmt(&self, name: PassedStr, init: Expression<'ast>) -> Statement<'ast> {
    Statement::VariableDeclaration(self.variable_declaration(
      ast::VariableDeclarationKind::Var,
      &[name],
      Some(init),
    ))
  }

  /// `var [names[0]], [names[1]]...`
  pub fn var_uninit_decl_stmt(&self, names: &[&str]) -> Statement<'ast> {
    Statement::VariableDeclaration(self.variable_declaration(
      ast::VariableDeclarationKind::Var,
      names,
      None,
    ))
  }

  /// `[name] = [value]`
  pub fn id_assign_expr(&self, name: PassedStr, value: Expression<'ast>) -> Expression<'ast> {
    self.builder.expression_assignment(
      SPAN,
      AssignmentOperator::Assign,
      AssignmentTarget::AssignmentTargetIdentifier(
        self.builder.alloc_identifier_reference(SPAN, self.atom(name)),
      ),
      value,
    )
  }

  /// `[object][[property]]`
  pub fn computed_member_expr(
    &self,
    object: Expression<'ast>,
    property: Expression<'ast>,
  ) -> Expression<'ast> {
    Expression::ComputedMemberExpression(
      self.builder.alloc_computed_member_expression(SPAN, object, property, false),
    )
  }

  /// `[left] === [right]`
  pub fn strict_equal_expr(
    &self,
    left: Expression<'ast>,
    right: Expression<'ast>,
  ) -> Expression<'ast> {
    self.builder.expression_binary(SPAN, left, BinaryOperator::StrictEquality, right)
  }

  /// ```js
  /// (a, b)
  /// ```
  pub fn seq2_expr(&self, a: Expression<'ast>, b: Expression<'ast>) -> Expression<'ast> {
    self.seq_expr([a, b])
  }

  /// `([expressions[0]], [expressions[1]], ...)`
  pub fn seq_expr(
    &self,
    expressions: impl IntoIterator<Item = Expression<'ast>>,
  ) -> Expression<'ast> {
    Expression::SequenceExpression(
      self.builder.alloc_sequence_expression(SPAN, self.builder.vec_from_iter(expressions)),
    )
  }

  /// `(0, [callee])`, calls through it don't bind `this` to the namespace object.
  pub fn indirect_callee_expr(&self, callee: Expression<'ast>) -> Expression<'ast> {
    let zero = self.builder.expression_numeric_literal(SPAN, 0.0, None, NumberBase::Decimal);
    self.seq2_expr(zero, callee)
  }

  #[inline]
  /// `undefined` is acting like identifier, it might be shadowed by user code.
  pub fn void_zero(&self) -> Expression<'ast> {
    self.builder.void_0(SPAN)
  }

  pub fn string_literal_expr(&self, value: PassedStr, span: Span) -> Expression<'ast> {
    self.builder.expression_string_literal(span, self.atom(value), None)
  }

  // return xxx
  pub fn return_stmt(&self, argument: Expression<'ast>) -> Statement<'ast> {
    Statement::ReturnStatement(
      ast::ReturnStatement { argument: Some(argument), ..ast::ReturnStatement::dummy(self.alloc()) }
        .into_in(self.alloc()),
    )
  }

  /// `"use strict"`
  pub fn use_strict_directive(&self) -> ast::Directive<'ast> {
    self.builder.directive(
      SPAN,
      self.builder.string_literal(SPAN, self.atom("use strict"), None),
      self.atom("use strict"),
    )
  }

  /// ```js
  /// Object.defineProperty([exports], "__esModule", { value: true });
  /// ```
  pub fn define_es_module_marker_stmt(&self, exports: PassedStr) -> Statement<'ast> {
    let callee = self.member_expr(self.id_ref_expr("Object", SPAN), "defineProperty");
    let descriptor = self
      .single_property_object_expr("value", self.builder.expression_boolean_literal(SPAN, true));
    let arguments = self.builder.vec_from_iter([
      Argument::from(self.id_ref_expr(exports, SPAN)),
      Argument::from(self.string_literal_expr("__esModule", SPAN)),
      Argument::from(descriptor),
    ]);
    self
      .builder
      .statement_expression(SPAN, self.builder.expression_call(SPAN, callee, NONE, arguments, false))
  }

  /// ```js
  /// [exports].__esModule = true;
  /// ```
  pub fn assign_es_module_marker_stmt(&self, exports: PassedStr) -> Statement<'ast> {
    self.property_assign_stmt(exports, "__esModule", self.builder.expression_boolean_literal(SPAN, true))
  }

  /// ```js
  /// [name] = [name] && [name].__esModule ? [name] : { default: [name] };
  /// ```
  pub fn interop_default_stmt(&self, name: PassedStr) -> Statement<'ast> {
    let test = self.builder.expression_logical(
      SPAN,
      self.id_ref_expr(name, SPAN),
      LogicalOperator::And,
      self.member_expr(self.id_ref_expr(name, SPAN), "__esModule"),
    );
    let conditional = self.builder.expression_conditional(
      SPAN,
      test,
      self.id_ref_expr(name, SPAN),
      self.single_property_object_expr("default", self.id_ref_expr(name, SPAN)),
    );
    self.builder.statement_expression(SPAN, self.id_assign_expr(name, conditional))
  }

  /// ```js
  /// Object.keys([source]).forEach(function (key) {
  ///   if (key === "default" || key === "__esModule" || key === "[skip]") return;
  ///   if (key in [exports] && [exports][key] === [source][key]) return;
  ///   Object.defineProperty([exports], key, {
  ///     enumerable: true,
  ///     get: function () { return [source][key]; }
  ///   });
  /// });
  /// ```
  ///
  /// With `loose` the last statement is `[exports][key] = [source][key];`.
  pub fn export_star_stmt(
    &self,
    exports: PassedStr,
    source: PassedStr,
    skip: &[String],
    loose: bool,
  ) -> Statement<'ast> {
    let key = || self.id_ref_expr("key", SPAN);
    let source_value = || self.computed_member_expr(self.id_ref_expr(source, SPAN), key());

    let mut skip_test = self.strict_equal_expr(key(), self.string_literal_expr("default", SPAN));
    for name in std::iter::once("__esModule").chain(skip.iter().map(String::as_str)) {
      let test = self.strict_equal_expr(key(), self.string_literal_expr(name, SPAN));
      skip_test = self.builder.expression_logical(SPAN, skip_test, LogicalOperator::Or, test);
    }

    let same_value_test = self.builder.expression_logical(
      SPAN,
      self.builder.expression_binary(
        SPAN,
        key(),
        BinaryOperator::In,
        self.id_ref_expr(exports, SPAN),
      ),
      LogicalOperator::And,
      self.strict_equal_expr(
        self.computed_member_expr(self.id_ref_expr(exports, SPAN), key()),
        source_value(),
      ),
    );

    let define = if loose {
      self.builder.expression_assignment(
        SPAN,
        AssignmentOperator::Assign,
        AssignmentTarget::ComputedMemberExpression(self.builder.alloc_computed_member_expression(
          SPAN,
          self.id_ref_expr(exports, SPAN),
          key(),
          false,
        )),
        source_value(),
      )
    } else {
      let getter = self.function_expr(
        &[],
        self.builder.vec(),
        self.builder.vec1(self.return_stmt(source_value())),
      );
      let descriptor = Expression::ObjectExpression(
        ast::ObjectExpression {
          properties: self.builder.vec_from_iter([
            self.object_property_kind_object_property(
              "enumerable",
              self.builder.expression_boolean_literal(SPAN, true),
            ),
            self.object_property_kind_object_property("get", getter),
          ]),
          ..ast::ObjectExpression::dummy(self.alloc())
        }
        .into_in(self.alloc()),
      );
      self.call_expr(
        self.member_expr(self.id_ref_expr("Object", SPAN), "defineProperty"),
        [self.id_ref_expr(exports, SPAN), key(), descriptor],
      )
    };

    let callback = self.function_expr(
      &["key"],
      self.builder.vec(),
      self.builder.vec_from_iter([
        self.builder.statement_if(SPAN, skip_test, self.builder.statement_return(SPAN, None), None),
        self.builder.statement_if(
          SPAN,
          same_value_test,
          self.builder.statement_return(SPAN, None),
          None,
        ),
        self.builder.statement_expression(SPAN, define),
      ]),
    );

    let keys = self.call_expr(
      self.member_expr(self.id_ref_expr("Object", SPAN), "keys"),
      [self.id_ref_expr(source, SPAN)],
    );
    self
      .builder
      .statement_expression(SPAN, self.call_expr(self.member_expr(keys, "forEach"), [callback]))
  }
}

#[cfg(test)]
mod tests {
  use esglobals_ecmascript::{EcmaCompiler, WithMutFields};
  use oxc::span::{SPAN, SourceType};

  use super::AstSnippet;

  fn print_with(build: impl for<'ast> FnOnce(&AstSnippet<'ast>) -> oxc::ast::ast::Statement<'ast>) -> String {
    let mut ast = EcmaCompiler::parse("", SourceType::cjs()).unwrap();
    ast.program.with_mut(|WithMutFields { allocator, program, .. }| {
      let snippet = AstSnippet::new(allocator);
      program.body.push(build(&snippet));
    });
    EcmaCompiler::print(&ast).code
  }

  fn normalized(code: &str) -> String {
    EcmaCompiler::print(&EcmaCompiler::parse(code, SourceType::cjs()).unwrap()).code
  }

  #[test]
  fn or_default_object_assign() {
    let code = print_with(|snippet| {
      let path = snippet.static_member_chain(snippet.this_expr(), &["Dog"]).unwrap();
      snippet.or_default_object_assign_stmt(&path)
    });
    assert_eq!(code, normalized("this.Dog = this.Dog || {};"));
  }

  #[test]
  fn or_assign_default_object() {
    let code = print_with(|snippet| {
      let path = snippet.static_member_chain(snippet.this_expr(), &["Dog", "Cat"]).unwrap();
      snippet.builder.statement_expression(SPAN, snippet.or_assign_default_object_expr(&path))
    });
    assert_eq!(code, normalized("this.Dog.Cat || (this.Dog.Cat = {});"));
  }

  #[test]
  fn computed_member_for_non_identifier_names() {
    let code = print_with(|snippet| snippet.property_assign_stmt("_exports", "a-b", snippet.void_zero()));
    assert_eq!(code, normalized("_exports[\"a-b\"] = void 0;"));
  }

  #[test]
  fn empty_chain_has_no_member() {
    let mut ast = EcmaCompiler::parse("", SourceType::cjs()).unwrap();
    ast.program.with_mut(|WithMutFields { allocator, .. }| {
      let snippet = AstSnippet::new(allocator);
      assert!(snippet.static_member_chain::<&str>(snippet.this_expr(), &[]).is_none());
    });
  }

  #[test]
  fn names_are_copied_into_the_arena() {
    let code = print_with(|snippet| {
      let exports = String::from("_exports");
      let source = format!("_{}", "a");
      snippet.export_star_stmt(&exports, &source, &["b".to_string()], true)
    });
    assert_eq!(
      code,
      normalized(
        r#"Object.keys(_a).forEach(function(key) {
          if (key === "default" || key === "__esModule" || key === "b") return;
          if (key in _exports && _exports[key] === _a[key]) return;
          _exports[key] = _a[key];
        });"#
      )
    );
  }

  #[test]
  fn interop_default() {
    let code = print_with(|snippet| snippet.interop_default_stmt("_a"));
    assert_eq!(code, normalized("_a = _a && _a.__esModule ? _a : { default: _a };"));
  }
}
