use oxc::ast::ast::{self, BindingPatternKind};

pub trait BindingPatternExt<'ast> {
  /// Every identifier bound by the pattern, in source order.
  fn binding_identifiers(&self) -> Vec<&ast::BindingIdentifier<'ast>>;
}

impl<'ast> BindingPatternExt<'ast> for ast::BindingPattern<'ast> {
  fn binding_identifiers(&self) -> Vec<&ast::BindingIdentifier<'ast>> {
    let mut queue = vec![&self.kind];
    let mut ret = vec![];
    while let Some(binding_kind) = queue.pop() {
      match binding_kind {
        BindingPatternKind::BindingIdentifier(id) => {
          ret.push(&**id);
        }
        BindingPatternKind::ArrayPattern(arr_pat) => {
          if let Some(rest) = &arr_pat.rest {
            queue.push(&rest.argument.kind);
          }
          queue.extend(arr_pat.elements.iter().rev().flatten().map(|pat| &pat.kind));
        }
        BindingPatternKind::ObjectPattern(obj_pat) => {
          if let Some(rest) = &obj_pat.rest {
            queue.push(&rest.argument.kind);
          }
          queue.extend(obj_pat.properties.iter().rev().map(|prop| &prop.value.kind));
        }
        BindingPatternKind::AssignmentPattern(assign_pat) => {
          queue.push(&assign_pat.left.kind);
        }
      }
    }
    ret
  }
}

#[cfg(test)]
mod tests {
  use esglobals_ecmascript::EcmaCompiler;
  use oxc::{ast::ast::Statement, span::SourceType};

  use super::BindingPatternExt;

  #[test]
  fn collects_names_in_source_order() {
    let ast =
      EcmaCompiler::parse("const { a, b: [c, d = 1], ...e } = obj;", SourceType::mjs()).unwrap();
    let Some(Statement::VariableDeclaration(decl)) = ast.program().body.first() else {
      panic!("expected a variable declaration");
    };
    let names = decl.declarations[0]
      .id
      .binding_identifiers()
      .into_iter()
      .map(|id| id.name.as_str())
      .collect::<Vec<_>>();
    assert_eq!(names, ["a", "c", "d", "e"]);
  }
}
