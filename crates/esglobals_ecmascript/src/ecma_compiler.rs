use arcstr::ArcStr;
use esglobals_error::{BuildResult, GlobalsError};
use oxc::{
  codegen::{Codegen, CodegenReturn},
  parser::{ParseOptions, Parser},
  span::SourceType,
};

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  pub fn parse(source: impl Into<ArcStr>, source_type: SourceType) -> BuildResult<EcmaAst> {
    let allocator = oxc::allocator::Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      // Parentheses are recomputed by the code generator, keeping them would only get in the
      // way of matching on expression shapes.
      let options = ParseOptions { preserve_parens: false, ..ParseOptions::default() };
      let ret =
        Parser::new(&owner.allocator, &owner.source, source_type).with_options(options).parse();
      if ret.errors.is_empty() {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        let messages = ret.errors.iter().map(|error| error.message.to_string()).collect::<Vec<_>>();
        Err(GlobalsError::Parse(messages.join("; ")))
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }

  pub fn print(ast: &EcmaAst) -> CodegenReturn {
    Codegen::new().build(ast.program())
  }
}

#[test]
fn basic_test() {
  let ast = EcmaCompiler::parse("const a = 1;", SourceType::mjs()).unwrap();
  let code = EcmaCompiler::print(&ast).code;
  assert_eq!(code, "const a = 1;\n");
  assert!(ast.is_module());
}

#[test]
fn parse_error_test() {
  let error = EcmaCompiler::parse("const = ;", SourceType::mjs()).unwrap_err();
  assert!(matches!(error.find_globals_error(), Some(GlobalsError::Parse(_))));
}
