use esglobals::{
  CollisionPolicy, EcmaCompiler, GlobalsError, GlobalsOptions, GlobalsTransformer, SourceType,
  TransformReturn, WrapperVariant,
};
use pretty_assertions::assert_eq;

fn transform(source: &str, options: GlobalsOptions) -> TransformReturn {
  GlobalsTransformer::new(options).unwrap().transform_source(source, SourceType::mjs()).unwrap()
}

fn transform_err(source: &str, options: GlobalsOptions) -> GlobalsError {
  let error = GlobalsTransformer::new(options)
    .unwrap()
    .transform_source(source, SourceType::mjs())
    .unwrap_err();
  match error.0.into_iter().next().map(|error| error.downcast::<GlobalsError>()) {
    Some(Ok(error)) => error,
    other => panic!("expected a GlobalsError, got {other:?}"),
  }
}

/// Prints `code` the way the transformer output is printed, so only the AST is compared.
fn normalized(code: &str) -> String {
  EcmaCompiler::print(&EcmaCompiler::parse(code, SourceType::cjs()).unwrap()).code
}

fn import_foo() -> GlobalsOptions {
  GlobalsOptions { import_namespace: Some("Foo".to_string()), ..Default::default() }
}

#[test]
fn basic_variant_exports_to_root_without_namespace() {
  let ret = transform("import { x } from './a';\nexport const y = x;", import_foo());
  assert!(ret.wrapped);
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_exports, _a) {
        "use strict";
        Object.defineProperty(_exports, "__esModule", { value: true });
        const y = _a.x;
        _exports.y = y;
      })(this, this.Foo.a);"#
    )
  );
}

#[test]
fn seeded_variant_assigns_the_factory_result() {
  let options = GlobalsOptions {
    variant: Some(WrapperVariant::Seeded),
    export_namespace: Some("Dog.Cat".to_string()),
    ..import_foo()
  };
  let ret = transform("import { x } from './a';\nexport const y = x;", options);
  assert_eq!(
    ret.code,
    normalized(
      r#"this.Dog = this.Dog || {};
      this.Dog.Cat = (function(_exports, _a) {
        "use strict";
        Object.defineProperty(_exports, "__esModule", { value: true });
        const y = _a.x;
        _exports.y = y;
        return _exports;
      })({}, this.Foo.a);"#
    )
  );
}

#[test]
fn sources_resolve_against_import_relative_path() {
  let options =
    GlobalsOptions { import_relative_path: Some("/root".to_string()), ..Default::default() };
  let ret = transform("import m from './sub/mod';\nconsole.log(m);", options);
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_mod) {
        "use strict";
        _mod = _mod && _mod.__esModule ? _mod : { default: _mod };
        console.log(_mod.default);
      })(this.rootSubMod);"#
    )
  );
}

#[test]
fn module_without_imports_or_exports() {
  for variant in [WrapperVariant::Basic, WrapperVariant::Seeded] {
    let options = GlobalsOptions {
      variant: Some(variant),
      export_namespace: Some("Dog".to_string()),
      ..Default::default()
    };
    let ret = transform("foo();", options);
    assert_eq!(ret.code, normalized("(function() {\n\"use strict\";\nfoo();\n})();"));
  }
}

#[test]
fn duplicate_sources_collapse_in_first_occurrence_order() {
  let ret = transform(
    "import './b';\nimport { x } from './a';\nimport { y } from './b';\nx(y);",
    GlobalsOptions::default(),
  );
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_b, _a) {
        "use strict";
        (0, _a.x)(_b.y);
      })(this.b, this.a);"#
    )
  );
}

#[test]
fn nested_export_namespace_is_ensured_outside_the_factory() {
  let options = GlobalsOptions {
    export_namespace: Some("A.B.C".to_string()),
    strict: Some(true),
    ..Default::default()
  };
  let ret = transform("export const a = 1;", options);
  assert_eq!(
    ret.code,
    normalized(
      r#"this.A = this.A || {};
      this.A.B = this.A.B || {};
      (function(_exports) {
        "use strict";
        const a = 1;
        _exports.a = a;
      })(this.A.B.C || (this.A.B.C = {}));"#
    )
  );
}

#[test]
fn directives_stay_ahead_of_the_body() {
  let ret = transform("'use strict';\n'foo';\nimport './a';\nbar();", GlobalsOptions::default());
  assert_eq!(
    ret.code,
    normalized("(function(_a) {\n'use strict';\n'foo';\nbar();\n})(this.a);")
  );

  let options = GlobalsOptions { strict_mode: Some(false), ..Default::default() };
  let ret = transform("'foo';\nbar();", options);
  assert_eq!(ret.code, normalized("(function() {\n'foo';\nbar();\n})();"));
}

#[test]
fn scripts_are_not_wrapped() {
  let transformer = GlobalsTransformer::new(GlobalsOptions::default()).unwrap();
  let ret = transformer.transform_source("this.a = 1;", SourceType::cjs()).unwrap();
  assert!(!ret.wrapped);
  assert_eq!(ret.code, normalized("this.a = 1;"));
}

#[test]
fn seeded_variant_needs_an_export_namespace() {
  let options = GlobalsOptions { variant: Some(WrapperVariant::Seeded), ..Default::default() };
  let error = transform_err("export const a = 1;", options.clone());
  assert!(matches!(error, GlobalsError::Configuration(_)));

  // Nothing to assign without exports.
  let ret = transform("foo();", options);
  assert_eq!(ret.code, normalized("(function() {\n\"use strict\";\nfoo();\n})();"));
}

#[test]
fn export_star_enumerates_the_source_global() {
  let options = GlobalsOptions { strict: Some(true), ..Default::default() };
  let ret = transform(
    "import { x } from './b';\nexport * from './a';\nexport const y = x;",
    options,
  );
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_exports, _b, _a) {
        "use strict";
        Object.keys(_a).forEach(function(key) {
          if (key === "default" || key === "__esModule" || key === "y") return;
          if (key in _exports && _exports[key] === _a[key]) return;
          Object.defineProperty(_exports, key, {
            enumerable: true,
            get: function() { return _a[key]; }
          });
        });
        const y = _b.x;
        _exports.y = y;
      })(this, this.b, this.a);"#
    )
  );

  let loose = GlobalsOptions { loose: Some(true), ..Default::default() };
  assert_eq!(
    transform("export * from './a';", loose).code,
    normalized(
      r#"(function(_exports, _a) {
        "use strict";
        _exports.__esModule = true;
        Object.keys(_a).forEach(function(key) {
          if (key === "default" || key === "__esModule") return;
          if (key in _exports && _exports[key] === _a[key]) return;
          _exports[key] = _a[key];
        });
      })(this, this.a);"#
    )
  );
}

#[test]
fn assigning_to_an_import_fails() {
  let transformer = GlobalsTransformer::new(GlobalsOptions::default()).unwrap();
  let ret = transformer.transform_source("import { x } from './a';\nx = 1;", SourceType::mjs());
  assert!(ret.is_err());
}

#[test]
fn identifier_collisions_warn_by_default() {
  let ret = transform("import './a-b';\nimport './aB';", GlobalsOptions::default());
  assert_eq!(ret.warnings.len(), 1);
  assert!(matches!(
    &ret.warnings[0],
    GlobalsError::IdentifierCollision { identifier, sources }
      if identifier == "aB" && sources == &["./a-b", "./aB"]
  ));
  assert_eq!(
    ret.code,
    normalized("(function(_aB, _aB2) {\n\"use strict\";\n})(this.aB, this.aB);")
  );
}

#[test]
fn identifier_collisions_can_be_errors() {
  let options = GlobalsOptions {
    on_identifier_collision: Some(CollisionPolicy::Error),
    ..Default::default()
  };
  let error = transform_err("import './a-b';\nimport './aB';", options);
  assert!(matches!(error, GlobalsError::IdentifierCollision { .. }));
}

#[test]
fn es_module_marker_follows_loose_and_strict() {
  let loose = GlobalsOptions { loose: Some(true), ..Default::default() };
  assert_eq!(
    transform("export default 1;", loose).code,
    normalized(
      r#"(function(_exports) {
        "use strict";
        _exports.__esModule = true;
        var _default = 1;
        _exports.default = _default;
      })(this);"#
    )
  );

  let strict = GlobalsOptions { strict: Some(true), ..Default::default() };
  assert_eq!(
    transform("export default 1;", strict).code,
    normalized(
      r#"(function(_exports) {
        "use strict";
        var _default = 1;
        _exports.default = _default;
      })(this);"#
    )
  );
}

#[test]
fn default_imports_use_inlined_interop() {
  let ret = transform(
    "import a from './a';\nimport * as b from './b';\na(b.c);",
    GlobalsOptions::default(),
  );
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_a, _b) {
        "use strict";
        _a = _a && _a.__esModule ? _a : { default: _a };
        (0, _a.default)(_b.c);
      })(this.a, this.b);"#
    )
  );

  let options = GlobalsOptions { no_interop: Some(true), ..Default::default() };
  let ret = transform("import a from './a';\na();", options);
  assert_eq!(ret.code, normalized("(function(_a) {\n\"use strict\";\n(0, _a.default)();\n})(this.a);"));
}

#[test]
fn top_level_this_becomes_undefined() {
  let source = "this.x = 1;\nfunction f() { return this; }\nconst g = () => this;";
  assert_eq!(
    transform(source, GlobalsOptions::default()).code,
    normalized(
      r#"(function() {
        "use strict";
        (void 0).x = 1;
        function f() { return this; }
        const g = () => void 0;
      })();"#
    )
  );

  let options = GlobalsOptions { allow_top_level_this: Some(true), ..Default::default() };
  assert_eq!(
    transform("this.x = 1;", options).code,
    normalized("(function() {\n\"use strict\";\nthis.x = 1;\n})();")
  );
}

#[test]
fn class_keys_and_heritage_see_top_level_this() {
  let source = r#"class A { [this.k]() { return this; } static s = this; x = () => this; static { this.t = 1; } }
class B extends this.Base {}"#;
  assert_eq!(
    transform(source, GlobalsOptions::default()).code,
    normalized(
      r#"(function() {
        "use strict";
        class A { [(void 0).k]() { return this; } static s = this; x = () => this; static { this.t = 1; } }
        class B extends (void 0).Base {}
      })();"#
    )
  );
}

#[test]
fn assignments_to_exported_bindings_update_the_export() {
  let options = GlobalsOptions { strict: Some(true), ..Default::default() };
  let ret = transform("export let count = 0;\nexport function inc() { count += 1; }", options);
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_exports) {
        "use strict";
        _exports.inc = inc;
        let count = 0;
        _exports.count = count;
        function inc() { _exports.count = count += 1; }
      })(this);"#
    )
  );
}

#[test]
fn updates_destructuring_and_loop_heads_update_the_export() {
  let options = GlobalsOptions { strict: Some(true), ..Default::default() };
  let ret = transform(
    r#"export let count = 0;
export function inc() { count++; return count--; }
export let a, b;
({ a, b: [b] } = o);
for (count of [1, 2]) {}
const r = ({ a } = o);"#,
    options,
  );
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_exports) {
        "use strict";
        var _count, _ref;
        _exports.inc = inc;
        let count = 0;
        _exports.count = count;
        function inc() {
          _exports.count = ++count;
          return (_count = count--, _exports.count = count, _count);
        }
        let a, b;
        _exports.a = a;
        _exports.b = b;
        ({ a, b: [b] } = o), _exports.a = a, _exports.b = b;
        for (const _count2 of [1, 2]) {
          _exports.count = count = _count2;
          {}
        }
        const r = (_ref = ({ a } = o), _exports.a = a, _ref);
      })(this);"#
    )
  );
}

#[test]
fn export_forms() {
  let options = GlobalsOptions { strict: Some(true), ..Default::default() };
  let ret = transform(
    r#"import { x } from './a';
export { b as c };
const b = 1;
export { x as z };
export { y as "w-v" } from './c';
export * as ns from './d';
export default function () {}"#,
    options,
  );
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_exports, _a, _c, _d) {
        "use strict";
        _exports.default = _default;
        const b = 1;
        _exports.c = b;
        _exports.z = _a.x;
        _exports["w-v"] = _c.y;
        _exports.ns = _d;
        function _default() {}
      })(this, this.a, this.c, this.d);"#
    )
  );
}

#[test]
fn shorthand_properties_are_expanded() {
  let options = GlobalsOptions { strict: Some(true), ..Default::default() };
  let ret = transform("import { x } from './a';\nexport default { x };", options);
  assert_eq!(
    ret.code,
    normalized(
      r#"(function(_exports, _a) {
        "use strict";
        var _default = { x: _a.x };
        _exports.default = _default;
      })(this, this.a);"#
    )
  );
}
