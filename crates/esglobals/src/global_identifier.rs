use esglobals_utils::{
  ecmascript::to_identifier,
  path_ext::{parse_path, resolve_request},
};

/// The property an import source is read from on the import namespace.
///
/// The source is resolved against `base` when there is one, then `dir/name` (extension dropped)
/// is turned into an identifier. The result only depends on the inputs.
pub fn global_identifier_for(source: &str, base: Option<&str>) -> String {
  let resolved = resolve_request(source, base);
  let parsed = parse_path(&resolved);
  to_identifier(&format!("{}/{}", parsed.dir, parsed.name))
}

#[test]
fn test_without_base() {
  assert_eq!(global_identifier_for("./a", None), "a");
  assert_eq!(global_identifier_for("lodash", None), "lodash");
  assert_eq!(global_identifier_for("lodash/fp.js", None), "lodashFp");
  assert_eq!(global_identifier_for("../shared/util.mjs", None), "sharedUtil");
  assert_eq!(global_identifier_for(".", None), "_");
}

#[cfg(unix)]
#[test]
fn test_with_base() {
  assert_eq!(global_identifier_for("./a", Some("/dummy/root")), "dummyRootA");
  assert_eq!(global_identifier_for("./sub/mod", Some("/root")), "rootSubMod");
  assert_eq!(global_identifier_for("../lib/b.js", Some("/dummy/root")), "dummyLibB");
}

#[test]
fn test_is_deterministic() {
  let first = global_identifier_for("./components/button", Some("/app"));
  let _ = global_identifier_for("./other", Some("/app"));
  assert_eq!(global_identifier_for("./components/button", Some("/app")), first);
}
