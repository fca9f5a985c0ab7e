use oxc::syntax::{
  identifier::{is_identifier_name, is_identifier_part},
  keyword::RESERVED_KEYWORDS,
};

pub fn is_validate_identifier_name(name: &str) -> bool {
  is_identifier_name(name)
}

/// Words that can't be bound in strict mode code, on top of the reserved keywords.
const STRICT_RESERVED_WORDS: [&str; 11] = [
  "implements",
  "interface",
  "let",
  "package",
  "private",
  "protected",
  "public",
  "static",
  "yield",
  "eval",
  "arguments",
];

/// An identifier name that may also be used as a binding in strict mode code.
pub fn is_valid_binding_name(name: &str) -> bool {
  is_identifier_name(name)
    && !RESERVED_KEYWORDS.iter().any(|keyword| *keyword == name)
    && !STRICT_RESERVED_WORDS.contains(&name)
}

/// `foo.bar` or `foo["bar-baz"]`, used for diagnostics.
pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_validate_identifier_name(prop) {
    format!("{obj}.{prop}")
  } else {
    format!("{obj}[{}]", serde_json::Value::String(prop.to_string()))
  }
}

/// Turns an arbitrary string into a valid JavaScript identifier.
///
/// - Every character that can't appear in an identifier becomes a separator.
/// - Leading separators and digits are dropped.
/// - Separator runs are removed and the character after them is upper-cased.
/// - Reserved words and other invalid results get a `_` prefix.
///
/// `"/dummy/root/a"` becomes `"dummyRootA"`, `"."` becomes `"_"`.
pub fn to_identifier(input: &str) -> String {
  let replaced =
    input.chars().map(|c| if is_identifier_part(c) { c } else { '-' }).collect::<String>();
  let trimmed = replaced.trim_start_matches(|c: char| c == '-' || c.is_ascii_digit());

  let mut name = String::with_capacity(trimmed.len());
  let mut upper_next = false;
  for c in trimmed.chars() {
    if c == '-' || c.is_whitespace() {
      upper_next = true;
    } else if upper_next {
      name.extend(c.to_uppercase());
      upper_next = false;
    } else {
      name.push(c);
    }
  }

  if !is_valid_binding_name(&name) {
    name.insert(0, '_');
  }
  name
}

/// Base name for a generated binding: `_` prefix, no leading underscores and no trailing digits.
///
/// Returns the candidate without the numeric suffix used for deconflicting.
pub fn uid_base_name(hint: &str) -> String {
  let identifier = to_identifier(hint);
  let stripped = identifier.trim_start_matches('_').trim_end_matches(|c: char| c.is_ascii_digit());
  format!("_{stripped}")
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_to_identifier() {
  assert_eq!(to_identifier("/dummy/root/a"), "dummyRootA");
  assert_eq!(to_identifier("./a"), "a");
  assert_eq!(to_identifier("/lodash"), "lodash");
  assert_eq!(to_identifier("/root/sub/mod"), "rootSubMod");
  assert_eq!(to_identifier("/@scope/my-pkg"), "scopeMyPkg");
  assert_eq!(to_identifier("/123abc"), "abc");
  assert_eq!(to_identifier("$jquery_ui"), "$jquery_ui");
  assert_eq!(to_identifier("/."), "_");
  assert_eq!(to_identifier(""), "_");
  assert_eq!(to_identifier("default"), "_default");
  assert_eq!(to_identifier("/class"), "_class");
  assert_eq!(to_identifier("/eval"), "_eval");
  assert_eq!(to_identifier("./arguments"), "_arguments");
  assert_eq!(to_identifier("/let"), "_let");
}

#[test]
fn test_is_valid_binding_name() {
  assert!(is_valid_binding_name("evaluate"));
  assert!(!is_valid_binding_name("eval"));
  assert!(!is_valid_binding_name("arguments"));
  assert!(!is_valid_binding_name("yield"));
}

#[test]
fn test_uid_base_name() {
  assert_eq!(uid_base_name("a"), "_a");
  assert_eq!(uid_base_name("exports"), "_exports");
  assert_eq!(uid_base_name("__private"), "_private");
  assert_eq!(uid_base_name("vue3"), "_vue");
  assert_eq!(uid_base_name("my-lib"), "_myLib");
}

#[test]
fn test_property_access_str() {
  assert_eq!(property_access_str("this.Foo", "a"), "this.Foo.a");
  assert_eq!(property_access_str("_exports", "a-b"), "_exports[\"a-b\"]");
}
