use std::{borrow::Cow, path::Path};

use sugar_path::SugarPath;

/// `dir` and `name` of a slash separated path, following POSIX `path.parse` rules.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedPath<'a> {
  pub dir: &'a str,
  pub name: &'a str,
}

pub fn parse_path(path: &str) -> ParsedPath<'_> {
  let trimmed = match path.trim_end_matches('/') {
    "" if path.starts_with('/') => "/",
    trimmed => trimmed,
  };

  let (dir, base) = match trimmed.rfind('/') {
    Some(0) => ("/", &trimmed[1..]),
    Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
    None => ("", trimmed),
  };

  let name = match base {
    "." | ".." => base,
    _ => match base.rfind('.') {
      Some(idx) if idx > 0 => &base[..idx],
      _ => base,
    },
  };

  ParsedPath { dir, name }
}

/// Resolves `request` against `base` the way `path.resolve(base, request)` does.
///
/// Without a base the request is returned as is.
pub fn resolve_request<'a>(request: &'a str, base: Option<&str>) -> Cow<'a, str> {
  match base {
    Some(base) => {
      Cow::Owned(Path::new(request).absolutize_with(Path::new(base)).to_slash_lossy().into_owned())
    }
    None => Cow::Borrowed(request),
  }
}

#[test]
fn test_parse_path() {
  assert_eq!(parse_path("/dummy/root/a.js"), ParsedPath { dir: "/dummy/root", name: "a" });
  assert_eq!(parse_path("./a"), ParsedPath { dir: ".", name: "a" });
  assert_eq!(parse_path("lodash"), ParsedPath { dir: "", name: "lodash" });
  assert_eq!(parse_path("lodash/fp/"), ParsedPath { dir: "lodash", name: "fp" });
  assert_eq!(parse_path("/a.b.mjs"), ParsedPath { dir: "/", name: "a.b" });
  assert_eq!(parse_path(".eslintrc"), ParsedPath { dir: "", name: ".eslintrc" });
  assert_eq!(parse_path("."), ParsedPath { dir: "", name: "." });
  assert_eq!(parse_path("../.."), ParsedPath { dir: "..", name: ".." });
}

#[cfg(unix)]
#[test]
fn test_resolve_request() {
  assert_eq!(resolve_request("./sub/mod", Some("/root")), "/root/sub/mod");
  assert_eq!(resolve_request("../a", Some("/dummy/root")), "/dummy/a");
  assert_eq!(resolve_request("/abs/b", Some("/dummy/root")), "/abs/b");
  assert_eq!(resolve_request("./a", None), "./a");
}
