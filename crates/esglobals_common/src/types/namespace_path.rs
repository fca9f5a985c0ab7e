use esglobals_error::GlobalsError;
use esglobals_utils::ecmascript::is_validate_identifier_name;

/// A dotted namespace such as `Dog.Cat`, stored as its segments.
///
/// An absent or empty name has no segments and stands for the root itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NamespacePath {
  segments: Vec<String>,
}

impl NamespacePath {
  pub fn parse(dotted: Option<&str>) -> Result<Self, GlobalsError> {
    let Some(dotted) = dotted.filter(|dotted| !dotted.is_empty()) else {
      return Ok(Self::default());
    };

    let segments = dotted
      .split('.')
      .map(|segment| {
        if is_validate_identifier_name(segment) {
          Ok(segment.to_string())
        } else {
          Err(GlobalsError::Configuration(format!(
            "namespace `{dotted}` has an invalid segment `{segment}`"
          )))
        }
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self { segments })
  }

  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  pub fn is_root(&self) -> bool {
    self.segments.is_empty()
  }

  pub fn display_from(&self, root: &str) -> String {
    self.segments.iter().fold(root.to_string(), |acc, segment| format!("{acc}.{segment}"))
  }
}

#[test]
fn test_parse_namespace_path() {
  let path = NamespacePath::parse(Some("Dog.Cat")).unwrap();
  assert_eq!(path.segments(), ["Dog", "Cat"]);
  assert_eq!(path.display_from("this"), "this.Dog.Cat");

  assert!(NamespacePath::parse(None).unwrap().is_root());
  assert!(NamespacePath::parse(Some("")).unwrap().is_root());
}

#[test]
fn test_reject_malformed_namespace_path() {
  for dotted in ["A..B", ".A", "A.", "A.1b", "A.b-c"] {
    let error = NamespacePath::parse(Some(dotted)).unwrap_err();
    assert!(matches!(error, GlobalsError::Configuration(_)), "{dotted} should be rejected");
  }
}
