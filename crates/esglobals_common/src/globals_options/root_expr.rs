use serde::Deserialize;

/// The value every namespace path starts from.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RootExpr {
  /// The ambient `this` of a classic script, i.e. the global object.
  #[default]
  This,
  /// A global binding such as `globalThis` or `window`.
  Identifier(String),
}

impl RootExpr {
  pub fn as_str(&self) -> &str {
    match self {
      Self::This => "this",
      Self::Identifier(name) => name,
    }
  }
}

impl From<String> for RootExpr {
  fn from(value: String) -> Self {
    if value == "this" { Self::This } else { Self::Identifier(value) }
  }
}
