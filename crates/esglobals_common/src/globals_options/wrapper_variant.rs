use std::fmt::Display;

use serde::Deserialize;

/// Shape of the generated self-invoking factory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapperVariant {
  /// `(function(_exports, ...) { ... })(this.Ns || (this.Ns = {}), ...)`
  #[default]
  Basic,
  /// `this.Ns = (function(_exports, ...) { ...; return _exports; })({}, ...)`
  Seeded,
}

impl WrapperVariant {
  #[inline]
  pub fn returns_exports(&self) -> bool {
    matches!(self, Self::Seeded)
  }
}

impl Display for WrapperVariant {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Basic => write!(f, "basic"),
      Self::Seeded => write!(f, "seeded"),
    }
  }
}
