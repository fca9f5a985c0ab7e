use serde::Deserialize;

/// What to do when two import sources read the same global.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
  #[default]
  Warn,
  Error,
}
