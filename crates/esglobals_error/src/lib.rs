mod globals_error;

use std::ops::{Deref, DerefMut};

pub use crate::globals_error::GlobalsError;

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Finds the first error that is a [`GlobalsError`].
  pub fn find_globals_error(&self) -> Option<&GlobalsError> {
    self.0.iter().find_map(|error| error.downcast_ref::<GlobalsError>())
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (idx, error) in self.0.iter().enumerate() {
      if idx > 0 {
        writeln!(f)?;
      }
      write!(f, "{error}")?;
    }
    Ok(())
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<GlobalsError> for BuildError {
  fn from(error: GlobalsError) -> Self {
    Self(vec![error.into()])
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn test_find_globals_error() {
  let error = BuildError::from(vec![
    anyhow::anyhow!("unrelated"),
    GlobalsError::Configuration("missing `exportNamespace`".into()).into(),
  ]);
  assert!(matches!(error.find_globals_error(), Some(GlobalsError::Configuration(_))));
  assert_eq!(error.to_string(), "unrelated\nInvalid configuration: missing `exportNamespace`");
}
