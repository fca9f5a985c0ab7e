use esglobals_error::GlobalsError;

#[derive(Debug, Default)]
pub struct TransformOutput {
  /// `false` if the file isn't a module and was left untouched.
  pub wrapped: bool,
  pub warnings: Vec<GlobalsError>,
}

#[derive(Debug)]
pub struct TransformReturn {
  pub code: String,
  pub wrapped: bool,
  pub warnings: Vec<GlobalsError>,
}
