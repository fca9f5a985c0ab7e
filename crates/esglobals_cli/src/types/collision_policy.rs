use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum CollisionPolicy {
  Warn,
  Error,
}

impl From<CollisionPolicy> for esglobals::CollisionPolicy {
  fn from(value: CollisionPolicy) -> Self {
    match value {
      CollisionPolicy::Warn => esglobals::CollisionPolicy::Warn,
      CollisionPolicy::Error => esglobals::CollisionPolicy::Error,
    }
  }
}
