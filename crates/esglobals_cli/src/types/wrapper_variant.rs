use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum WrapperVariant {
  Basic,
  Seeded,
}

impl From<WrapperVariant> for esglobals::WrapperVariant {
  fn from(value: WrapperVariant) -> Self {
    match value {
      WrapperVariant::Basic => esglobals::WrapperVariant::Basic,
      WrapperVariant::Seeded => esglobals::WrapperVariant::Seeded,
    }
  }
}
