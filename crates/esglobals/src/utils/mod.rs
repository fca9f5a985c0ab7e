pub mod normalize_options;
pub mod uid_generator;
