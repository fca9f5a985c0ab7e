pub mod collision_policy;
pub mod source_kind;
pub mod wrapper_variant;
