pub mod module_meta;
pub mod namespace_path;
