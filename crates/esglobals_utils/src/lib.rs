pub mod ecmascript;
pub mod path_ext;
pub mod rayon;

use std::hash::BuildHasherDefault;

use rustc_hash::FxHasher;

/// Insertion-ordered map, used wherever output order must follow source order.
pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasherDefault<FxHasher>>;
