pub use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
