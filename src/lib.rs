//! Reusable sets of machine-word keys.
//!
//! Built for cycle-avoiding graph traversal, where a node is looked up and
//! marked once per edge and the same set is emptied and refilled for every
//! traversal. Two structures are provided:
//!
//! - [`Set`] for sparse keys with arbitrary bit patterns, typically object
//!   addresses.
//! - [`Dense`] for small dense key ranges, typically node indices `0..n`.
//!
//! Neither supports removal. Both keep their allocations across `reset`, so a
//! set reused for many traversals stops allocating once it has held its
//! largest workload.

mod dense;
mod error;
mod set;
mod visited;

pub use dense::{Dense, Iter, WORD_BITS};
pub use error::KeyError;
pub use set::{scramble, Keys, Set, SetParams, DEFAULT_LIST_CAPACITY, DEFAULT_MIN_DIFF};
pub use visited::Visited;
