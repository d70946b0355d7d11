//! Analytics over the in-memory record collections.
//!
//! Pure transformations only; callers fetch the snapshots and pass
//! them in.

pub mod aggregator;

pub use aggregator::*;
