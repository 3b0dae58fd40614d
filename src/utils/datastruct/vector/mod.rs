pub mod mutable;
pub mod frozen;

pub use mutable::MutableSparseVec;
pub use frozen::SparseVec;

/// Dense numeric identity of a tag within one model build.
/// Assigned from 1 upwards.
pub type TagId = u32;
