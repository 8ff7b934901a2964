use thiserror::Error;

/// Reasons a key cannot be stored in a [`Dense`](crate::Dense) set.
///
/// A dense set indexes its words directly by key, so only keys in
/// `0..=usize::MAX` have a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("dense set keys must be non-negative")]
    Negative,
    #[error("dense set key does not fit in a machine word")]
    Overflow,
}
