/// Failures surfaced by forest operations.
///
/// Inserting a present key or removing an absent one is not an error; those
/// report `false` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The handle does not name a live node (or not one of the given tree).
    #[error("node handle does not refer to a live node of this tree")]
    InvalidHandle,
    /// Order-statistics lookup past the end of the tree.
    #[error("index {index} out of range for tree of size {size}")]
    OutOfRange { index: usize, size: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
