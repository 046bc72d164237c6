use thiserror::Error;


/// Error returned when a [`SkipList`] is constructed with an invalid
/// configuration.
///
/// [`SkipList`]: crate::SkipList
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructError {
    #[error("a skiplist needs at least one level, but max_level was 0")]
    ZeroMaxLevel,
}
