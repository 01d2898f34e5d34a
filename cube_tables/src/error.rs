use thiserror::Error;

/// Consistency failures detected while building tables.
///
/// Out-of-range coordinates, moves or indices are programming errors and panic instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{table}: found {actual} symmetry classes, expected {expected}")]
    ClassCount { table: &'static str, expected: usize, actual: usize },

    #[error("{table}: no entry reached at depth {depth} with {filled} of {total} entries filled")]
    Incomplete { table: &'static str, depth: u8, filled: usize, total: usize },

    #[error("{table}: depth {depth} does not fit in a pruning table cell")]
    DepthOverflow { table: &'static str, depth: u8 },

    #[error("{table}: {what} has {actual} entries, expected {expected}")]
    DimensionMismatch { table: &'static str, what: &'static str, expected: usize, actual: usize },
}
