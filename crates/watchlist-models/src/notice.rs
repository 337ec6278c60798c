use serde::{Deserialize, Serialize};

/// User-visible message keys.
///
/// Failures never carry their cause to the user: every failure maps to
/// `GeneralError`. The text for each key is looked up in configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Notice {
    GeneralError,
    MovieAdded,
    MovieDeleted,
    MoviesDeleted,
}

impl Notice {
    /// Singular notice for exactly one deleted movie, plural otherwise.
    pub fn for_deleted_count(count: usize) -> Self {
        if count == 1 {
            Notice::MovieDeleted
        } else {
            Notice::MoviesDeleted
        }
    }
}
