//! Cursor pagination guard.
//!
//! Venue listings return an opaque cursor per page. A listing ends when
//! the cursor is absent, null or empty. A cursor seen before means the
//! venue stopped advancing; that is a protocol error, never a loop.

use std::collections::HashSet;

use crate::error::{Result, VenueError};

/// Tracks cursors for one listing. Local to a single invocation.
#[derive(Debug, Default)]
pub struct CursorGuard {
    seen: HashSet<String>,
    pages: usize,
}

impl CursorGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages consumed so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Record a fetched page and decide the cursor for the next one.
    ///
    /// Returns `Ok(None)` when the listing is exhausted.
    ///
    /// # Errors
    /// `PaginationProtocol` if `next` repeats an earlier cursor.
    pub fn advance(&mut self, next: Option<String>) -> Result<Option<String>> {
        self.pages += 1;
        match next {
            None => Ok(None),
            Some(cursor) if cursor.is_empty() => Ok(None),
            Some(cursor) => {
                if self.seen.insert(cursor.clone()) {
                    Ok(Some(cursor))
                } else {
                    Err(VenueError::PaginationProtocol(format!(
                        "cursor `{cursor}` repeated after {} pages",
                        self.pages
                    )))
                }
            }
        }
    }
}
