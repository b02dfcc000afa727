// src/search/error.rs
use std::fmt;

/// Failure of a single binary search
#[derive(Debug)]
pub enum SearchError<E> {
    /// Nothing to search (empty candidate sequence)
    InvalidInput(&'static str),

    /// The oracle failed; the search was aborted at that probe
    Oracle(E),
}

impl<E: fmt::Display> fmt::Display for SearchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchError::InvalidInput(s) => write!(f, "Invalid search input: {}", s),
            SearchError::Oracle(e) => write!(f, "Oracle failure: {}", e),
        }
    }
}

impl<E> std::error::Error for SearchError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::InvalidInput(_) => None,
            SearchError::Oracle(e) => Some(e),
        }
    }
}
