//! In-memory adapters used by tests and the default server backend.

mod issue;
mod todo;

pub use issue::InMemoryIssueRepository;
pub use todo::InMemoryTodoRepository;

use crate::tracker::ports::{Page, PageRequest, TrackerRepositoryError};

fn lock_poisoned(err: impl std::fmt::Display) -> TrackerRepositoryError {
    TrackerRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Cuts the already sorted `items` down to the requested window.
fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let window = items
        .into_iter()
        .skip(offset)
        .take(request.limit() as usize)
        .collect();
    Page::new(window, total, request)
}
