//! Port contracts for issue and todo persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker services.

pub mod query;
pub mod repository;

pub use query::{
    DEFAULT_PAGE_LIMIT, IssueFilter, MAX_PAGE_LIMIT, Page, PageRequest, TodoFilter,
};
pub use repository::{
    IssueRepository, TodoRepository, TrackerRepositoryError, TrackerRepositoryResult,
};
