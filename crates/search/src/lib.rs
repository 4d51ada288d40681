//! Content search for the project tree.
//!
//! [`SearchCoordinator`] sits behind the query field: it debounces edits,
//! stamps every search with a generation and applies only the newest
//! generation's result. The actual scan is [`search_files`], run on the
//! blocking pool through a [`SearchBackend`].
//!
//! Results reach the listing view as [`SearchEvent`]s; [`NameFilter`] turns
//! the carried [`FilterUpdate`]s into a per-file-name predicate.

mod coordinator;
mod error;
mod filter;
mod options;
mod types;
mod worker;

pub use coordinator::SearchCoordinator;
pub use error::SearchError;
pub use filter::NameFilter;
pub use options::SearchOptions;
pub use types::{CoordinatorSnapshot, FilterUpdate, SearchEvent, SearchPhase, SearchRequest, SearchResult};
pub use worker::{FsSearchBackend, SearchBackend, search_files};
