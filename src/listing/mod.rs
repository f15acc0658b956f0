//! Post listing: paginated fetching, client-side filter and sort,
//! and the list state machine that ties them together.
mod fetcher;
mod list;
pub mod render;
mod view;

pub use fetcher::{FetchError, Fetcher, Page, PAGE_SIZE};
pub use list::{EmptyReason, Frame, ListView, LoadOutcome, Phase, PostList};
pub use view::{derive, matches_search, ParseSortKeyError, SortKey};
