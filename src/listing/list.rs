use error_stack::Report;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::fetcher::{FetchError, Fetcher, Page, PAGE_SIZE};
use super::view::{derive, SortKey};
use crate::schema::Post;
use crate::store::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first page.
    InitialLoading,
    Ready,
    LoadingMore,
}

/// What happened to a `mount` or `load_more` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page arrived with this many posts.
    Loaded(usize),
    Failed,
    /// Nothing was requested: the list is busy, exhausted or already mounted.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoMatches,
    NoPosts,
}

impl EmptyReason {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoMatches => "Try adjusting your search or sort criteria.",
            Self::NoPosts => "There are no posts to display at the moment. Try creating one!",
        }
    }
}

/// One render of the post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Skeleton { placeholders: usize },
    Listing(ListView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Filtered and sorted posts.
    pub posts: Vec<Post>,
    pub search_term: String,
    pub sort: SortKey,
    pub show_load_more: bool,
    pub loading: bool,
    pub empty: Option<EmptyReason>,
    pub error: Option<String>,
}

#[derive(Debug)]
struct ListState {
    mounted: bool,
    phase: Phase,
    posts: Vec<Post>,
    cursor: Option<Cursor>,
    has_more: bool,
    search_term: String,
    sort: SortKey,
    last_error: Option<String>,
}

impl ListState {
    fn apply(&mut self, result: Result<Page, Report<FetchError>>) -> LoadOutcome {
        self.phase = Phase::Ready;
        match result {
            Ok(page) => {
                let count = page.posts.len();
                self.posts.extend(page.posts);
                // an empty page keeps the last cursor instead of clearing it
                if page.next_cursor.is_some() {
                    self.cursor = page.next_cursor;
                }
                self.has_more = page.has_more;
                self.last_error = None;
                LoadOutcome::Loaded(count)
            }
            Err(report) => {
                tracing::error!(error = ?report, "failed to fetch posts");
                self.last_error = Some(report.current_context().to_string());
                LoadOutcome::Failed
            }
        }
    }
}

/// Paginated, searchable and sortable list of posts.
///
/// All methods take `&self` so a list can be shared between tasks. At most
/// one fetch is outstanding at a time; the internal lock is never held
/// while a fetch is in flight.
#[derive(Debug)]
pub struct PostList {
    fetcher: Fetcher,
    state: Mutex<ListState>,
}

impl PostList {
    #[must_use]
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            state: Mutex::new(ListState {
                mounted: false,
                phase: Phase::InitialLoading,
                posts: Vec::new(),
                cursor: None,
                has_more: true,
                search_term: String::new(),
                sort: SortKey::default(),
                last_error: None,
            }),
        }
    }

    /// Fetches the first page. Only the first call does anything.
    #[tracing::instrument(skip_all, name = "listing.mount")]
    pub async fn mount(&self) -> LoadOutcome {
        {
            let mut state = self.state();
            if state.mounted {
                return LoadOutcome::Ignored;
            }
            state.mounted = true;
        }

        let result = self.fetcher.fetch_page(None).await;
        self.state().apply(result)
    }

    /// Fetches the page after the last loaded post and appends it.
    ///
    /// After a failed first page the cursor is still unset, so this
    /// retries the first page.
    #[tracing::instrument(skip_all, name = "listing.load_more")]
    pub async fn load_more(&self) -> LoadOutcome {
        let cursor = {
            let mut state = self.state();
            if state.phase != Phase::Ready || !state.has_more {
                tracing::debug!(phase = ?state.phase, has_more = state.has_more, "ignoring load more");
                return LoadOutcome::Ignored;
            }
            state.phase = Phase::LoadingMore;
            state.cursor.clone()
        };

        let result = self.fetcher.fetch_page(cursor.as_ref()).await;
        self.state().apply(result)
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.state().search_term = term.into();
    }

    pub fn set_sort(&self, sort: SortKey) {
        self.state().sort = sort;
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        let state = self.state();
        let loading = state.phase != Phase::Ready;
        if state.phase == Phase::InitialLoading || (loading && state.posts.is_empty()) {
            return Frame::Skeleton {
                placeholders: PAGE_SIZE,
            };
        }

        let posts = derive(&state.posts, &state.search_term, state.sort)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();

        let empty = if !posts.is_empty() {
            None
        } else if state.search_term.is_empty() {
            Some(EmptyReason::NoPosts)
        } else {
            Some(EmptyReason::NoMatches)
        };

        Frame::Listing(ListView {
            posts,
            search_term: state.search_term.clone(),
            sort: state.sort,
            show_load_more: state.has_more && !loading,
            loading,
            empty,
            error: state.last_error.clone(),
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state().has_more
    }

    /// Amount of posts fetched so far, regardless of the search term.
    #[must_use]
    pub fn posts_len(&self) -> usize {
        self.state().posts.len()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    #[must_use]
    pub fn search_term(&self) -> String {
        self.state().search_term.clone()
    }

    #[must_use]
    pub fn sort(&self) -> SortKey {
        self.state().sort
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
