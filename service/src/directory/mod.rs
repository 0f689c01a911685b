//! [`Directory`] of remote entries browsed page by page.
//!
//! A [`Directory`] loads pages of a remote collection, merges them into a
//! growing local list and derives a filtered and sorted view of it. Search
//! queries are committed only after a quiet [`Config::debounce`] window,
//! while categorical filters and sorting apply immediately.
//!
//! Filtering and sorting are purely local: they never reset the paging
//! [`Cursor`], so the view only covers the pages loaded so far.
//!
//! [`Cursor`]: common::Cursor

mod filter;
mod state;

use std::{
    cell::{Ref, RefCell},
    fmt,
    hash::Hash,
    rc::Rc,
    time::Duration,
};

use common::{operations::By, Order, Page, PageNumber};
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{student, Student},
    query::BackendQuery,
    task::Debounce,
    Error, Query,
};

pub use self::{
    filter::Criteria,
    state::{Load, Request, State},
};

/// [`Directory`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Quiet window a typed search query waits for before being committed.
    #[default(Duration::from_millis(300))]
    pub debounce: Duration,
}

/// Entry of a [`Directory`].
pub trait Entry {
    /// Identity of an [`Entry`], used for de-duplication.
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Categorical dimension an [`Entry`] may be filtered by.
    type Dimension: Copy + Eq + Hash + fmt::Debug;

    /// Returns the identity of this [`Entry`].
    fn id(&self) -> Self::Id;

    /// Returns the name this [`Entry`] is displayed and sorted by.
    fn display_name(&self) -> String;

    /// Returns the email address of this [`Entry`].
    fn email(&self) -> &str;

    /// Returns the value of the provided categorical `dimension`, if any.
    fn category(&self, dimension: Self::Dimension) -> Option<&str>;
}

impl Entry for Student {
    type Id = student::Id;
    type Dimension = student::Dimension;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn display_name(&self) -> String {
        self.user.full_name()
    }

    fn email(&self) -> &str {
        self.user.email.as_ref()
    }

    fn category(&self, dimension: Self::Dimension) -> Option<&str> {
        Student::category(self, dimension)
    }
}

/// Key the provided `entry` is sorted and searched by.
pub(crate) fn sort_key<E: Entry>(entry: &E) -> String {
    entry.display_name().to_lowercase()
}

/// Classification of a failed page load.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Credential is missing or expired, so the user has to sign in again.
    Reauthenticate,

    /// Failure may go away on retry.
    Transient,
}

/// User-visible failure of a page load.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    /// [`FailureKind`] of this [`Failure`].
    pub kind: FailureKind,

    /// Message to be shown to the user.
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Conversion of an error into a [`Failure`].
pub trait AsFailure {
    /// Classifies this error as a [`Failure`].
    fn as_failure(&self) -> Failure;
}

impl AsFailure for Error {
    fn as_failure(&self) -> Failure {
        Failure {
            kind: if self.requires_reauthentication() {
                FailureKind::Reauthenticate
            } else {
                FailureKind::Transient
            },
            message: self.to_string(),
        }
    }
}

impl<E: AsFailure> AsFailure for Traced<E> {
    fn as_failure(&self) -> Failure {
        self.as_ref().as_failure()
    }
}

/// Outcome of a [`Directory`] page load.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Loaded {
    /// Nothing was requested: a load is in flight already, or there are no
    /// more pages.
    Skipped,

    /// Page was loaded and merged.
    Page {
        /// Number of entries that weren't loaded before.
        added: usize,
    },

    /// Page was loaded, but discarded because the [`Directory`] was reset
    /// meanwhile.
    Stale,
}

/// [`Query`] of a page of `I` entries.
pub type PageQuery<I> = BackendQuery<By<Page<I>, PageNumber>>;

/// Paginated collection of `I` entries loaded through an `S` service.
///
/// Must be used within a [`tokio::task::LocalSet`], as search queries are
/// committed by a local [`Debounce`] task.
pub struct Directory<S, I: Entry> {
    /// Service the pages are loaded through.
    service: S,

    /// Shared [`State`] of this [`Directory`].
    state: Rc<RefCell<State<I>>>,

    /// Timer committing typed search queries.
    debounce: RefCell<Debounce>,
}

impl<S, I: Entry> fmt::Debug for Directory<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory")
            .field("state", &self.state)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl<S, I: Entry + 'static> Directory<S, I> {
    /// Creates a new empty [`Directory`] loading pages through the provided
    /// `service`.
    #[must_use]
    pub fn new(service: S, config: &Config) -> Self {
        Self {
            service,
            state: Rc::new(RefCell::new(State::default())),
            debounce: RefCell::new(Debounce::new(config.debounce)),
        }
    }

    /// Returns the service this [`Directory`] loads pages through.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Returns the current [`State`] of this [`Directory`].
    ///
    /// # Panics
    ///
    /// If the returned [`Ref`] is held while this [`Directory`] is mutated.
    #[must_use]
    pub fn state(&self) -> Ref<'_, State<I>> {
        self.state.borrow()
    }

    /// Loads the next page, unless a load is in flight already or there are
    /// no more pages.
    ///
    /// # Errors
    ///
    /// If the page failed to load. The [`Failure`] is recorded in the
    /// [`State`], which remains otherwise untouched.
    pub async fn load_next_page(
        &self,
    ) -> Result<Loaded, <S as Query<PageQuery<I>>>::Err>
    where
        S: Query<PageQuery<I>, Ok = Page<I>>,
        S::Err: AsFailure + fmt::Display,
    {
        self.load(Load::Next).await
    }

    /// Reloads the first page and replaces everything loaded so far with it,
    /// unless a load is in flight already.
    ///
    /// # Errors
    ///
    /// If the page failed to load. The [`Failure`] is recorded in the
    /// [`State`], which remains otherwise untouched.
    pub async fn refresh(
        &self,
    ) -> Result<Loaded, <S as Query<PageQuery<I>>>::Err>
    where
        S: Query<PageQuery<I>, Ok = Page<I>>,
        S::Err: AsFailure + fmt::Display,
    {
        self.load(Load::Refresh).await
    }

    /// Performs a page load of the provided kind.
    async fn load(
        &self,
        load: Load,
    ) -> Result<Loaded, <S as Query<PageQuery<I>>>::Err>
    where
        S: Query<PageQuery<I>, Ok = Page<I>>,
        S::Err: AsFailure + fmt::Display,
    {
        let Some(req) = self.state.borrow_mut().begin(load) else {
            log::debug!("`{load:?}` load skipped");
            return Ok(Loaded::Skipped);
        };
        log::debug!("requesting page {} for `{load:?}` load", req.page);

        let result = self.service.execute(BackendQuery::by(req.page)).await;

        let applied = self.state.borrow_mut().complete(req, result);
        match applied {
            Ok(state::Applied::Page { added }) => {
                log::debug!("page {} merged {added} new entries", req.page);
                Ok(Loaded::Page { added })
            }
            Ok(state::Applied::Stale) => {
                log::debug!("page {} discarded as stale", req.page);
                Ok(Loaded::Stale)
            }
            Err(e) => {
                log::warn!("failed to load page {}: {e}", req.page);
                Err(e)
            }
        }
    }

    /// Sets the typed search query, committing it once no other query is
    /// typed within the [`Config::debounce`] window.
    ///
    /// # Panics
    ///
    /// If called outside of a [`tokio::task::LocalSet`].
    pub fn set_search_query(&self, query: &str) {
        self.state.borrow_mut().set_raw_query(query);

        let state = Rc::downgrade(&self.state);
        let query = query.to_owned();
        self.debounce.borrow_mut().schedule(move || {
            if let Some(state) = state.upgrade() {
                log::debug!("search query `{query}` committed");
                state.borrow_mut().commit_query(&query);
            }
        });
    }

    /// Commits the typed search query immediately.
    pub fn flush_search_query(&self) {
        _ = self.debounce.borrow_mut().cancel();
        let mut state = self.state.borrow_mut();
        let query = state.raw_query().to_owned();
        state.commit_query(&query);
    }

    /// Selects the `value` of the categorical `dimension`, clearing the
    /// selection if the `value` is blank.
    pub fn set_filter(&self, dimension: I::Dimension, value: &str) {
        self.state.borrow_mut().set_category(dimension, value);
    }

    /// Flips the sorting [`Order`], starting from [`Order::Ascending`].
    pub fn toggle_sort(&self) -> Order {
        self.state.borrow_mut().toggle_sort()
    }

    /// Discards everything loaded, together with the filtering and sorting
    /// state.
    ///
    /// A load in flight is ignored once completed, and new loads are skipped
    /// until then.
    pub fn reset(&self) {
        _ = self.debounce.borrow_mut().cancel();
        self.state.borrow_mut().reset();
        log::debug!("directory reset");
    }
}
