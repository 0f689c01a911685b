//! [`State`] of a [`Directory`].
//!
//! [`Directory`]: super::Directory

use std::{collections::HashSet, fmt};

use common::{Cursor, Order, Page, PageNumber};

use super::{filter::Criteria, sort_key, AsFailure, Entry, Failure};

/// Kind of a page load.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Load {
    /// Load the page the [`Cursor`] points to and append it.
    Next,

    /// Load the first page and replace everything loaded so far with it.
    Refresh,
}

/// Page request issued by a [`State`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Request {
    /// [`PageNumber`] to request.
    pub page: PageNumber,

    /// [`Load`] kind of this [`Request`].
    pub load: Load,

    /// Epoch of the [`State`] this [`Request`] was issued in.
    epoch: u64,
}

/// Outcome of applying a page to a [`State`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Applied {
    /// Page was merged into the loaded entries.
    Page {
        /// Number of entries that weren't loaded before.
        added: usize,
    },

    /// Response belongs to a [`Request`] that is no longer awaited.
    Stale,
}

/// Loaded entries together with the paging, filtering and sorting state.
pub struct State<I: Entry> {
    /// Loaded entries, in arrival order.
    items: Vec<I>,

    /// Lowercased display names of the `items`, index-aligned.
    keys: Vec<String>,

    /// IDs of the `items`.
    ids: HashSet<I::Id>,

    /// Position in the paginated collection.
    cursor: Cursor,

    /// [`Request`] awaiting its response, if any.
    in_flight: Option<Request>,

    /// Counter bumped on every reset.
    epoch: u64,

    /// [`Failure`] of the last page load, if it failed.
    last_error: Option<Failure>,

    /// Search query as typed, not yet committed.
    raw_query: String,

    /// Committed filtering [`Criteria`].
    criteria: Criteria<I::Dimension>,

    /// Sorting [`Order`], if sorting was ever requested.
    order: Option<Order>,

    /// Indices of the `items` forming the derived view.
    view: Vec<usize>,
}

impl<I: Entry> Default for State<I> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            keys: Vec::new(),
            ids: HashSet::new(),
            cursor: Cursor::start(),
            in_flight: None,
            epoch: 0,
            last_error: None,
            raw_query: String::new(),
            criteria: Criteria::default(),
            order: None,
            view: Vec::new(),
        }
    }
}

impl<I: Entry> fmt::Debug for State<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("items", &self.items.len())
            .field("cursor", &self.cursor)
            .field("in_flight", &self.in_flight)
            .field("epoch", &self.epoch)
            .field("last_error", &self.last_error)
            .field("raw_query", &self.raw_query)
            .field("criteria", &self.criteria)
            .field("order", &self.order)
            .field("view", &self.view.len())
            .finish()
    }
}

impl<I: Entry> State<I> {
    /// Returns all the loaded entries, in arrival order.
    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Returns the derived view: loaded entries matching the [`Criteria`],
    /// sorted if sorting was requested.
    pub fn view(&self) -> impl ExactSizeIterator<Item = &I> + '_ {
        self.view.iter().map(|&i| &self.items[i])
    }

    /// Returns the paging [`Cursor`].
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Indicates whether a page load is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns the [`Failure`] of the last page load, if it failed.
    #[must_use]
    pub const fn last_error(&self) -> Option<&Failure> {
        self.last_error.as_ref()
    }

    /// Returns the search query as typed.
    #[must_use]
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    /// Returns the committed filtering [`Criteria`].
    #[must_use]
    pub const fn criteria(&self) -> &Criteria<I::Dimension> {
        &self.criteria
    }

    /// Returns the sorting [`Order`], if sorting was requested.
    #[must_use]
    pub const fn order(&self) -> Option<Order> {
        self.order
    }

    /// Issues a new [`Request`] of the provided [`Load`] kind.
    ///
    /// [`None`] is returned if a [`Request`] is in flight already, or if the
    /// collection is exhausted and the [`Load`] isn't a refresh.
    pub(super) fn begin(&mut self, load: Load) -> Option<Request> {
        if self.in_flight.is_some() {
            return None;
        }
        let page = match load {
            Load::Next if !self.cursor.has_more() => return None,
            Load::Next => self.cursor.next_page(),
            Load::Refresh => PageNumber::FIRST,
        };
        let req = Request {
            page,
            load,
            epoch: self.epoch,
        };
        self.in_flight = Some(req);
        Some(req)
    }

    /// Applies the `result` of the provided [`Request`].
    ///
    /// Either the whole page is applied or nothing at all.
    ///
    /// # Errors
    ///
    /// Returns the error of the `result` back, after recording its
    /// [`Failure`].
    pub(super) fn complete<E: AsFailure>(
        &mut self,
        req: Request,
        result: Result<Page<I>, E>,
    ) -> Result<Applied, E> {
        if self.in_flight != Some(req) {
            return Ok(Applied::Stale);
        }
        self.in_flight = None;
        if req.epoch != self.epoch {
            return Ok(Applied::Stale);
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.last_error = Some(e.as_failure());
                return Err(e);
            }
        };
        self.last_error = None;

        if req.load == Load::Refresh {
            self.items.clear();
            self.keys.clear();
            self.ids.clear();
        }
        let has_next = page.has_next;
        let before = self.items.len();
        for item in page.items {
            if self.ids.insert(item.id()) {
                self.keys.push(sort_key(&item));
                self.items.push(item);
            }
        }
        self.cursor.advance(req.page, has_next);
        self.recompute();

        Ok(Applied::Page {
            added: self.items.len() - before,
        })
    }

    /// Stores the search query as typed.
    pub(super) fn set_raw_query(&mut self, query: &str) {
        query.clone_into(&mut self.raw_query);
    }

    /// Commits the provided search `query` into the [`Criteria`].
    pub(super) fn commit_query(&mut self, query: &str) {
        if self.criteria.set_query(query) {
            self.recompute();
        }
    }

    /// Selects the `value` of the categorical `dimension`, clearing the
    /// selection if the `value` is blank.
    pub(super) fn set_category(&mut self, dimension: I::Dimension, value: &str) {
        if self.criteria.set_category(dimension, value) {
            self.recompute();
        }
    }

    /// Flips the sorting [`Order`], starting from [`Order::Ascending`].
    pub(super) fn toggle_sort(&mut self) -> Order {
        let order = self.order.map_or(Order::Ascending, Order::reversed);
        self.order = Some(order);
        self.recompute();
        order
    }

    /// Discards everything, so that a [`Request`] in flight is ignored once
    /// completed.
    ///
    /// The [`Request`] in flight still blocks new ones until it completes.
    pub(super) fn reset(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self {
            epoch,
            in_flight: self.in_flight,
            ..Self::default()
        };
    }

    /// Recomputes the derived view.
    fn recompute(&mut self) {
        let mut view = (0..self.items.len())
            .filter(|&i| self.criteria.matches(&self.items[i], &self.keys[i]))
            .collect::<Vec<_>>();
        if let Some(order) = self.order {
            view.sort_by(|&a, &b| order.apply(self.keys[a].cmp(&self.keys[b])));
        }
        self.view = view;
    }
}

#[cfg(test)]
mod spec {
    use common::{Order, Page, PageNumber};

    use crate::{
        directory::{Entry as _, FailureKind},
        domain::{student::Dimension, Student},
        infra::backend::{self, mock::student},
        Error,
    };

    use super::{Applied, Load, State};

    fn students(ids: impl IntoIterator<Item = u64>) -> Vec<Student> {
        ids.into_iter()
            .map(|id| {
                student(
                    id,
                    &format!("First{id}"),
                    &format!("Last{id}"),
                    &format!("s{id}@univ.fr"),
                    "casa",
                    "info",
                )
            })
            .collect()
    }

    fn load(
        state: &mut State<Student>,
        kind: Load,
        page: Result<Page<Student>, Error>,
    ) -> Result<Applied, Error> {
        let req = state.begin(kind).unwrap();
        state.complete(req, page)
    }

    fn names(state: &State<Student>) -> Vec<String> {
        state.view().map(|s| s.display_name()).collect()
    }

    #[test]
    fn appends_pages_and_advances_cursor() {
        let mut state = State::default();

        let applied =
            load(&mut state, Load::Next, Ok(Page::new(students(1..=20), true)));
        assert_eq!(applied.unwrap(), Applied::Page { added: 20 });
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.cursor().next_page().get(), 2);
        assert!(state.cursor().has_more());

        let applied =
            load(&mut state, Load::Next, Ok(Page::new(students(21..=25), false)));
        assert_eq!(applied.unwrap(), Applied::Page { added: 5 });
        assert_eq!(state.items().len(), 25);
        assert!(!state.cursor().has_more());

        assert!(state.begin(Load::Next).is_none());
        assert_eq!(state.items().len(), 25);
    }

    #[test]
    fn skips_already_loaded_ids() {
        let mut state = State::default();
        _ = load(&mut state, Load::Next, Ok(Page::new(students(1..=3), true)))
            .unwrap();

        let applied =
            load(&mut state, Load::Next, Ok(Page::new(students(3..=5), true)));

        assert_eq!(applied.unwrap(), Applied::Page { added: 2 });
        let ids = state
            .items()
            .iter()
            .map(|s| u64::from(s.id))
            .collect::<Vec<_>>();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn allows_single_request_in_flight() {
        let mut state = State::<Student>::default();

        let req = state.begin(Load::Next).unwrap();
        assert!(state.is_loading());
        assert!(state.begin(Load::Next).is_none());
        assert!(state.begin(Load::Refresh).is_none());

        _ = state.complete(req, Ok::<_, Error>(Page::new(vec![], true)));
        assert!(!state.is_loading());
        assert!(state.begin(Load::Refresh).is_some());
    }

    #[test]
    fn refresh_replaces_loaded_entries() {
        let mut state = State::default();
        _ = load(&mut state, Load::Next, Ok(Page::new(students(1..=20), true)))
            .unwrap();
        _ = load(&mut state, Load::Next, Ok(Page::new(students(21..=25), false)))
            .unwrap();

        let req = state.begin(Load::Refresh).unwrap();
        assert_eq!(req.page, PageNumber::FIRST);
        let applied = state
            .complete(req, Ok::<_, Error>(Page::new(students(1..=20), true)));

        assert_eq!(applied.unwrap(), Applied::Page { added: 20 });
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.cursor().next_page().get(), 2);
        assert!(state.cursor().has_more());
    }

    #[test]
    fn failure_leaves_state_untouched() {
        let mut state = State::default();
        _ = load(&mut state, Load::Next, Ok(Page::new(students(1..=20), true)))
            .unwrap();

        let err = load(
            &mut state,
            Load::Next,
            Err(Error::Backend(backend::Error::Unauthorized)),
        )
        .unwrap_err();

        assert!(err.requires_reauthentication());
        assert_eq!(state.items().len(), 20);
        assert_eq!(state.cursor().next_page().get(), 2);
        assert!(state.cursor().has_more());
        assert!(!state.is_loading());
        assert_eq!(
            state.last_error().unwrap().kind,
            FailureKind::Reauthenticate,
        );

        let err = load(
            &mut state,
            Load::Next,
            Err(Error::Backend(backend::Error::Network("offline".into()))),
        )
        .unwrap_err();
        assert!(!err.requires_reauthentication());
        assert_eq!(state.last_error().unwrap().kind, FailureKind::Transient);

        _ = load(&mut state, Load::Next, Ok(Page::new(students(21..=22), false)))
            .unwrap();
        assert!(state.last_error().is_none());
        assert_eq!(state.items().len(), 22);
    }

    #[test]
    fn reset_discards_response_in_flight() {
        let mut state = State::default();
        let req = state.begin(Load::Next).unwrap();

        state.reset();
        assert!(state.is_loading());
        assert_eq!(state.begin(Load::Next), None);
        assert_eq!(state.begin(Load::Refresh), None);

        let applied = state
            .complete(req, Ok::<_, Error>(Page::new(students(1..=3), true)));

        assert_eq!(applied.unwrap(), Applied::Stale);
        assert!(state.items().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.cursor().next_page(), PageNumber::FIRST);
        assert_eq!(state.begin(Load::Next).unwrap().page, PageNumber::FIRST);
    }

    #[test]
    fn categories_intersect() {
        let mut state = State::default();
        let items = vec![
            student(1, "Ana", "A", "a@univ.fr", "casa", "info"),
            student(2, "Bob", "B", "b@univ.fr", "casa", "math"),
            student(3, "Cid", "C", "c@univ.fr", "rabat", "info"),
            student(4, "Dan", "D", "d@univ.fr", "rabat", "math"),
        ];
        _ = load(&mut state, Load::Next, Ok(Page::new(items, false))).unwrap();

        state.set_category(Dimension::Class, "casa");
        let by_class = names(&state);
        state.set_category(Dimension::Class, "");
        state.set_category(Dimension::Field, "info");
        let by_field = names(&state);
        state.set_category(Dimension::Class, "casa");
        let both = names(&state);

        assert_eq!(by_class, ["Ana A", "Bob B"]);
        assert_eq!(by_field, ["Ana A", "Cid C"]);
        assert_eq!(
            both,
            by_class
                .into_iter()
                .filter(|n| by_field.contains(n))
                .collect::<Vec<_>>(),
        );
    }

    #[test]
    fn sorts_by_name_ignoring_case() {
        let mut state = State::default();
        let items = vec![
            student(1, "Beta", "X", "b@univ.fr", "casa", "info"),
            student(2, "alpha", "X", "a@univ.fr", "casa", "info"),
            student(3, "Gamma", "X", "g@univ.fr", "casa", "info"),
        ];
        _ = load(&mut state, Load::Next, Ok(Page::new(items, false))).unwrap();
        assert_eq!(names(&state), ["Beta X", "alpha X", "Gamma X"]);

        assert_eq!(state.toggle_sort(), Order::Ascending);
        assert_eq!(names(&state), ["alpha X", "Beta X", "Gamma X"]);

        assert_eq!(state.toggle_sort(), Order::Descending);
        assert_eq!(names(&state), ["Gamma X", "Beta X", "alpha X"]);
    }

    #[test]
    fn sort_is_stable_across_toggles() {
        let mut state = State::default();
        let items = vec![
            student(1, "Same", "Name", "one@univ.fr", "casa", "info"),
            student(2, "Other", "Name", "two@univ.fr", "casa", "info"),
            student(3, "same", "name", "three@univ.fr", "casa", "info"),
        ];
        _ = load(&mut state, Load::Next, Ok(Page::new(items, false))).unwrap();

        _ = state.toggle_sort();
        let ascending = state.view().map(|s| u64::from(s.id)).collect::<Vec<_>>();
        assert_eq!(ascending, [2, 1, 3]);

        _ = state.toggle_sort();
        let descending =
            state.view().map(|s| u64::from(s.id)).collect::<Vec<_>>();
        assert_eq!(descending, [1, 3, 2]);

        _ = state.toggle_sort();
        assert_eq!(
            state.view().map(|s| u64::from(s.id)).collect::<Vec<_>>(),
            ascending,
        );
    }

    #[test]
    fn view_stays_subset_of_items() {
        let mut state = State::default();
        _ = load(&mut state, Load::Next, Ok(Page::new(students(1..=12), true)))
            .unwrap();

        state.commit_query("first1");
        _ = state.toggle_sort();
        _ = load(&mut state, Load::Next, Ok(Page::new(students(13..=15), false)))
            .unwrap();

        let ids = state
            .view()
            .map(|s| u64::from(s.id))
            .collect::<Vec<_>>();
        assert_eq!(ids, [1, 10, 11, 12, 13, 14, 15]);
        assert!(state.view().all(|v| state.items().iter().any(|i| i.id == v.id)));
    }
}
