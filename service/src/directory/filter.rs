//! [`Criteria`] of narrowing down the loaded entries.

use std::{collections::HashMap, fmt, hash::Hash};

use super::Entry;

/// Local filtering criteria of a [`Directory`].
///
/// An [`Entry`] matches if its display name or email contains the search
/// query (case-insensitively), and each selected category dimension equals
/// the selected value exactly.
///
/// [`Directory`]: super::Directory
pub struct Criteria<D> {
    /// Committed search query, lowercased.
    query: String,

    /// Selected values of categorical dimensions.
    categories: HashMap<D, String>,
}

impl<D> Default for Criteria<D> {
    fn default() -> Self {
        Self {
            query: String::new(),
            categories: HashMap::new(),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for Criteria<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criteria")
            .field("query", &self.query)
            .field("categories", &self.categories)
            .finish()
    }
}

impl<D: Copy + Eq + Hash> Criteria<D> {
    /// Returns the committed search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the selected value of the provided `dimension`, if any.
    #[must_use]
    pub fn category(&self, dimension: D) -> Option<&str> {
        self.categories.get(&dimension).map(String::as_str)
    }

    /// Sets the search query, returning whether it changed.
    pub(super) fn set_query(&mut self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query == self.query {
            return false;
        }
        self.query = query;
        true
    }

    /// Selects the `value` of the `dimension`, clearing the selection if the
    /// `value` is blank.
    ///
    /// Returns whether the selection changed.
    pub(super) fn set_category(&mut self, dimension: D, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return self.categories.remove(&dimension).is_some();
        }
        if self.category(dimension) == Some(value) {
            return false;
        }
        _ = self.categories.insert(dimension, value.to_owned());
        true
    }

    /// Indicates whether these [`Criteria`] select everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.categories.is_empty()
    }

    /// Checks whether the provided `entry` satisfies these [`Criteria`].
    ///
    /// The lowercased display name is passed separately, since callers keep
    /// it precomputed for sorting.
    pub(super) fn matches<E>(&self, entry: &E, name: &str) -> bool
    where
        E: Entry<Dimension = D>,
    {
        let query_matches = self.query.is_empty()
            || name.contains(&self.query)
            || entry.email().to_lowercase().contains(&self.query);

        query_matches
            && self
                .categories
                .iter()
                .all(|(d, v)| entry.category(*d) == Some(v.as_str()))
    }
}
