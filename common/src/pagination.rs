//! Abstractions for page-number pagination.

use std::{cmp::Ordering, num::NonZeroU32};

use derive_more::{Display, Into};

/// Number of a page in a paginated collection, starting from `1`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page of any collection.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Creates a new [`PageNumber`].
    ///
    /// [`None`] is returned for `0`, since pages are counted from `1`.
    #[must_use]
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Self)
    }

    /// Returns the numeric value of this [`PageNumber`].
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the [`PageNumber`] following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Single page of a collection, as returned by a remote source.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items of this [`Page`], in the order they were returned.
    pub items: Vec<I>,

    /// Indicator whether the collection has a page after this one.
    pub has_next: bool,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] out of the provided items.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = I>, has_next: bool) -> Self {
        Self {
            items: items.into_iter().collect(),
            has_next,
        }
    }

    /// Returns the number of items on this [`Page`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Indicates whether this [`Page`] has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts every item of this [`Page`] with the provided fallible
    /// function, failing on the first error.
    ///
    /// # Errors
    ///
    /// Errors with the first error returned by `f`.
    pub fn try_map<T, E>(
        self,
        f: impl FnMut(I) -> Result<T, E>,
    ) -> Result<Page<T>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            has_next: self.has_next,
        })
    }
}

/// Position of a forward-only reader in a paginated collection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cursor {
    /// [`PageNumber`] to be requested next.
    next: PageNumber,

    /// Indicator whether the collection has more pages to read.
    has_more: bool,
}

impl Cursor {
    /// Creates a new [`Cursor`] pointing to the first page.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            next: PageNumber::FIRST,
            has_more: true,
        }
    }

    /// Returns the [`PageNumber`] to be requested next.
    #[must_use]
    pub const fn next_page(&self) -> PageNumber {
        self.next
    }

    /// Indicates whether the collection has more pages to read.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Moves this [`Cursor`] past the `loaded` page.
    pub fn advance(&mut self, loaded: PageNumber, has_next: bool) {
        self.next = loaded.next();
        self.has_more = has_next;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

/// Sorting order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    /// Returns the opposite [`Order`].
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Applies this [`Order`] to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Defines pagination types for the provided node type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "A [`Cursor`] over the pages of nodes."]
        pub type Cursor = $crate::pagination::Cursor;

        #[doc = "Number of a [`Page`]."]
        pub type PageNumber = $crate::pagination::PageNumber;
    };
}
