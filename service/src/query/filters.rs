//! [`Query`] of the categorical filter options.

use common::operations::By;

use crate::read::FilterOptions;
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries the [`FilterOptions`] of [`Student`]s.
///
/// [`Student`]: crate::domain::Student
pub type Options = BackendQuery<By<FilterOptions, ()>>;
