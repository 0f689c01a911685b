//! [`Query`] collection related to multiple [`Student`]s.

use common::operations::By;

use crate::{domain::Student, read::student::list};
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries a [`list::Page`] of [`Student`]s by its [`list::PageNumber`].
pub type Page = BackendQuery<By<list::Page, list::PageNumber>>;

/// Queries all the [`Student`]s matching a [`list::Category`].
pub type ByCategory = BackendQuery<By<Vec<Student>, list::Category>>;
