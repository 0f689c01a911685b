//! [`Query`] collection related to a single [`Student`].

use common::operations::By;

use crate::domain::{student, Student};
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries a [`Student`] by its [`student::Id`].
pub type ById = BackendQuery<By<Option<Student>, student::Id>>;
