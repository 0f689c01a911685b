//! [`Query`] of the signed-in user's [`Profile`].

use common::operations::By;

use crate::domain::Profile;
#[cfg(doc)]
use crate::Query;

use super::BackendQuery;

/// Queries the [`Profile`] of the signed-in user.
pub type Current = BackendQuery<By<Profile, ()>>;
