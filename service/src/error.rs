//! [`Service`] error definitions.

use derive_more::{Display, Error as StdError, From};

use crate::infra::{backend, credentials};
#[cfg(doc)]
use crate::{
    infra::{Backend, Credentials},
    Service,
};

/// Error of a [`Service`] operation.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// No bearer token is stored in the [`Credentials`].
    #[display("No authentication token found")]
    #[from(ignore)]
    MissingCredential,

    /// [`Backend`] operation failed.
    #[display("{_0}")]
    Backend(backend::Error),

    /// [`Credentials`] operation failed.
    #[display("{_0}")]
    Credentials(credentials::Error),
}

impl Error {
    /// Indicates whether the user must sign in again to recover from this
    /// [`Error`].
    #[must_use]
    pub const fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential | Self::Backend(backend::Error::Unauthorized),
        )
    }
}
