//! [`Backend`]-related definitions.

#[cfg(feature = "http")]
pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use derive_more::{Display, Error as StdError};

use crate::domain::user::{self, session};

#[cfg(feature = "http")]
pub use self::http::Http;

/// Remote school-management backend operation.
pub use common::Handler as Backend;

/// [`Backend`] operation performed on behalf of a signed-in user.
#[derive(Clone, Debug)]
pub struct Authorized<T> {
    /// Bearer [`session::Token`] to authorize the operation with.
    pub token: session::Token,

    /// Operation itself.
    pub op: T,
}

impl<T> Authorized<T> {
    /// Wraps the provided `op`eration to be authorized with the `token`.
    #[must_use]
    pub fn new(token: session::Token, op: T) -> Self {
        Self { token, op }
    }
}

/// Credentials to sign in with.
#[derive(Clone, Debug)]
pub struct Login {
    /// [`user::Email`] of the account.
    pub email: user::Email,

    /// [`user::Password`] of the account.
    pub password: user::Password,
}

/// Termination of the current session on the [`Backend`] side.
#[derive(Clone, Copy, Debug)]
pub struct Logout;

/// [`Backend`] error.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Bearer credential was rejected with `401 Unauthorized`.
    #[display("Session expired. Please login again")]
    Unauthorized,

    /// Request could not be delivered or its response could not be read.
    #[display("Network request failed: {_0}")]
    Network(#[error(not(source))] String),

    /// Response did not match the expected shape.
    #[display("Unexpected response: {_0}")]
    UnexpectedResponse(#[error(not(source))] String),

    /// Request was rejected by the [`Backend`].
    #[display("Request rejected with `{status}`: {message}")]
    Rejected {
        /// [`http::StatusCode`] of the response.
        status: ::http::StatusCode,

        /// Message explaining the rejection.
        message: String,
    },
}
