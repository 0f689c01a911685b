//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::infra::{backend, credentials};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            message: $message.to_string(),
                            reauthenticate: false,
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// Command line [`Error`] reported to the user.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`Error`] message.
    pub message: String,

    /// Indicator whether the user must sign in again.
    pub reauthenticate: bool,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,
}

impl Error {
    /// Create a new [`Error`] representing an unexpected failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL",
            message: msg.to_string(),
            reauthenticate: false,
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            message,
            reauthenticate: _,
            backtrace,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Conversion of a type into an [`Error`].
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for service::Error {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::MissingCredential => Some(Error {
                code: "UNAUTHENTICATED",
                message: "Not signed in. Please login first".to_owned(),
                reauthenticate: true,
                backtrace: None,
            }),
            Self::Backend(e) => e.try_as_error(),
            Self::Credentials(e) => e.try_as_error(),
        }
    }
}

impl AsError for backend::Error {
    fn try_as_error(&self) -> Option<Error> {
        let code = match self {
            Self::Unauthorized => "SESSION_EXPIRED",
            Self::Network(_) => "NETWORK_FAILURE",
            Self::UnexpectedResponse(_) => "UNEXPECTED_RESPONSE",
            Self::Rejected { .. } => "REJECTED",
        };
        Some(Error {
            code,
            message: self.to_string(),
            reauthenticate: matches!(self, Self::Unauthorized),
            backtrace: None,
        })
    }
}

impl AsError for credentials::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}
