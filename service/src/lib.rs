//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod directory;
pub mod domain;
mod error;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use tracerr::Traced;

use crate::{
    domain::{user::session::Token, Student},
    infra::{credentials, Credentials},
};
#[cfg(doc)]
use crate::infra::Backend;

pub use self::{
    command::Command, directory::Directory, error::Error, query::Query,
};

/// [`Service`] configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// [`Directory`] configuration.
    pub directory: directory::Config,
}

/// Client-side service of the school directory.
#[derive(Clone, Debug)]
pub struct Service<B, C> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Backend`] of this [`Service`].
    backend: B,

    /// [`Credentials`] of this [`Service`].
    credentials: C,
}

impl<B, C> Service<B, C> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, backend: B, credentials: C) -> Self {
        Self {
            config,
            backend,
            credentials,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Backend`] of this [`Service`].
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns [`Credentials`] of this [`Service`].
    #[must_use]
    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Creates a new [`Directory`] of [`Student`]s browsed through this
    /// [`Service`].
    #[must_use]
    pub fn directory(&self) -> Directory<Self, Student>
    where
        Self: Clone,
    {
        Directory::new(self.clone(), &self.config.directory)
    }

    /// Loads the stored bearer [`Token`].
    ///
    /// # Errors
    ///
    /// With [`Error::MissingCredential`] if no [`Token`] is stored.
    async fn token(&self) -> Result<Token, Traced<Error>>
    where
        C: Credentials<
            credentials::Load,
            Ok = Option<Token>,
            Err = Traced<credentials::Error>,
        >,
    {
        self.credentials
            .execute(credentials::load())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?
            .ok_or_else(|| tracerr::new!(Error::MissingCredential))
    }
}
