//! [`Credentials`] storage definitions.

use std::{io, sync::Arc};

use common::operations::{By, Delete, Insert, Select};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::domain::user::session::Token;

/// Persistent storage of the bearer [`Token`].
pub use common::Handler as Credentials;

/// [`Credentials`] operation loading the stored [`Token`], if any.
pub type Load = Select<By<Option<Token>, ()>>;

/// [`Credentials`] operation storing a [`Token`], replacing the existing one.
pub type Store = Insert<Token>;

/// [`Credentials`] operation removing the stored [`Token`], if any.
pub type Clear = Delete<By<Token, ()>>;

/// Creates a new [`Load`] operation.
#[must_use]
pub fn load() -> Load {
    Select(By::new(()))
}

/// Creates a new [`Clear`] operation.
#[must_use]
pub fn clear() -> Clear {
    Delete(By::new(()))
}

/// [`Credentials`] storage error.
#[derive(Debug, Display, StdError)]
#[display("Credential store failed: {source}")]
pub struct Error {
    /// Underlying storage failure.
    source: io::Error,
}

impl Error {
    /// Wraps the provided storage failure into an [`Error`].
    #[must_use]
    pub fn new(source: impl Into<io::Error>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// [`Credentials`] kept in memory only, lost once dropped.
#[derive(Clone, Debug, Default)]
pub struct InMemory(Arc<RwLock<Option<Token>>>);

impl InMemory {
    /// Creates a new [`InMemory`] storage already holding the `token`.
    #[must_use]
    pub fn with_token(token: Token) -> Self {
        Self(Arc::new(RwLock::new(Some(token))))
    }
}

impl Credentials<Load> for InMemory {
    type Ok = Option<Token>;
    type Err = Traced<Error>;

    async fn execute(&self, _: Load) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.clone())
    }
}

impl Credentials<Store> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(token): Store,
    ) -> Result<Self::Ok, Self::Err> {
        *self.0.write().await = Some(token);
        Ok(())
    }
}

impl Credentials<Clear> for InMemory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Clear) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.take());
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::domain::user::session::Token;

    use super::{clear, load, Credentials as _, InMemory};

    #[tokio::test]
    async fn stores_and_clears_token() {
        let store = InMemory::default();
        assert!(store.execute(load()).await.unwrap().is_none());

        let token = Token::new("1|abcdef").unwrap();
        store.execute(Insert(token)).await.unwrap();
        assert_eq!(
            store.execute(load()).await.unwrap().unwrap().expose(),
            "1|abcdef",
        );

        let other = store.clone();
        other.execute(clear()).await.unwrap();
        assert!(store.execute(load()).await.unwrap().is_none());
    }
}
