//! [`Query`] definition.

pub mod filters;
pub mod profile;
pub mod student;
pub mod students;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::user::session::Token,
    infra::{backend::{self, Authorized}, credentials, Backend, Credentials},
    Error, Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Backend`] on behalf of the
/// signed-in user.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct BackendQuery<T>(T);

impl<W, B> BackendQuery<By<W, B>> {
    /// Creates a new [`BackendQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }

    /// Returns the value this [`BackendQuery`] selects by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.0.into_inner()
    }
}

impl<Be, Cr, W, B> Query<BackendQuery<By<W, B>>> for Service<Be, Cr>
where
    Be: Backend<
        Authorized<Select<By<W, B>>>,
        Ok = W,
        Err = Traced<backend::Error>,
    >,
    Cr: Credentials<
        credentials::Load,
        Ok = Option<Token>,
        Err = Traced<credentials::Error>,
    >,
{
    type Ok = W;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        BackendQuery(by): BackendQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = self.token().await.map_err(tracerr::wrap!())?;
        self.backend()
            .execute(Authorized::new(token, Select(by)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))
    }
}
