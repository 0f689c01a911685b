//! [`Command`] for signing out.

use common::operations::Perform;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::session::Token,
    infra::{
        backend::{self, Authorized, Logout},
        credentials, Backend, Credentials,
    },
    Error, Service,
};

use super::Command;

/// [`Command`] for signing out of the current session.
///
/// The [`Backend`] is notified on a best-effort basis: the stored [`Token`]
/// is cleared from the [`Credentials`] even if the notification fails, so
/// this [`Command`] also serves as a sign-out handler once the session has
/// expired.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignOut;

impl<Be, Cr> Command<SignOut> for Service<Be, Cr>
where
    Be: Backend<
        Authorized<Perform<Logout>>,
        Ok = (),
        Err = Traced<backend::Error>,
    >,
    Cr: Credentials<
            credentials::Load,
            Ok = Option<Token>,
            Err = Traced<credentials::Error>,
        > + Credentials<
            credentials::Clear,
            Ok = (),
            Err = Traced<credentials::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: SignOut) -> Result<Self::Ok, Self::Err> {
        match self.token().await {
            Ok(token) => {
                if let Err(e) = self
                    .backend()
                    .execute(Authorized::new(token, Perform(Logout)))
                    .await
                {
                    log::warn!("failed to terminate backend session: {e}");
                }
            }
            Err(e) if matches!(e.as_ref(), Error::MissingCredential) => {
                log::debug!("no session to terminate");
            }
            Err(e) => log::warn!("failed to load stored token: {e}"),
        }

        self.credentials()
            .execute(credentials::clear())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        log::info!("signed out");

        Ok(())
    }
}
