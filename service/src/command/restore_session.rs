//! [`Command`] for restoring a persisted [`Session`].

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        user::{session::Token, Session},
        Profile,
    },
    infra::{
        backend::{self, Authorized},
        credentials, Backend, Credentials,
    },
    Error, Service,
};

use super::Command;

/// [`Command`] for restoring the [`Session`] whose [`Token`] is stored in the
/// [`Credentials`].
///
/// The [`Token`] is validated by fetching the [`Profile`] it belongs to. A
/// [`Token`] rejected by the [`Backend`] is cleared.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestoreSession;

impl<Be, Cr> Command<RestoreSession> for Service<Be, Cr>
where
    Be: Backend<
        Authorized<Select<By<Profile, ()>>>,
        Ok = Profile,
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
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: RestoreSession,
    ) -> Result<Self::Ok, Self::Err> {
        let token = self.token().await.map_err(tracerr::wrap!())?;

        let profile = self
            .backend()
            .execute(Authorized::new(token.clone(), Select(By::new(()))))
            .await;
        if let Err(e) = &profile {
            if matches!(e.as_ref(), backend::Error::Unauthorized) {
                log::info!("stored token expired, clearing it");
                self.credentials()
                    .execute(credentials::clear())
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> Error))?;
            }
        }
        let profile = profile.map_err(tracerr::map_from_and_wrap!(=> Error))?;

        log::debug!("restored session of `User(id: {})`", profile.user.id);

        Ok(Session { token, profile })
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::user::session::Token,
        infra::{
            backend::mock::Mock,
            credentials::{self, InMemory},
            Credentials as _,
        },
        Error, Service,
    };

    use super::{Command as _, RestoreSession};

    #[tokio::test]
    async fn restores_valid_token() {
        let store = InMemory::with_token(Token::new("1|issued").unwrap());
        let svc = Service::new(Default::default(), Mock::default(), store);

        let session = svc.execute(RestoreSession).await.unwrap();

        assert_eq!(session.token.expose(), "1|issued");
        assert!(session.profile.student.is_some());
    }

    #[tokio::test]
    async fn requires_stored_token() {
        let svc =
            Service::new(Default::default(), Mock::default(), InMemory::default());

        let err = svc.execute(RestoreSession).await.unwrap_err();

        assert!(matches!(err.as_ref(), Error::MissingCredential));
        assert!(err.as_ref().requires_reauthentication());
    }

    #[tokio::test]
    async fn clears_expired_token() {
        let store = InMemory::with_token(Token::new("1|expired").unwrap());
        let svc = Service::new(Default::default(), Mock::default(), store.clone());

        let err = svc.execute(RestoreSession).await.unwrap_err();

        assert!(err.as_ref().requires_reauthentication());
        assert!(store.execute(credentials::load()).await.unwrap().is_none());
    }
}
