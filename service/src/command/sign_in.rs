//! [`Command`] for signing in.

use common::operations::{Insert, Perform};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::{self, Session},
    infra::{backend, credentials, Backend, Credentials},
    Error, Service,
};

use super::Command;

/// [`Command`] for signing in with an [`user::Email`] and a
/// [`user::Password`].
///
/// On success the issued [`Token`] is persisted in the [`Credentials`].
///
/// [`Token`]: user::session::Token
#[derive(Clone, Debug)]
pub struct SignIn {
    /// [`user::Email`] of the account.
    pub email: user::Email,

    /// [`user::Password`] of the account.
    pub password: user::Password,
}

impl<Be, Cr> Command<SignIn> for Service<Be, Cr>
where
    Be: Backend<
        Perform<backend::Login>,
        Ok = Session,
        Err = Traced<backend::Error>,
    >,
    Cr: Credentials<
        credentials::Store,
        Ok = (),
        Err = Traced<credentials::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<Error>;

    async fn execute(&self, cmd: SignIn) -> Result<Self::Ok, Self::Err> {
        let SignIn { email, password } = cmd;

        let session = self
            .backend()
            .execute(Perform(backend::Login { email, password }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        self.credentials()
            .execute(Insert(session.token.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        log::info!("`User(id: {})` signed in", session.profile.user.id);

        Ok(session)
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::user,
        infra::{backend::mock::Mock, credentials, credentials::InMemory},
        Error, Service,
    };

    use super::{Command as _, SignIn};

    fn sign_in(password: &str) -> SignIn {
        SignIn {
            email: user::Email::new("marie@univ.fr").unwrap(),
            password: user::Password::new(password).unwrap(),
        }
    }

    #[tokio::test]
    async fn persists_issued_token() {
        let store = InMemory::default();
        let svc = Service::new(Default::default(), Mock::default(), store.clone());

        let session = svc.execute(sign_in("testtest")).await.unwrap();

        assert_eq!(session.token.expose(), "1|issued");
        assert_eq!(session.profile.user.full_name(), "Marie Dubois");
        assert_eq!(
            crate::infra::Credentials::execute(&store, credentials::load())
                .await
                .unwrap()
                .unwrap()
                .expose(),
            "1|issued",
        );
    }

    #[tokio::test]
    async fn keeps_store_untouched_on_rejection() {
        let store = InMemory::default();
        let svc = Service::new(Default::default(), Mock::default(), store.clone());

        let err = svc.execute(sign_in("wrong-password")).await.unwrap_err();

        assert!(matches!(err.as_ref(), Error::Backend(_)));
        assert!(!err.as_ref().requires_reauthentication());
        assert!(
            crate::infra::Credentials::execute(&store, credentials::load())
                .await
                .unwrap()
                .is_none()
        );
    }
}
