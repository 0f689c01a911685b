//! [`Command`] for updating the signed-in user's [`Profile`].

use common::operations::{By, Select, Update};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{profile::Changes, user::session::Token, Profile},
    infra::{
        backend::{self, Authorized},
        credentials, Backend, Credentials,
    },
    Error, Service,
};

use super::Command;

/// [`Command`] for applying [`Changes`] to the signed-in user's [`Profile`].
///
/// Returns the [`Profile`] reloaded after the update.
#[derive(Clone, Debug)]
pub struct UpdateProfile {
    /// [`Changes`] to apply.
    pub changes: Changes,
}

impl<Be, Cr> Command<UpdateProfile> for Service<Be, Cr>
where
    Be: Backend<
            Authorized<Update<Changes>>,
            Ok = (),
            Err = Traced<backend::Error>,
        > + Backend<
            Authorized<Select<By<Profile, ()>>>,
            Ok = Profile,
            Err = Traced<backend::Error>,
        >,
    Cr: Credentials<
        credentials::Load,
        Ok = Option<Token>,
        Err = Traced<credentials::Error>,
    >,
{
    type Ok = Profile;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        cmd: UpdateProfile,
    ) -> Result<Self::Ok, Self::Err> {
        let UpdateProfile { changes } = cmd;
        let token = self.token().await.map_err(tracerr::wrap!())?;

        self.backend()
            .execute(Authorized::new(token.clone(), Update(changes)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        let profile = self
            .backend()
            .execute(Authorized::new(token, Select(By::new(()))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        log::info!("updated profile of `User(id: {})`", profile.user.id);

        Ok(profile)
    }
}
