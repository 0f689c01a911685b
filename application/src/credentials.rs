//! File-backed [`Credentials`] storage.

use std::{io, path::PathBuf};

use common::operations::Insert;
use service::{
    domain::user::session::Token,
    infra::{
        credentials::{self, Clear, Load, Store},
        Credentials,
    },
};
use tokio::fs;
use tracerr::Traced;
use tracing as log;

/// [`Credentials`] persisted in a plain file, readable by its owner only.
#[derive(Clone, Debug)]
pub struct File {
    /// Path to the file holding the token.
    path: PathBuf,
}

impl File {
    /// Creates a new [`File`] storage at the provided `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Credentials<Load> for File {
    type Ok = Option<Token>;
    type Err = Traced<credentials::Error>;

    async fn execute(&self, _: Load) -> Result<Self::Ok, Self::Err> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Token::new(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(tracerr::new!(credentials::Error::new(e))),
        }
    }
}

impl Credentials<Store> for File {
    type Ok = ();
    type Err = Traced<credentials::Error>;

    async fn execute(
        &self,
        Insert(token): Store,
    ) -> Result<Self::Ok, Self::Err> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| tracerr::new!(credentials::Error::new(e)))?;
        }
        fs::write(&self.path, token.expose())
            .await
            .map_err(|e| tracerr::new!(credentials::Error::new(e)))?;

        #[cfg(unix)]
        {
            use std::{fs::Permissions, os::unix::fs::PermissionsExt as _};

            fs::set_permissions(&self.path, Permissions::from_mode(0o600))
                .await
                .map_err(|e| tracerr::new!(credentials::Error::new(e)))?;
        }

        log::debug!("token stored in `{}`", self.path.display());
        Ok(())
    }
}

impl Credentials<Clear> for File {
    type Ok = ();
    type Err = Traced<credentials::Error>;

    async fn execute(&self, _: Clear) -> Result<Self::Ok, Self::Err> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                log::debug!("token removed from `{}`", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(tracerr::new!(credentials::Error::new(e))),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;
    use service::{
        domain::user::session::Token,
        infra::{credentials, Credentials as _},
    };

    use super::File;

    #[tokio::test]
    async fn persists_token_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");

        let store = File::new(&path);
        assert!(store.execute(credentials::load()).await.unwrap().is_none());

        store
            .execute(Insert(Token::new("1|abcdef").unwrap()))
            .await
            .unwrap();

        let reopened = File::new(&path);
        assert_eq!(
            reopened
                .execute(credentials::load())
                .await
                .unwrap()
                .unwrap()
                .expose(),
            "1|abcdef",
        );

        reopened.execute(credentials::clear()).await.unwrap();
        reopened.execute(credentials::clear()).await.unwrap();
        assert!(store.execute(credentials::load()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_file_holds_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();

        assert!(File::new(path)
            .execute(credentials::load())
            .await
            .unwrap()
            .is_none());
    }
}
