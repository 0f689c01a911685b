//! [`Command`] for registering a new [`Student`].

use common::operations::Insert;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Student;
use crate::{
    domain::profile::Registration,
    infra::{backend, Backend},
    Error, Service,
};

use super::Command;

/// [`Command`] for registering a new [`Student`] account.
///
/// Doesn't sign the [`Student`] in.
#[derive(Clone, Debug)]
pub struct RegisterStudent {
    /// [`Registration`] data of the new [`Student`].
    pub registration: Registration,
}

impl<Be, Cr> Command<RegisterStudent> for Service<Be, Cr>
where
    Be: Backend<Insert<Registration>, Ok = (), Err = Traced<backend::Error>>,
{
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        cmd: RegisterStudent,
    ) -> Result<Self::Ok, Self::Err> {
        let RegisterStudent { registration } = cmd;
        let email = registration.email.clone();

        self.backend()
            .execute(Insert(registration))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;

        log::info!("registered `Student(email: {email})`");

        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            profile::Registration,
            student::{BirthDate, EnrollmentDate, Gender},
            user,
        },
        infra::{backend::mock::Mock, credentials::InMemory},
        Service,
    };

    use super::{Command as _, RegisterStudent};

    #[tokio::test]
    async fn submits_registration_without_signing_in() {
        let backend = Mock::default();
        let store = InMemory::default();
        let svc = Service::new(Default::default(), backend.clone(), store);

        svc.execute(RegisterStudent {
            registration: Registration {
                first_name: user::Name::new("Jean").unwrap(),
                last_name: user::Name::new("Martin").unwrap(),
                email: user::Email::new("jean.martin@univ.fr").unwrap(),
                password: user::Password::new("testtest").unwrap(),
                phone: None,
                birth_date: BirthDate::parse("2003-01-01").unwrap(),
                gender: Gender::Male,
                birth_place: Some("Lyon".into()),
                address: None,
                class: "casa".into(),
                field: "compture".into(),
                enrollment_date: EnrollmentDate::parse("2024-09-01").unwrap(),
                description: None,
            },
        })
        .await
        .unwrap();

        let script = backend.0.borrow();
        assert_eq!(script.calls, ["register"]);
        let registered = script.registered.as_ref().unwrap();
        assert_eq!(registered.email.to_string(), "jean.martin@univ.fr");
        assert_eq!(registered.gender, Gender::Male);
    }
}
