//! Scripted [`Backend`] for tests.

use std::{cell::RefCell, rc::Rc};

use common::operations::{By, Insert, Perform, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        profile::{Changes, Registration},
        student,
        user::{self, session::Token, Session},
        Profile, Student, User,
    },
    infra::{
        backend::{self, Authorized, Login, Logout},
        Backend,
    },
};

/// Creates a [`User`] for tests.
pub(crate) fn user(id: u64, first: &str, last: &str, email: &str) -> User {
    User {
        id: id.into(),
        first_name: user::Name::new(first).unwrap(),
        last_name: user::Name::new(last).unwrap(),
        email: user::Email::new(email).unwrap(),
        photo: None,
    }
}

/// Creates a [`Student`] for tests.
pub(crate) fn student(
    id: u64,
    first: &str,
    last: &str,
    email: &str,
    class: &str,
    field: &str,
) -> Student {
    Student {
        id: student::Id::from(id),
        user: user(id + 100, first, last, email),
        class: Some(class.to_owned()),
        field: Some(field.to_owned()),
        gender: None,
        phone: None,
        birth_date: None,
        birth_place: None,
        address: None,
        enrollment_date: None,
        description: None,
    }
}

/// Creates a [`Profile`] for tests.
pub(crate) fn profile() -> Profile {
    let student = student(7, "Marie", "Dubois", "marie@univ.fr", "casa", "info");
    Profile {
        user: student.user.clone(),
        student: Some(student),
    }
}

/// Script of a [`Mock`] [`Backend`].
#[derive(Debug)]
pub(crate) struct Script {
    /// Password accepted by [`Perform<Login>`].
    pub(crate) password: String,

    /// Token issued by [`Perform<Login>`].
    pub(crate) token: String,

    /// Token accepted by [`Authorized`] operations.
    pub(crate) accepted: String,

    /// Result of selecting the [`Profile`].
    pub(crate) profile: Profile,

    /// Error returned by [`Logout`], if any.
    pub(crate) logout_error: Option<backend::Error>,

    /// Last received [`Registration`].
    pub(crate) registered: Option<Registration>,

    /// Names of the executed operations.
    pub(crate) calls: Vec<&'static str>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            password: "testtest".to_owned(),
            token: "1|issued".to_owned(),
            accepted: "1|issued".to_owned(),
            profile: profile(),
            logout_error: None,
            registered: None,
            calls: vec![],
        }
    }
}

/// [`Backend`] replaying a [`Script`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Mock(pub(crate) Rc<RefCell<Script>>);

impl Mock {
    /// Records the `call` and checks the `token` against the [`Script`].
    fn authorize(
        &self,
        call: &'static str,
        token: &Token,
    ) -> Result<(), Traced<backend::Error>> {
        let mut script = self.0.borrow_mut();
        script.calls.push(call);
        if token.expose() == script.accepted {
            Ok(())
        } else {
            Err(tracerr::new!(backend::Error::Unauthorized))
        }
    }
}

impl Backend<Perform<Login>> for Mock {
    type Ok = Session;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Perform(login): Perform<Login>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut script = self.0.borrow_mut();
        script.calls.push("login");
        if login.password.expose() != script.password {
            return Err(tracerr::new!(backend::Error::Rejected {
                status: http::StatusCode::UNAUTHORIZED,
                message: "Invalid credentials".to_owned(),
            }));
        }
        Ok(Session {
            token: Token::new(script.token.clone()).unwrap(),
            profile: script.profile.clone(),
        })
    }
}

impl Backend<Authorized<Perform<Logout>>> for Mock {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, .. }: Authorized<Perform<Logout>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.authorize("logout", &token)?;
        match self.0.borrow().logout_error.clone() {
            Some(e) => Err(tracerr::new!(e)),
            None => Ok(()),
        }
    }
}

impl Backend<Authorized<Select<By<Profile, ()>>>> for Mock {
    type Ok = Profile;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, .. }: Authorized<Select<By<Profile, ()>>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.authorize("profile", &token)?;
        Ok(self.0.borrow().profile.clone())
    }
}

impl Backend<Insert<Registration>> for Mock {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(registration): Insert<Registration>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut script = self.0.borrow_mut();
        script.calls.push("register");
        script.registered = Some(registration);
        Ok(())
    }
}

impl Backend<Authorized<Update<Changes>>> for Mock {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            token,
            op: Update(changes),
        }: Authorized<Update<Changes>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.authorize("update", &token)?;
        let mut script = self.0.borrow_mut();
        let user = &mut script.profile.user;
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.email = changes.email;
        Ok(())
    }
}
