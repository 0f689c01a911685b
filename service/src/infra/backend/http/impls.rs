//! [`Backend`] operations implemented by the [`Http`] backend.

use common::operations::{By, Insert, Perform, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        profile::{Changes, Registration},
        student, user, Profile, Student,
    },
    infra::{
        backend::{
            self,
            http::{wire, BearerExt as _},
            Authorized, Login, Logout,
        },
        Backend, Http,
    },
    read::{self, student::list},
};

impl Backend<Authorized<Select<By<list::Page, list::PageNumber>>>> for Http {
    type Ok = list::Page;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, op: Select(by) }: Authorized<
            Select<By<list::Page, list::PageNumber>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let page = by.into_inner();
        let request = self
            .get("students")
            .map_err(tracerr::wrap!())?
            .bearer(&token)
            .query(&[("page", page.get())]);

        self.fetch::<wire::Paginated<wire::Student>>(request)
            .await
            .and_then(wire::Paginated::into_page)
            .map_err(tracerr::wrap!())
    }
}

impl Backend<Authorized<Select<By<Vec<Student>, list::Category>>>> for Http {
    type Ok = Vec<Student>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, op: Select(by) }: Authorized<
            Select<By<Vec<Student>, list::Category>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Category { dimension, value } = by.into_inner();
        let request = self
            .get("students")
            .map_err(tracerr::wrap!())?
            .bearer(&token)
            .query(&[(dimension.as_str(), value.as_str())]);

        self.fetch::<Vec<wire::Student>>(request)
            .await
            .and_then(|students| {
                students.into_iter().map(|s| s.into_domain(None)).collect()
            })
            .map_err(tracerr::wrap!())
    }
}

impl Backend<Authorized<Select<By<Option<Student>, student::Id>>>> for Http {
    type Ok = Option<Student>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, op: Select(by) }: Authorized<
            Select<By<Option<Student>, student::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let request = self
            .get(&format!("students/{id}"))
            .map_err(tracerr::wrap!())?
            .bearer(&token);

        match self.fetch::<wire::Student>(request).await {
            Ok(student) => student
                .into_domain(None)
                .map(Some)
                .map_err(tracerr::wrap!()),
            Err(backend::Error::Rejected { status, .. })
                if status == http::StatusCode::NOT_FOUND =>
            {
                Ok(None)
            }
            Err(e) => Err(tracerr::new!(e)),
        }
    }
}

impl Backend<Authorized<Select<By<read::FilterOptions, ()>>>> for Http {
    type Ok = read::FilterOptions;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, .. }: Authorized<
            Select<By<read::FilterOptions, ()>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .get("students/filters/options")
            .map_err(tracerr::wrap!())?
            .bearer(&token);

        self.fetch::<wire::FilterOptions>(request)
            .await
            .map(Into::into)
            .map_err(tracerr::wrap!())
    }
}

impl Backend<Authorized<Select<By<Profile, ()>>>> for Http {
    type Ok = Profile;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, .. }: Authorized<Select<By<Profile, ()>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .get("auth/profile")
            .map_err(tracerr::wrap!())?
            .bearer(&token);

        self.fetch::<wire::Profile>(request)
            .await
            .and_then(TryInto::try_into)
            .map_err(tracerr::wrap!())
    }
}

impl Backend<Perform<Login>> for Http {
    type Ok = user::Session;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Perform(login): Perform<Login>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .post("auth/login")
            .map_err(tracerr::wrap!())?
            .json(&wire::LoginRequest::from(&login));

        self.fetch::<wire::SignedIn>(request)
            .await
            .map_err(|e| match e {
                // No session exists yet, so credentials are wrong.
                backend::Error::Unauthorized => backend::Error::Rejected {
                    status: http::StatusCode::UNAUTHORIZED,
                    message: "Invalid email or password".to_owned(),
                },
                e @ (backend::Error::Network(_)
                | backend::Error::UnexpectedResponse(_)
                | backend::Error::Rejected { .. }) => e,
            })
            .and_then(TryInto::try_into)
            .map_err(tracerr::wrap!())
    }
}

impl Backend<Authorized<Perform<Logout>>> for Http {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized { token, .. }: Authorized<Perform<Logout>>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .post("auth/logout")
            .map_err(tracerr::wrap!())?
            .bearer(&token);

        self.acknowledge(request).await.map_err(tracerr::wrap!())
    }
}

impl Backend<Insert<Registration>> for Http {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Insert(registration): Insert<Registration>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .post("auth/register")
            .map_err(tracerr::wrap!())?
            .json(&wire::RegistrationRequest::from(&registration));

        self.acknowledge(request).await.map_err(tracerr::wrap!())
    }
}

impl Backend<Authorized<Update<Changes>>> for Http {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Authorized {
            token,
            op: Update(changes),
        }: Authorized<Update<Changes>>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .put("auth/profile")
            .map_err(tracerr::wrap!())?
            .bearer(&token)
            .json(&wire::ChangesRequest::from(&changes));

        self.acknowledge(request).await.map_err(tracerr::wrap!())
    }
}
