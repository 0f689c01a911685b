//! Request and response contracts of the [`Http`] backend.
//!
//! Every response of the backend is wrapped into an [`Envelope`]. Payloads
//! are decoded into the loose shapes defined here first, and only then
//! validated and converted into domain types, so a malformed payload is
//! reported as [`Error::UnexpectedResponse`] instead of leaking through.
//!
//! [`Http`]: super::Http

use std::collections::BTreeMap;

use common::{DateOf, Page};
use http::StatusCode;
use itertools::Itertools as _;
use serde::{de::DeserializeOwned, de::IgnoredAny, Deserialize, Serialize};
use tracing as log;

use crate::{
    domain::{
        self,
        profile::{Changes, Registration},
        student::{BirthDate, EnrollmentDate},
        user::{self, session},
    },
    infra::backend::{Error, Login},
    read,
};

/// Common wrapper of every backend response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    /// Indicator whether the request succeeded, if reported.
    #[serde(default)]
    success: Option<bool>,

    /// Payload of the response.
    data: Option<T>,

    /// Human-readable message of the response.
    #[serde(default)]
    message: Option<String>,

    /// Validation errors, keyed by the invalid field.
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

impl<T> Envelope<T> {
    /// Combines the message and validation errors of this [`Envelope`].
    fn into_message(self) -> Option<String> {
        let errors = self.errors.values().flatten().join("; ");
        match (self.message, errors.is_empty()) {
            (Some(msg), true) => Some(msg),
            (Some(msg), false) => Some(format!("{msg}: {errors}")),
            (None, false) => Some(errors),
            (None, true) => None,
        }
    }
}

/// Decodes the payload of a response with the provided `status` and `body`.
///
/// # Errors
///
/// See [`acknowledge()`] for the failure classification. Additionally errors
/// with [`Error::UnexpectedResponse`] if the payload is missing.
pub(super) fn decode<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, Error> {
    parse::<T>(status, body)?.ok_or_else(|| {
        Error::UnexpectedResponse("missing `data` field".to_owned())
    })
}

/// Checks that a response with the provided `status` and `body` reports a
/// success, ignoring its payload.
///
/// # Errors
///
/// - [`Error::Unauthorized`] on `401 Unauthorized`;
/// - [`Error::Rejected`] on any other non-2xx status or `"success": false`;
/// - [`Error::UnexpectedResponse`] if the `body` is not an [`Envelope`].
pub(super) fn acknowledge(status: StatusCode, body: &str) -> Result<(), Error> {
    parse::<IgnoredAny>(status, body).map(drop)
}

/// Parses a response into its optional payload.
fn parse<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Option<T>, Error> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }
    if !status.is_success() {
        let message = serde_json::from_str::<Envelope<IgnoredAny>>(body)
            .ok()
            .and_then(Envelope::into_message)
            .unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("Unknown").to_owned()
            });
        return Err(Error::Rejected { status, message });
    }

    let envelope = serde_json::from_str::<Envelope<T>>(body)
        .map_err(|e| Error::UnexpectedResponse(e.to_string()))?;
    if envelope.success == Some(false) {
        return Err(Error::Rejected {
            status,
            message: envelope
                .into_message()
                .unwrap_or_else(|| "Request was not successful".to_owned()),
        });
    }
    Ok(envelope.data)
}

/// Page of a paginated collection.
#[derive(Debug, Deserialize)]
pub(super) struct Paginated<T> {
    /// Items on the page.
    data: Vec<T>,

    /// URL of the next page, if there is one.
    #[serde(default)]
    next_page_url: Option<String>,
}

impl Paginated<Student> {
    /// Validates this [`Paginated`] response into a [`read::student::list::Page`].
    pub(super) fn into_page(
        self,
    ) -> Result<read::student::list::Page, Error> {
        let has_next = self.next_page_url.is_some_and(|u| !u.trim().is_empty());
        Page::new(self.data, has_next).try_map(|s| s.into_domain(None))
    }
}

/// Account of a user.
#[derive(Debug, Deserialize)]
pub(super) struct User {
    /// ID of the user.
    id: u64,

    /// First name.
    first_name: String,

    /// Last name.
    last_name: String,

    /// Email address.
    email: String,

    /// Photo URL.
    #[serde(default)]
    photo: Option<String>,
}

impl From<User> for domain::User {
    fn from(user: User) -> Self {
        let email = user.email.trim();
        Self {
            id: user.id.into(),
            first_name: name(&user.first_name, "user.first_name"),
            last_name: name(&user.last_name, "user.last_name"),
            email: user::Email::new(email).unwrap_or_else(|| {
                log::warn!(
                    "keeping malformed `user.email` of `User(id: {})`",
                    user.id,
                );
                user::Email::trusted(email)
            }),
            photo: non_blank(user.photo),
        }
    }
}

/// Student record.
#[derive(Debug, Deserialize)]
pub(super) struct Student {
    /// ID of the student.
    id: u64,

    /// Account of the student, if embedded.
    #[serde(default)]
    user: Option<User>,

    /// Class attended.
    #[serde(default)]
    class: Option<String>,

    /// Field of study.
    #[serde(default)]
    field: Option<String>,

    /// Gender.
    #[serde(default)]
    gender: Option<String>,

    /// Phone number.
    #[serde(default)]
    phone: Option<String>,

    /// Date of birth.
    #[serde(default)]
    birth_date: Option<String>,

    /// Place of birth.
    #[serde(default)]
    birth_place: Option<String>,

    /// Postal address.
    #[serde(default)]
    address: Option<String>,

    /// Date of enrollment.
    #[serde(default)]
    enrollment_date: Option<String>,

    /// Free-form description.
    #[serde(default)]
    description: Option<String>,
}

impl Student {
    /// Validates this [`Student`] into a [`domain::Student`].
    ///
    /// The `owner` is used as the account when none is embedded.
    pub(super) fn into_domain(
        self,
        owner: Option<&domain::User>,
    ) -> Result<domain::Student, Error> {
        let user = match (self.user, owner) {
            (Some(user), _) => user.into(),
            (None, Some(owner)) => owner.clone(),
            (None, None) => {
                return Err(Error::UnexpectedResponse(format!(
                    "`Student(id: {})` has no `user`",
                    self.id,
                )))
            }
        };

        Ok(domain::Student {
            id: self.id.into(),
            user,
            class: non_blank(self.class),
            field: non_blank(self.field),
            gender: lenient(self.gender, "student.gender", |g| g.parse().ok()),
            phone: lenient(self.phone, "student.phone", |p| user::Phone::new(p)),
            birth_date: date(self.birth_date, "student.birth_date"),
            birth_place: non_blank(self.birth_place),
            address: non_blank(self.address),
            enrollment_date: date(
                self.enrollment_date,
                "student.enrollment_date",
            ),
            description: non_blank(self.description),
        })
    }
}

/// Account together with its student record.
#[derive(Debug, Deserialize)]
pub(super) struct Profile {
    /// Account.
    user: User,

    /// Student record of the account.
    #[serde(default)]
    student: Option<Student>,
}

impl TryFrom<Profile> for domain::Profile {
    type Error = Error;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        let user = domain::User::from(profile.user);
        let student = profile
            .student
            .map(|s| s.into_domain(Some(&user)))
            .transpose()?;
        Ok(Self { user, student })
    }
}

/// Successful sign-in.
#[derive(Debug, Deserialize)]
pub(super) struct SignedIn {
    /// Bearer access token.
    #[serde(alias = "token")]
    access_token: String,

    /// Signed-in account and its student record.
    #[serde(flatten)]
    profile: Profile,
}

impl TryFrom<SignedIn> for user::Session {
    type Error = Error;

    fn try_from(signed_in: SignedIn) -> Result<Self, Self::Error> {
        Ok(Self {
            token: session::Token::new(signed_in.access_token)
                .ok_or_else(|| invalid("access_token"))?,
            profile: signed_in.profile.try_into()?,
        })
    }
}

/// Categorical filter options.
#[derive(Debug, Deserialize)]
pub(super) struct FilterOptions {
    /// Known fields of study.
    #[serde(default)]
    fields: Vec<String>,

    /// Known classes.
    #[serde(default)]
    classes: Vec<String>,
}

impl From<FilterOptions> for read::FilterOptions {
    fn from(options: FilterOptions) -> Self {
        let clean = |values: Vec<String>| {
            values
                .into_iter()
                .filter_map(|v| non_blank(Some(v)))
                .unique()
                .collect()
        };
        Self {
            fields: clean(options.fields),
            classes: clean(options.classes),
        }
    }
}

/// Body of a sign-in request.
#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    /// Email address.
    email: &'a str,

    /// Plain text password.
    password: &'a str,
}

impl<'a> From<&'a Login> for LoginRequest<'a> {
    fn from(login: &'a Login) -> Self {
        Self {
            email: login.email.as_ref(),
            password: login.password.expose(),
        }
    }
}

/// Body of a registration request.
#[derive(Debug, Serialize)]
pub(super) struct RegistrationRequest<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
    phone: &'a str,
    birth_date: &'a BirthDate,
    gender: &'static str,
    birth_place: &'a str,
    address: &'a str,
    class: &'a str,
    field: &'a str,
    enrollment_date: &'a EnrollmentDate,
    description: &'a str,
}

impl<'a> From<&'a Registration> for RegistrationRequest<'a> {
    fn from(r: &'a Registration) -> Self {
        Self {
            first_name: r.first_name.as_ref(),
            last_name: r.last_name.as_ref(),
            email: r.email.as_ref(),
            password: r.password.expose(),
            phone: r.phone.as_ref().map_or("", AsRef::as_ref),
            birth_date: &r.birth_date,
            gender: r.gender.as_str(),
            birth_place: r.birth_place.as_deref().unwrap_or_default(),
            address: r.address.as_deref().unwrap_or_default(),
            class: &r.class,
            field: &r.field,
            enrollment_date: &r.enrollment_date,
            description: r.description.as_deref().unwrap_or_default(),
        }
    }
}

/// Body of a profile update request.
#[derive(Debug, Serialize)]
pub(super) struct ChangesRequest<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    phone: &'a str,
    birth_date: String,
    birth_place: &'a str,
    address: &'a str,
    description: &'a str,
}

impl<'a> From<&'a Changes> for ChangesRequest<'a> {
    fn from(c: &'a Changes) -> Self {
        Self {
            first_name: c.first_name.as_ref(),
            last_name: c.last_name.as_ref(),
            email: c.email.as_ref(),
            password: c.password.as_ref().map(user::Password::expose),
            phone: c.phone.as_ref().map_or("", AsRef::as_ref),
            birth_date: c
                .birth_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            birth_place: c.birth_place.as_deref().unwrap_or_default(),
            address: c.address.as_deref().unwrap_or_default(),
            description: c.description.as_deref().unwrap_or_default(),
        }
    }
}

/// Creates an [`Error`] about an invalid `field` value.
fn invalid(field: &str) -> Error {
    Error::UnexpectedResponse(format!("invalid `{field}` value"))
}

/// Drops blank strings.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Trims the provided stored `raw` name, keeping it even if it doesn't pass
/// validation.
fn name(raw: &str, field: &str) -> user::Name {
    let raw = raw.trim();
    user::Name::new(raw).unwrap_or_else(|| {
        log::warn!("keeping malformed `{field}` value `{raw}`");
        user::Name::trusted(raw)
    })
}

/// Parses an optional stored value, dropping it if it is malformed.
fn lenient<T>(
    value: Option<String>,
    field: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let raw = non_blank(value)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        log::warn!("ignoring malformed `{field}` value");
    }
    parsed
}

/// Parses an optional date, ignoring any time part the backend appends.
fn date<Of>(value: Option<String>, field: &str) -> Option<DateOf<Of>> {
    lenient(value, field, |raw| {
        let day = raw.split(['T', ' ']).next().unwrap_or_default();
        DateOf::parse(day).ok()
    })
}
