//! [`Profile`] definitions.

use crate::domain::{
    student::{BirthDate, EnrollmentDate, Gender},
    user, Student, User,
};

/// [`User`] account together with its [`Student`] record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    /// [`User`] account.
    pub user: User,

    /// [`Student`] record of the [`User`], if the account belongs to one.
    pub student: Option<Student>,
}

/// Data a new [`Student`] signs up with.
#[derive(Clone, Debug)]
pub struct Registration {
    /// First name of the [`Student`].
    pub first_name: user::Name,

    /// Last name of the [`Student`].
    pub last_name: user::Name,

    /// [`user::Email`] to sign in with.
    pub email: user::Email,

    /// [`user::Password`] to sign in with.
    pub password: user::Password,

    /// [`user::Phone`] of the [`Student`].
    pub phone: Option<user::Phone>,

    /// [`BirthDate`] of the [`Student`].
    pub birth_date: BirthDate,

    /// [`Gender`] of the [`Student`].
    pub gender: Gender,

    /// Place of birth of the [`Student`].
    pub birth_place: Option<String>,

    /// Postal address of the [`Student`].
    pub address: Option<String>,

    /// Class the [`Student`] attends.
    pub class: String,

    /// Field of study of the [`Student`].
    pub field: String,

    /// [`EnrollmentDate`] of the [`Student`].
    pub enrollment_date: EnrollmentDate,

    /// Free-form description of the [`Student`].
    pub description: Option<String>,
}

/// Changes to the signed-in [`User`]'s [`Profile`].
///
/// Every optional field left as [`None`] is sent as an empty value, except
/// the [`Changes::password`], which is omitted to keep the current one.
#[derive(Clone, Debug)]
pub struct Changes {
    /// New first name.
    pub first_name: user::Name,

    /// New last name.
    pub last_name: user::Name,

    /// New [`user::Email`].
    pub email: user::Email,

    /// New [`user::Password`], if it should be changed.
    pub password: Option<user::Password>,

    /// New [`user::Phone`].
    pub phone: Option<user::Phone>,

    /// New [`BirthDate`].
    pub birth_date: Option<BirthDate>,

    /// New place of birth.
    pub birth_place: Option<String>,

    /// New postal address.
    pub address: Option<String>,

    /// New description.
    pub description: Option<String>,
}
