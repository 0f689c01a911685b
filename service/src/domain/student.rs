//! [`Student`] definitions.

use common::{define_kind, DateOf};
use derive_more::{Display, From, Into};

use crate::domain::{user, User};

/// Student enrolled in the school.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Student {
    /// ID of this [`Student`].
    pub id: Id,

    /// [`User`] account of this [`Student`].
    pub user: User,

    /// Class this [`Student`] attends.
    pub class: Option<String>,

    /// Field of study of this [`Student`].
    pub field: Option<String>,

    /// [`Gender`] of this [`Student`].
    pub gender: Option<Gender>,

    /// [`user::Phone`] of this [`Student`].
    pub phone: Option<user::Phone>,

    /// Date of birth of this [`Student`].
    pub birth_date: Option<BirthDate>,

    /// Place of birth of this [`Student`].
    pub birth_place: Option<String>,

    /// Postal address of this [`Student`].
    pub address: Option<String>,

    /// Date this [`Student`] enrolled at.
    pub enrollment_date: Option<EnrollmentDate>,

    /// Free-form description of this [`Student`].
    pub description: Option<String>,
}

impl Student {
    /// Returns the value of the provided categorical [`Dimension`] of this
    /// [`Student`], if any.
    #[must_use]
    pub fn category(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Class => self.class.as_deref(),
            Dimension::Field => self.field.as_deref(),
        }
    }
}

/// ID of a [`Student`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Id(u64);

define_kind! {
    #[doc = "Gender of a [`Student`]."]
    enum Gender {
        #[doc = "Male."]
        Male = "Male",

        #[doc = "Female."]
        Female = "Female",
    }
}

define_kind! {
    #[doc = "Categorical dimension [`Student`]s may be filtered by."]
    enum Dimension {
        #[doc = "Class attended."]
        Class = "class",

        #[doc = "Field of study."]
        Field = "field",
    }
}

/// Marker type describing a birth.
#[derive(Clone, Copy, Debug)]
pub struct Birth;

/// Marker type describing an enrollment.
#[derive(Clone, Copy, Debug)]
pub struct Enrollment;

/// Date of a [`Student`]'s birth.
pub type BirthDate = DateOf<(Student, Birth)>;

/// Date of a [`Student`]'s enrollment.
pub type EnrollmentDate = DateOf<(Student, Enrollment)>;
