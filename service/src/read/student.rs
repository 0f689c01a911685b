//! [`Student`] read models definitions.

use crate::domain::Student;

pub mod list {
    //! [`Student`]s list definitions.

    use common::define_pagination;

    use crate::domain::{student::Dimension, Student};

    define_pagination!(Student);

    /// Server-side selection of [`Student`]s by a categorical [`Dimension`].
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Category {
        /// [`Dimension`] to select by.
        pub dimension: Dimension,

        /// Value the [`Dimension`] must be equal to.
        pub value: String,
    }
}

/// Categorical values available for filtering [`Student`]s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterOptions {
    /// Known fields of study.
    pub fields: Vec<String>,

    /// Known classes.
    pub classes: Vec<String>,
}
