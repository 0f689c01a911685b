//! Read models definitions.

pub mod student;

pub use self::student::FilterOptions;
