//! Domain definitions.

pub mod profile;
pub mod student;
pub mod user;

pub use self::{profile::Profile, student::Student, user::User};
