//! [`Command`] definition.

pub mod register_student;
pub mod restore_session;
pub mod sign_in;
pub mod sign_out;
pub mod update_profile;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    register_student::RegisterStudent, restore_session::RestoreSession,
    sign_in::SignIn, sign_out::SignOut, update_profile::UpdateProfile,
};
