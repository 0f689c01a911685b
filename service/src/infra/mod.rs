//! Infrastructure layer.

pub mod backend;
pub mod credentials;

#[cfg(feature = "http")]
pub use self::backend::{http, Http};
pub use self::{backend::Backend, credentials::Credentials};
