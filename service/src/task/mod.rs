//! Deferred tasks definitions.

mod debounce;

pub use self::debounce::Debounce;
