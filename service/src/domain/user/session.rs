//! [`Session`] definitions.

use secrecy::{ExposeSecret as _, SecretString};

use crate::domain::Profile;
#[cfg(doc)]
use crate::domain::User;

/// Signed-in [`User`] session.
///
/// Replaces any ambient "current user" state: whoever needs to know who is
/// signed in receives a [`Session`] explicitly.
#[derive(Clone, Debug)]
pub struct Session {
    /// Bearer [`Token`] of this [`Session`].
    pub token: Token,

    /// [`Profile`] of the signed-in [`User`].
    pub profile: Profile,
}

/// Bearer access token of a [`Session`].
#[derive(Clone, Debug)]
pub struct Token(SecretString);

impl Token {
    /// Creates a new [`Token`] if the given `token` is not blank.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        (!token.is_empty()).then(|| Self(token.to_owned().into()))
    }

    /// Exposes the raw value of this [`Token`].
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[cfg(test)]
mod spec {
    use super::Token;

    #[test]
    fn token_is_trimmed_and_redacted() {
        let token = Token::new(" 1|abcdef\n").unwrap();
        assert_eq!(token.expose(), "1|abcdef");
        assert!(!format!("{token:?}").contains("abcdef"));

        assert!(Token::new("   ").is_none());
    }
}
