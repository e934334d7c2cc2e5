//! The session of the person using the app.
//!
//! A [Session] starts out [Session::Anonymous], becomes
//! [Session::Authenticated] after a successful log-in and goes back to
//! anonymous on log-out. It is read from the session cookie by the auth guard
//! and handed to every [crate::api::ApiClient] call that needs a token.

use std::fmt;

/// The bearer token issued by the finance API on log-in.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token string issued by the finance API.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens must never end up in the logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Whether the current user is logged in, and with which token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A user is logged in with the given token.
    Authenticated(AuthToken),
}

impl Session {
    /// Move to the authenticated state with `token`, replacing any previous token.
    pub fn log_in(self, token: AuthToken) -> Self {
        Session::Authenticated(token)
    }

    /// Move back to the anonymous state.
    pub fn log_out(self) -> Self {
        Session::Anonymous
    }

    /// The token of an authenticated session.
    pub fn token(&self) -> Option<&AuthToken> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(token) => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthToken, Session};

    #[test]
    fn new_session_is_anonymous() {
        let session = Session::default();

        assert_eq!(session, Session::Anonymous);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn log_in_then_log_out_returns_to_anonymous() {
        let session = Session::default().log_in(AuthToken::new("abc"));

        assert_eq!(session.token().map(AuthToken::as_str), Some("abc"));

        let session = session.log_out();

        assert_eq!(session, Session::Anonymous);
    }

    #[test]
    fn log_in_replaces_previous_token() {
        let session = Session::default()
            .log_in(AuthToken::new("first"))
            .log_in(AuthToken::new("second"));

        assert_eq!(session.token().map(AuthToken::as_str), Some("second"));
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::Authenticated(AuthToken::new("super-secret"));

        let output = format!("{session:?}");

        assert!(!output.contains("super-secret"));
    }
}
