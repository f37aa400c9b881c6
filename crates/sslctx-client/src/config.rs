//! Client configuration types.

use std::fmt;

/// How the client authenticates against the server
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// Anonymous access
    #[default]
    None,

    /// HTTP basic authentication, also used for API keys
    Basic {
        /// Username
        username: String,
        /// Password or API key
        password: Option<String>,
    },

    /// Bearer token
    Bearer(String),
}

impl Credentials {
    /// Basic credentials
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: Some(password.into()),
        }
    }

    /// Bearer token credentials
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Returns true if no credentials are configured
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::None)
    }

    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::None => request,
            Self::Basic { username, password } => request.basic_auth(username, password.as_ref()),
            Self::Bearer(token) => request.bearer_auth(token),
        }
    }
}

// Secrets never end up in logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"****")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"****").finish(),
        }
    }
}
