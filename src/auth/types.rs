//! Auth configuration types

use crate::types::OptionStringExt;

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Bearer auth when a non-empty token is given, otherwise none
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::to_string).none_if_empty() {
            Some(token) => Self::Bearer { token },
            None => Self::None,
        }
    }

    /// Check if any credentials are configured
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Value of the Authorization header, if one should be sent
    pub fn authorization_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Bearer { token } => Some(format!("Bearer {token}")),
        }
    }
}

// Tokens stay out of debug output and logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}
