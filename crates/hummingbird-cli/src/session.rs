//! Bearer token sourced from the environment

use std::fmt;

use hummingbird_core::ports::ITokenProvider;

/// Environment variable holding the API bearer token
pub const TOKEN_ENV: &str = "HUMMINGBIRD_TOKEN";

/// Reads the token from an environment variable on every fetch
///
/// An unset or blank variable reads as "not signed in".
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Whether a non-blank token is currently set
    pub fn is_present(&self) -> bool {
        !self.bearer_token().is_empty()
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new(TOKEN_ENV)
    }
}

impl ITokenProvider for EnvTokenProvider {
    fn bearer_token(&self) -> String {
        std::env::var(&self.var)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

impl fmt::Debug for EnvTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvTokenProvider")
            .field("var", &self.var)
            .field("present", &self.is_present())
            .finish()
    }
}
